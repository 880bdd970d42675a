use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::models::{ClientDraft, MilestoneDraft, ProjectDraft, Tags};
use crate::services::{ClientService, ProjectService};

#[derive(Debug, Parser)]
#[command(
    name = "client-hub",
    version,
    about = "Manage clients, projects and milestones stored in the record backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Client records
    #[command(subcommand)]
    Clients(ClientCommand),
    /// Project records
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Project milestones
    #[command(subcommand)]
    Milestones(MilestoneCommand),
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    List,
    Get { id: i64 },
    Create(ClientArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ClientArgs,
    },
    Delete { id: i64 },
    /// Projects linked to a client
    Projects { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    List,
    Get { id: i64 },
    Create(ProjectArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProjectArgs,
    },
    Delete { id: i64 },
    /// Milestones of a project, by due date
    Milestones { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum MilestoneCommand {
    Create {
        project_id: i64,
        #[command(flatten)]
        fields: MilestoneArgs,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: MilestoneArgs,
    },
    Delete { id: i64 },
}

#[derive(Debug, Default, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// JSON object with the remaining fields (`-` reads stdin)
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
pub struct ProjectArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub deliverables: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub chat_enabled: Option<bool>,
    #[arg(long)]
    pub client_id: Option<i64>,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// JSON object with the remaining fields (`-` reads stdin)
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
pub struct MilestoneArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub due_date: Option<String>,
    #[arg(long)]
    pub completed: Option<bool>,
    /// JSON object with the remaining fields (`-` reads stdin)
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read JSON from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

impl ClientArgs {
    /// Flags win over fields read from `--json`.
    pub fn into_draft(self) -> Result<ClientDraft> {
        let base = match &self.json {
            Some(path) => ClientDraft::from_value(&read_json(path)?)?,
            None => ClientDraft::default(),
        };

        let flags = ClientDraft {
            name: self.name,
            company: self.company,
            email: self.email,
            phone: self.phone,
            website: self.website,
            address: self.address,
            industry: self.industry,
            status: self.status,
            tags: self.tags.map(Tags),
        };

        Ok(flags.or(base))
    }
}

impl ProjectArgs {
    pub fn into_draft(self) -> Result<ProjectDraft> {
        let base = match &self.json {
            Some(path) => ProjectDraft::from_value(&read_json(path)?)?,
            None => ProjectDraft::default(),
        };

        let flags = ProjectDraft {
            name: self.name,
            description: self.description,
            status: self.status,
            deadline: self.deadline,
            deliverables: self.deliverables,
            start_date: self.start_date,
            chat_enabled: self.chat_enabled,
            client_id: self.client_id,
            tags: self.tags.map(Tags),
        };

        Ok(flags.or(base))
    }
}

impl MilestoneArgs {
    pub fn into_draft(self) -> Result<MilestoneDraft> {
        let base = match &self.json {
            Some(path) => MilestoneDraft::from_value(&read_json(path)?)?,
            None => MilestoneDraft::default(),
        };

        let flags = MilestoneDraft {
            name: self.name,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            is_completed: self.completed,
        };

        Ok(flags.or(base))
    }
}

/// What a command produced, ready to be printed.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Records(Value),
    Deleted(bool),
    Missing(String),
}

impl Outcome {
    fn record<T: Serialize>(record: Option<T>, missing: impl FnOnce() -> String) -> Result<Self> {
        Ok(match record {
            Some(record) => Outcome::Records(serde_json::to_value(record)?),
            None => Outcome::Missing(missing()),
        })
    }

    fn records<T: Serialize>(records: Vec<T>) -> Result<Self> {
        Ok(Outcome::Records(serde_json::to_value(records)?))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Records(_) | Outcome::Deleted(true))
    }

    pub fn render(&self) -> String {
        match self {
            Outcome::Records(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Outcome::Deleted(true) => "deleted".to_string(),
            Outcome::Deleted(false) => "not deleted".to_string(),
            Outcome::Missing(message) => message.clone(),
        }
    }
}

pub async fn execute(
    command: Command,
    clients: &ClientService,
    projects: &ProjectService,
) -> Result<Outcome> {
    match command {
        Command::Clients(command) => execute_client(command, clients).await,
        Command::Projects(command) => execute_project(command, projects).await,
        Command::Milestones(command) => execute_milestone(command, projects).await,
    }
}

async fn execute_client(command: ClientCommand, clients: &ClientService) -> Result<Outcome> {
    match command {
        ClientCommand::List => Outcome::records(clients.get_all().await),
        ClientCommand::Get { id } => {
            Outcome::record(clients.get_by_id(id).await, || format!("Client {} not found", id))
        }
        ClientCommand::Create(fields) => {
            let draft = fields.into_draft()?;
            Outcome::record(clients.create(&draft).await, || {
                "Client was not created".to_string()
            })
        }
        ClientCommand::Update { id, fields } => {
            let draft = fields.into_draft()?;
            Outcome::record(clients.update(id, &draft).await, || {
                format!("Client {} was not updated", id)
            })
        }
        ClientCommand::Delete { id } => Ok(Outcome::Deleted(clients.delete(id).await)),
        ClientCommand::Projects { id } => {
            Outcome::records(clients.get_projects_by_client_id(id).await)
        }
    }
}

async fn execute_project(command: ProjectCommand, projects: &ProjectService) -> Result<Outcome> {
    match command {
        ProjectCommand::List => Outcome::records(projects.get_all().await),
        ProjectCommand::Get { id } => {
            Outcome::record(projects.get_by_id(id).await, || format!("Project {} not found", id))
        }
        ProjectCommand::Create(fields) => {
            let draft = fields.into_draft()?;
            Outcome::record(projects.create(&draft).await, || {
                "Project was not created".to_string()
            })
        }
        ProjectCommand::Update { id, fields } => {
            let draft = fields.into_draft()?;
            Outcome::record(projects.update(id, &draft).await, || {
                format!("Project {} was not updated", id)
            })
        }
        ProjectCommand::Delete { id } => Ok(Outcome::Deleted(projects.delete(id).await)),
        ProjectCommand::Milestones { id } => {
            Outcome::records(projects.get_milestones_by_project_id(id).await)
        }
    }
}

async fn execute_milestone(
    command: MilestoneCommand,
    projects: &ProjectService,
) -> Result<Outcome> {
    match command {
        MilestoneCommand::Create { project_id, fields } => {
            let draft = fields.into_draft()?;
            Outcome::record(projects.create_milestone(project_id, &draft).await, || {
                format!("Milestone was not created for project {}", project_id)
            })
        }
        MilestoneCommand::Update { id, fields } => {
            let draft = fields.into_draft()?;
            Outcome::record(projects.update_milestone(id, &draft).await, || {
                format!("Milestone {} was not updated", id)
            })
        }
        MilestoneCommand::Delete { id } => {
            Ok(Outcome::Deleted(projects.delete_milestone(id).await))
        }
    }
}
