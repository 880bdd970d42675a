use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client_hub::backend::{HttpRecordClient, RecordApi};
use client_hub::cli::{self, Cli};
use client_hub::config;
use client_hub::services::{ClientService, ProjectService};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout only carries records
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "client_hub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    debug!(api_url = config.api_url(), "Using record API");

    // One HTTP client shared by every service
    let api: Arc<dyn RecordApi> = Arc::new(HttpRecordClient::new(&config)?);
    let clients = ClientService::new(api.clone());
    let projects = ProjectService::new(api);

    let outcome = cli::execute(cli.command, &clients, &projects).await?;

    if outcome.is_success() {
        println!("{}", outcome.render());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", outcome.render());
        Ok(ExitCode::FAILURE)
    }
}
