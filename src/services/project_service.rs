use std::sync::Arc;

use tracing::instrument;

use super::error::OrLog;
use super::{RecordTable, ServiceError};
use crate::backend::{FetchParams, RecordApi, SortType, WhereClause};
use crate::models::{
    timestamp_now, Milestone, MilestoneDraft, Project, ProjectDraft, MILESTONE_FIELDS,
    PROJECT_FIELDS,
};

pub const PROJECT_TABLE: &str = "project_c";
pub const MILESTONE_TABLE: &str = "milestone_c";

/// Projects and their milestones.
#[derive(Clone)]
pub struct ProjectService {
    projects: RecordTable,
    milestones: RecordTable,
}

impl ProjectService {
    pub fn new(api: Arc<dyn RecordApi>) -> Self {
        Self {
            projects: RecordTable::new(api.clone(), PROJECT_TABLE, "project"),
            milestones: RecordTable::new(api, MILESTONE_TABLE, "milestone"),
        }
    }

    /// All projects, ordered by name.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Project> {
        let params = FetchParams::with_fields(PROJECT_FIELDS).order_by("Name", SortType::Asc);

        self.projects
            .fetch(&params)
            .await
            .or_log(|| "Error fetching projects".to_string())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Option<Project> {
        let result = async {
            if id <= 0 {
                return Err(ServiceError::InvalidId("Valid project ID is required"));
            }
            let params = FetchParams::with_fields(PROJECT_FIELDS);
            self.projects.get::<Project>(id, &params).await
        }
        .await;

        result.or_log(|| format!("Error fetching project with ID {}", id))
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &ProjectDraft) -> Option<Project> {
        let record = draft.create_record(&timestamp_now());

        self.projects
            .create(record)
            .await
            .or_log(|| "Error creating project".to_string())
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &ProjectDraft) -> Option<Project> {
        self.projects
            .update(draft.update_record(id))
            .await
            .or_log(|| "Error updating project".to_string())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> bool {
        self.projects
            .delete(id)
            .await
            .or_log(|| "Error deleting project".to_string())
    }

    // Milestone operations

    /// Milestones of one project, earliest due date first.
    #[instrument(skip(self))]
    pub async fn get_milestones_by_project_id(&self, project_id: i64) -> Vec<Milestone> {
        let params = FetchParams::with_fields(MILESTONE_FIELDS)
            .filter(WhereClause::equal_to("projectId_c", project_id))
            .order_by("dueDate_c", SortType::Asc);

        self.milestones
            .fetch(&params)
            .await
            .or_log(|| "Error fetching milestones".to_string())
    }

    #[instrument(skip(self, draft))]
    pub async fn create_milestone(
        &self,
        project_id: i64,
        draft: &MilestoneDraft,
    ) -> Option<Milestone> {
        let record = draft.create_record(project_id, &timestamp_now());

        self.milestones
            .create(record)
            .await
            .or_log(|| "Error creating milestone".to_string())
    }

    #[instrument(skip(self, draft))]
    pub async fn update_milestone(&self, id: i64, draft: &MilestoneDraft) -> Option<Milestone> {
        let record = draft.update_record(id, &timestamp_now());

        self.milestones
            .update(record)
            .await
            .or_log(|| "Error updating milestone".to_string())
    }

    #[instrument(skip(self))]
    pub async fn delete_milestone(&self, id: i64) -> bool {
        self.milestones
            .delete(id)
            .await
            .or_log(|| "Error deleting milestone".to_string())
    }
}
