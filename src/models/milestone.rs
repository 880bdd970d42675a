use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::draft::{DraftError, Loose, RecordBuilder};
use super::fields::lenient_text;
use super::Lookup;

pub const MILESTONE_FIELDS: &[&str] = &[
    "Name",
    "title_c",
    "description_c",
    "dueDate_c",
    "isCompleted_c",
    "completedDate_c",
    "createdAt_c",
    "projectId_c",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "title_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        rename = "description_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "dueDate_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<String>,
    #[serde(rename = "isCompleted_c", default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(
        rename = "completedDate_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_date: Option<String>,
    #[serde(
        rename = "createdAt_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(rename = "projectId_c", default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Lookup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Milestone {
    pub fn project_id(&self) -> Option<i64> {
        self.project.as_ref().and_then(Lookup::id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneDraft {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: Option<bool>,
}

impl MilestoneDraft {
    /// `Name` falls back to the title, then to the plain `name`.
    pub fn from_value(value: &Value) -> Result<Self, DraftError> {
        let input = Loose::new(value)?;

        Ok(Self {
            name: input.text(&["Name", "title", "name"])?,
            title: input.text(&["title_c", "title"])?,
            description: input.text(&["description_c", "description"])?,
            due_date: input.text(&["dueDate_c", "dueDate"])?,
            is_completed: input.flag(&["isCompleted_c", "isCompleted"])?,
        })
    }

    pub fn or(self, base: MilestoneDraft) -> Self {
        Self {
            name: self.name.or(base.name),
            title: self.title.or(base.title),
            description: self.description.or(base.description),
            due_date: self.due_date.or(base.due_date),
            is_completed: self.is_completed.or(base.is_completed),
        }
    }

    fn display_name(&self) -> Option<String> {
        self.name.clone().or_else(|| self.title.clone())
    }

    pub(crate) fn create_record(&self, project_id: i64, created_at: &str) -> Map<String, Value> {
        RecordBuilder::new()
            .opt("Name", self.display_name())
            .opt("title_c", self.title.clone())
            .set("description_c", self.description.clone().unwrap_or_default())
            .opt("dueDate_c", self.due_date.clone())
            .set("isCompleted_c", self.is_completed.unwrap_or(false))
            .set("completedDate_c", Value::Null)
            .set("createdAt_c", created_at)
            .set("projectId_c", project_id)
            .build()
    }

    /// `completedDate_c` is stamped with `now` when the draft marks the
    /// milestone completed and cleared otherwise.
    pub(crate) fn update_record(&self, id: i64, now: &str) -> Map<String, Value> {
        let completed_date = match self.is_completed {
            Some(true) => Value::from(now),
            _ => Value::Null,
        };

        RecordBuilder::with_id(id)
            .opt("Name", self.display_name())
            .opt("title_c", self.title.clone())
            .opt("description_c", self.description.clone())
            .opt("dueDate_c", self.due_date.clone())
            .opt("isCompleted_c", self.is_completed)
            .set("completedDate_c", completed_date)
            .build()
    }
}
