use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::draft::{DraftError, Loose, RecordBuilder};
use super::fields::lenient_text;
use super::{Lookup, Tags};

/// Fields requested for every project read
pub const PROJECT_FIELDS: &[&str] = &[
    "Name",
    "description_c",
    "status_c",
    "deadline_c",
    "deliverables_c",
    "createdAt_c",
    "startDate_c",
    "chatEnabled_c",
    "Tags",
    "clientId_c",
];

pub const DEFAULT_PROJECT_STATUS: &str = "Planning";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
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
        rename = "description_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "status_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        rename = "deadline_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<String>,
    #[serde(
        rename = "deliverables_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub deliverables: Option<String>,
    #[serde(
        rename = "createdAt_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(
        rename = "startDate_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,
    #[serde(rename = "chatEnabled_c", default, skip_serializing_if = "Option::is_none")]
    pub chat_enabled: Option<bool>,
    #[serde(rename = "Tags", default)]
    pub tags: Tags,
    #[serde(rename = "clientId_c", default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Lookup>,
    /// Older records carry the client under `clientId`
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub legacy_client: Option<Lookup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Id of the owning client, whichever way the lookup was returned.
    pub fn client_id(&self) -> Option<i64> {
        self.client
            .as_ref()
            .and_then(Lookup::id)
            .or_else(|| self.legacy_client.as_ref().and_then(Lookup::id))
    }
}

/// Project input, before it is mapped onto `project_c` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub deliverables: Option<String>,
    pub start_date: Option<String>,
    pub chat_enabled: Option<bool>,
    pub client_id: Option<i64>,
    pub tags: Option<Tags>,
}

impl ProjectDraft {
    pub fn from_value(value: &Value) -> Result<Self, DraftError> {
        let input = Loose::new(value)?;

        Ok(Self {
            name: input.text(&["Name", "name"])?,
            description: input.text(&["description_c", "description"])?,
            status: input.text(&["status_c", "status"])?,
            deadline: input.text(&["deadline_c", "deadline"])?,
            deliverables: input.text(&["deliverables_c", "deliverables"])?,
            start_date: input.text(&["startDate_c", "startDate"])?,
            chat_enabled: input.flag(&["chatEnabled_c", "chatEnabled"])?,
            client_id: input.id(&["clientId_c", "clientId"])?,
            tags: input.tags(&["Tags"])?,
        })
    }

    /// Fields set on `self` take precedence over `base`.
    pub fn or(self, base: ProjectDraft) -> Self {
        Self {
            name: self.name.or(base.name),
            description: self.description.or(base.description),
            status: self.status.or(base.status),
            deadline: self.deadline.or(base.deadline),
            deliverables: self.deliverables.or(base.deliverables),
            start_date: self.start_date.or(base.start_date),
            chat_enabled: self.chat_enabled.or(base.chat_enabled),
            client_id: self.client_id.or(base.client_id),
            tags: self.tags.or(base.tags),
        }
    }

    fn fields(&self, record: RecordBuilder) -> RecordBuilder {
        record
            .opt("Name", self.name.clone())
            .opt("description_c", self.description.clone())
            .opt("deadline_c", self.deadline.clone())
            .opt("deliverables_c", self.deliverables.clone())
            .opt("startDate_c", self.start_date.clone())
            .opt("clientId_c", self.client_id)
    }

    fn tags_value(&self) -> Value {
        self.tags.clone().unwrap_or_default().to_value()
    }

    pub(crate) fn create_record(&self, created_at: &str) -> Map<String, Value> {
        self.fields(RecordBuilder::new())
            .set(
                "status_c",
                self.status
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()),
            )
            .set("chatEnabled_c", self.chat_enabled.unwrap_or(true))
            .set("createdAt_c", created_at)
            .set("Tags", self.tags_value())
            .build()
    }

    pub(crate) fn update_record(&self, id: i64) -> Map<String, Value> {
        self.fields(RecordBuilder::with_id(id))
            .opt("status_c", self.status.clone())
            .opt("chatEnabled_c", self.chat_enabled)
            .set("Tags", self.tags_value())
            .build()
    }
}
