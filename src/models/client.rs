use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::draft::{DraftError, Loose, RecordBuilder};
use super::fields::lenient_text;
use super::Tags;

/// Fields requested for every client read
pub const CLIENT_FIELDS: &[&str] = &[
    "Name",
    "company_c",
    "email_c",
    "phone_c",
    "website_c",
    "address_c",
    "industry_c",
    "status_c",
    "createdAt_c",
    "Tags",
];

pub const DEFAULT_CLIENT_STATUS: &str = "Active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
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
        rename = "company_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(
        rename = "email_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        rename = "phone_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        rename = "website_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub website: Option<String>,
    #[serde(
        rename = "address_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    #[serde(
        rename = "industry_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub industry: Option<String>,
    #[serde(
        rename = "status_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        rename = "createdAt_c",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Tags,
    /// System fields the backend adds on its own (owner, audit columns, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client input, before it is mapped onto `client_c` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDraft {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Tags>,
}

impl ClientDraft {
    /// Read a draft from a loose JSON object. Both the qualified field name
    /// (`email_c`) and the plain one (`email`) are accepted; the qualified
    /// one wins.
    pub fn from_value(value: &Value) -> Result<Self, DraftError> {
        let input = Loose::new(value)?;

        Ok(Self {
            name: input.text(&["Name", "name"])?,
            company: input.text(&["company_c", "company"])?,
            email: input.text(&["email_c", "email"])?,
            phone: input.text(&["phone_c", "phone"])?,
            website: input.text(&["website_c", "website"])?,
            address: input.text(&["address_c", "address"])?,
            industry: input.text(&["industry_c", "industry"])?,
            status: input.text(&["status_c", "status"])?,
            tags: input.tags(&["Tags"])?,
        })
    }

    /// Fields set on `self` take precedence over `base`.
    pub fn or(self, base: ClientDraft) -> Self {
        Self {
            name: self.name.or(base.name),
            company: self.company.or(base.company),
            email: self.email.or(base.email),
            phone: self.phone.or(base.phone),
            website: self.website.or(base.website),
            address: self.address.or(base.address),
            industry: self.industry.or(base.industry),
            status: self.status.or(base.status),
            tags: self.tags.or(base.tags),
        }
    }

    fn fields(&self, record: RecordBuilder) -> RecordBuilder {
        record
            .opt("Name", self.name.clone())
            .opt("company_c", self.company.clone())
            .opt("email_c", self.email.clone())
            .opt("phone_c", self.phone.clone())
            .opt("website_c", self.website.clone())
            .opt("address_c", self.address.clone())
            .opt("industry_c", self.industry.clone())
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
                    .unwrap_or_else(|| DEFAULT_CLIENT_STATUS.to_string()),
            )
            .set("createdAt_c", created_at)
            .set("Tags", self.tags_value())
            .build()
    }

    pub(crate) fn update_record(&self, id: i64) -> Map<String, Value> {
        self.fields(RecordBuilder::with_id(id))
            .opt("status_c", self.status.clone())
            .set("Tags", self.tags_value())
            .build()
    }
}
