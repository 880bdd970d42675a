use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A field selector: `{ "field": { "Name": "email_c" } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: FieldName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn equal_to(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.into(),
            operator: "EqualTo".to_string(),
            values: vec![value.into()],
        }
    }
}

/// Parameters for `fetch_records` and `get_record_by_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub fields: Vec<FieldSpec>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<WhereClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl FetchParams {
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| FieldSpec::new(*f)).collect(),
            ..Default::default()
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.into(),
            sort_type,
        });
        self
    }

    pub fn filter(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }
}

/// Body of create and update calls: `{ "records": [ ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPayload {
    pub records: Vec<Map<String, Value>>,
}

impl RecordsPayload {
    pub fn single(record: Map<String, Value>) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// Body of delete calls: `{ "RecordIds": [ ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

impl DeleteParams {
    pub fn single(id: i64) -> Self {
        Self {
            record_ids: vec![id],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Envelope returned by create, update and delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

/// Outcome for a single record inside a mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel", default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.field_label.as_deref().unwrap_or("unknown field"),
            self.message.as_deref().unwrap_or("invalid value")
        )
    }
}
