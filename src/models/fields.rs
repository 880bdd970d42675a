use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A lookup (foreign key) field.
///
/// The record API returns lookups either as the bare id or as an embedded
/// record; anything else is kept verbatim and has no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup {
    Id(i64),
    Record {
        #[serde(rename = "Id")]
        id: i64,
        #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Other(Value),
}

impl Lookup {
    pub fn id(&self) -> Option<i64> {
        match self {
            Lookup::Id(id) | Lookup::Record { id, .. } => Some(*id),
            Lookup::Other(_) => None,
        }
    }
}

/// Record tags. Sent as an array, accepted as an array or as one
/// comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tags(pub Vec<String>);

impl Tags {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parse(raw: &str) -> Self {
        Tags(
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::from(self.0.clone())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Joined(String),
            Missing(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::List(tags) => Tags(tags),
            Raw::Joined(raw) => Tags::parse(&raw),
            Raw::Missing(()) => Tags::default(),
        })
    }
}

/// Text field that the backend sometimes stores as a number or a boolean
/// (phone numbers, zip codes). Scalars are kept as their JSON text.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}
