use std::fmt;

use aide_de_camp::core::DateTime;
use bincode::{Decode, Encode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Opaque concurrency token assigned by the store on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    const ANY: &'static str = "*";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Wildcard tag, matches whatever the store currently holds.
    pub fn any() -> Self {
        Self(Self::ANY.to_string())
    }

    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn matches(&self, stored: &ETag) -> bool {
        self.is_any() || self == stored
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A background job as persisted in a key-partitioned table.
///
/// `partition_key` and `row_key` identify the row. `timestamp` and `etag`
/// are owned by the store and overwritten on every successful write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobEntity {
    pub content: String,
    pub json_content: String,
    pub partition_key: String,
    pub row_key: String,
    pub timestamp: Option<DateTime>,
    #[serde(rename = "ETag")]
    pub etag: ETag,
}

impl JobEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_json_content<T: Serialize>(mut self, value: &T) -> serde_json::Result<Self> {
        self.json_content = serde_json::to_string(value)?;
        Ok(self)
    }

    pub fn json_content_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.json_content)
    }
}

/// Encoded shape of a stored entity.
#[derive(Debug, Clone, Encode, Decode)]
pub struct JobRow {
    pub partition_key: String,
    pub row_key: String,
    pub timestamp_micros: i64,
    pub etag: String,
    pub content: String,
    pub json_content: String,
}
