//! AddOptions - the two options `add` recognizes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::errors::SpindleError;
use super::{Priority, metadata::parse_timestamp, priority::normalize_priority};

/// Options for a single `add`.
///
/// Exactly two keys are recognized. When parsed from JSON, any other key is
/// rejected with [`SpindleError::InvalidOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddOptions {
    /// Raw priority; normalized at write time, never rejected.
    #[serde(default)]
    pub priority: Option<i64>,

    /// Entry is not extracted before this instant. Absent means ready now.
    #[serde(
        default,
        alias = "dequeue-timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub not_before: Option<DateTime<Utc>>,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SpindleError> {
        serde_json::from_str(raw).map_err(|e| SpindleError::InvalidOptions(e.to_string()))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SpindleError> {
        serde_json::from_value(value).map_err(|e| SpindleError::InvalidOptions(e.to_string()))
    }

    pub fn normalized_priority(&self) -> Option<Priority> {
        normalize_priority(self.priority)
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
