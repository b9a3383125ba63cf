//! QueueName - validated queue identifier.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

use super::errors::SpindleError;

/// Default upper bound on name length, in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueueName(String);

impl QueueName {
    /// Validate with [`DEFAULT_MAX_NAME_LEN`].
    pub fn new(name: impl Into<String>) -> Result<Self, SpindleError> {
        Self::parse(name, DEFAULT_MAX_NAME_LEN)
    }

    /// Names must be non-empty and at most `max_len` bytes.
    pub fn parse(name: impl Into<String>, max_len: usize) -> Result<Self, SpindleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SpindleError::InvalidQueueName(
                "queue name must not be empty".to_string(),
            ));
        }
        if name.len() > max_len {
            return Err(SpindleError::InvalidQueueName(format!(
                "queue name is {} bytes, limit is {max_len}",
                name.len()
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QueueName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert!(matches!(
            QueueName::new(""),
            Err(SpindleError::InvalidQueueName(_))
        ));
        assert!(QueueName::parse("abcd", 3).is_err());
        assert_eq!(QueueName::parse("abc", 3).unwrap().as_str(), "abc");
    }

    #[test]
    fn multibyte_names_are_measured_in_bytes() {
        // 3 characters, 9 bytes
        assert!(QueueName::parse("മലയ", 8).is_err());
        assert!(QueueName::parse("മലയ", 9).is_ok());
    }
}
