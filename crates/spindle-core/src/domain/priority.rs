//! Priority - explicit priority values and their normalization.

use serde::Serialize;
use std::fmt;

/// Explicit priority of an entry, always within `[Priority::MIN, Priority::MAX]`.
///
/// An entry added without a priority carries no `Priority` at all. That is a
/// tier of its own which ranks below every explicit priority, including 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Exact constructor; `None` when `value` is out of range.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Coerce a caller-supplied value into range.
    ///
    /// Anything below `MIN` or above `MAX` becomes `MIN`. Values above the
    /// maximum are demoted to the minimum, not clamped to `MAX`.
    pub fn normalize(value: i64) -> Self {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self(Self::MIN))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// No input stays absent; present input is normalized.
pub fn normalize_priority(input: Option<i64>) -> Option<Priority> {
    input.map(Priority::normalize)
}
