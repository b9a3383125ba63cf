//! Entry - one stored payload plus its ordering and readiness attributes.

use chrono::{DateTime, Utc};

use super::{Metadata, OrderKey, Priority, Sequence, Tier};

/// Immutable stored entry.
///
/// The payload is kept byte-for-byte; nothing in the engine interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    payload: Vec<u8>,
    priority: Option<Priority>,
    not_before: Option<DateTime<Utc>>,
    sequence: Sequence,
}

impl Entry {
    pub fn new(
        payload: Vec<u8>,
        priority: Option<Priority>,
        not_before: Option<DateTime<Utc>>,
        sequence: Sequence,
    ) -> Self {
        Self {
            payload,
            priority,
            not_before,
            sequence,
        }
    }

    pub fn key(&self) -> OrderKey {
        OrderKey::new(Tier::of(self.priority), self.sequence)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Eligible for extraction at `now`: no not-before, or it has been reached.
    pub fn is_ready_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before.is_none_or(|at| at <= now)
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.priority, self.not_before)
    }

    pub fn into_item(self) -> Item {
        let metadata = self.metadata();
        Item {
            payload: self.payload,
            metadata,
        }
    }
}

/// What callers get back from `remove`, `peek` and `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    payload: Vec<u8>,
    metadata: Metadata,
}

impl Item {
    pub fn new(payload: impl Into<Vec<u8>>, metadata: Metadata) -> Self {
        Self {
            payload: payload.into(),
            metadata,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as text, when it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (Vec<u8>, Metadata) {
        (self.payload, self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn readiness_is_inclusive_of_not_before() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let entry = Entry::new(b"x".to_vec(), None, Some(at), Sequence::new(1));

        assert!(!entry.is_ready_at(at - Duration::milliseconds(1)));
        assert!(entry.is_ready_at(at));
        assert!(entry.is_ready_at(at + Duration::seconds(5)));
    }

    #[test]
    fn entry_without_not_before_is_always_ready() {
        let entry = Entry::new(vec![], None, None, Sequence::new(1));
        assert!(entry.is_ready_at(DateTime::<Utc>::MIN_UTC));
    }

    #[test]
    fn into_item_keeps_payload_and_explicit_attributes() {
        let entry = Entry::new(
            vec![0xff, 0x00, 0x80],
            Priority::new(7),
            None,
            Sequence::new(3),
        );
        let item = entry.into_item();

        assert_eq!(item.payload(), &[0xff, 0x00, 0x80]);
        assert_eq!(item.payload_str(), None);
        assert_eq!(item.metadata(), &Metadata::empty().with_priority(7));
    }
}
