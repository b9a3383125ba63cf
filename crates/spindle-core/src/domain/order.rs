//! Ordering keys.
//!
//! `OrderKey` is the total order entries are extracted in: explicit priority
//! tiers first (highest priority first), then the unprioritized tier, ties
//! broken by ascending sequence. The derived `Ord` implementations encode
//! exactly that order, so ascending key order means "better ranked first".

use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

use super::Priority;

/// Per-queue insertion counter. Never exposed to callers of the queue API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The sequence `n` steps after this one (used to number a bulk batch).
    pub fn offset(self, n: u64) -> Self {
        Self(self.0.saturating_add(n))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority tier. Variant order is the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Explicit(Reverse<Priority>),
    Unprioritized,
}

impl Tier {
    pub fn of(priority: Option<Priority>) -> Self {
        match priority {
            Some(priority) => Tier::Explicit(Reverse(priority)),
            None => Tier::Unprioritized,
        }
    }

    pub fn priority(self) -> Option<Priority> {
        match self {
            Tier::Explicit(Reverse(priority)) => Some(priority),
            Tier::Unprioritized => None,
        }
    }

    fn encode(self) -> u8 {
        match self {
            // 100 -> 0, 1 -> 99
            Tier::Explicit(Reverse(priority)) => Priority::MAX - priority.get(),
            Tier::Unprioritized => u8::MAX,
        }
    }

    fn decode(byte: u8) -> Option<Self> {
        match byte {
            u8::MAX => Some(Tier::Unprioritized),
            rank if rank < Priority::MAX => {
                Priority::new(Priority::MAX - rank).map(|priority| Tier::Explicit(Reverse(priority)))
            }
            _ => None,
        }
    }
}

/// Position of an entry in its queue's extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderKey {
    tier: Tier,
    sequence: Sequence,
}

impl OrderKey {
    /// Length of [`OrderKey::encode`] output.
    pub const ENCODED_LEN: usize = 9;

    pub fn new(tier: Tier, sequence: Sequence) -> Self {
        Self { tier, sequence }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Fixed-width big-endian encoding for byte-ordered key-value stores.
    ///
    /// Lexicographic order of the encoded bytes equals the `Ord` order of the
    /// keys.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = self.tier.encode();
        out[1..].copy_from_slice(&self.sequence.get().to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&tier, sequence) = bytes.split_first()?;
        let sequence: [u8; 8] = sequence.try_into().ok()?;
        Some(Self {
            tier: Tier::decode(tier)?,
            sequence: Sequence::new(u64::from_be_bytes(sequence)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(priority: Option<u8>, sequence: u64) -> OrderKey {
        OrderKey::new(
            Tier::of(priority.and_then(Priority::new)),
            Sequence::new(sequence),
        )
    }

    #[rstest]
    #[case::higher_priority_first(key(Some(3), 9), key(Some(2), 1))]
    #[case::explicit_one_before_unprioritized(key(Some(1), 9), key(None, 1))]
    #[case::fifo_within_tier(key(Some(5), 1), key(Some(5), 2))]
    #[case::fifo_within_unprioritized(key(None, 1), key(None, 2))]
    fn ranks_before(#[case] better: OrderKey, #[case] worse: OrderKey) {
        assert!(better < worse);
    }

    #[test]
    fn encoded_order_matches_key_order() {
        let mut keys = vec![
            key(None, 2),
            key(Some(1), 7),
            key(None, 1),
            key(Some(100), 300),
            key(Some(50), 1),
            key(Some(100), 2),
        ];
        let mut encoded: Vec<_> = keys.iter().map(OrderKey::encode).collect();
        keys.sort();
        encoded.sort();

        let decoded: Vec<_> = encoded
            .iter()
            .map(|bytes| OrderKey::decode(bytes).unwrap())
            .collect();
        assert_eq!(decoded, keys);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert_eq!(OrderKey::decode(&[]), None);
        assert_eq!(OrderKey::decode(&[0u8; 4]), None);
        // tier byte 100 is between the explicit range and the unprioritized marker
        let mut bytes = key(None, 1).encode();
        bytes[0] = 100;
        assert_eq!(OrderKey::decode(&bytes), None);
    }
}
