//! Domain model (entries, ordering keys, options, metadata).

pub mod entry;
pub mod errors;
pub mod metadata;
pub mod name;
pub mod options;
pub mod order;
pub mod priority;

pub use entry::{Entry, Item};
pub use errors::{Result, SpindleError};
pub use metadata::{Metadata, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
pub use name::QueueName;
pub use options::AddOptions;
pub use order::{OrderKey, Sequence, Tier};
pub use priority::{Priority, normalize_priority};
