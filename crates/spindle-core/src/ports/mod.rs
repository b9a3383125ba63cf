//! Ports - the seams to external collaborators.
//!
//! - **EntryStore**: the ordered store entries live in
//! - **Clock**: where "now" comes from

pub mod clock;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::store::{EntryStore, StoreError};
