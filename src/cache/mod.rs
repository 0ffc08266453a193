//! TTL entry store
//!
//! A generic map from tenant key to the most recently stored value. Every
//! `put` restarts the entry's time-to-live; entries that are not refreshed
//! become invisible after the TTL and are dropped by a background sweep
//! that runs at a coarser interval. Each dropped entry, whether swept or
//! explicitly removed, is reported exactly once to an [`EvictionHook`]
//! supplied at construction.

pub mod entry;
pub mod store;

pub use entry::{EvictionCause, EvictionHook};
pub use store::{EntryStore, MAX_LIFETIME};
