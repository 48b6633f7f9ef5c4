//! Traits and types for Extensor store interaction.
//!
//! If you want to put the cache in front of your own store, you are in the right place:
//! implement [`Backend`] for it and hand it to the cache builder.
mod backend;
mod error;

pub use backend::{Backend, BackendResult};
pub use error::BackendError;

/// Status of a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record removed; carries the number of removed records.
    Deleted(u32),
    /// Record was already missing.
    Missing,
}
