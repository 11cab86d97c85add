//! Error and warning types produced by the allocation engine.
//!
//! Every fatal variant names the entity (and, where relevant, the conflicting id or entity) so the
//! driver can print it verbatim. [`ChangedId`] is the only non-fatal diagnostic.

use std::fmt;

use thiserror::Error;

/// Fatal allocation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The same name was requested twice within one run.
    #[error("name {name} duplicated")]
    DuplicateName { name: String },

    /// Two distinct names resolved to the same id.
    #[error("{id} duplicated: {existing} and {requested}")]
    DuplicateId { id: u32, existing: String, requested: String },

    /// No id is left in `[min, max]` for an auto-assignment.
    #[error("rand for {name} failed, there is no available values in range [{min}, {max}]")]
    Exhausted { name: String, min: u32, max: u32 },

    /// `generate` was called after the allocator was finalized.
    #[error("cannot generate {name}: allocator already finalized")]
    Finalized { name: String },

    /// A previously persisted entry clashes with one loaded earlier.
    #[error("previous entry {name} = {id} conflicts with {existing}")]
    PreviousConflict { name: String, id: u32, existing: String },
}

impl AllocError {
    /// The entity the error is about.
    pub fn entity(&self) -> &str {
        match self {
            AllocError::DuplicateName { name }
            | AllocError::Exhausted { name, .. }
            | AllocError::Finalized { name }
            | AllocError::PreviousConflict { name, .. } => name,
            AllocError::DuplicateId { requested, .. } => requested,
        }
    }
}

/// A name's id differs from its previously persisted value.
///
/// Raised either by an explicit override or because the previous id fell outside the current
/// range. The run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedId {
    pub name: String,
    pub old: u32,
    pub new: u32,
}

impl fmt::Display for ChangedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} updated: {} -> {}", self.name, self.old, self.new)
    }
}
