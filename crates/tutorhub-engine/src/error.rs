//! # Engine Error Taxonomy
//!
//! Every coordination operation fails with one of these. All represent
//! business-rule violations surfaced synchronously to the caller — none is
//! retried internally. `Store` is the exception: a durable-write failure
//! after which in-memory state has been rolled back.

use thiserror::Error;
use tutorhub_store::StoreError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or incomplete input. Caller error, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation not legal in the entity's current status, e.g. approving a
    /// non-pending offering or joining a class twice.
    #[error("state error: {0}")]
    State(String),

    /// The operation would violate a scheduling invariant. The message names
    /// the conflicting entity.
    #[error("schedule conflict: {0}")]
    Conflict(String),

    /// Durable write failed; in-memory state was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}
