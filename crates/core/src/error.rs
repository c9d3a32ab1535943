//! Domain-level error taxonomy.
//!
//! Every variant maps onto exactly one HTTP status in `hrx-api`, so domain
//! checks can be written as early-return guards and propagated with `?`.

use crate::types::DbId;

/// A domain-level error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity was looked up by id and does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A token-addressed lookup found nothing. Tokens are opaque, so the
    /// message never echoes them back.
    #[error("Invalid or unknown {0} token")]
    UnknownToken(&'static str),

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The requested action was already performed (terminal state reached).
    #[error("{0}")]
    Conflict(String),

    /// A token or deadline has expired; the resource is permanently gone.
    #[error("{0}")]
    Gone(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// Anything unexpected. The message is logged, never user-surfaced.
    #[error("{0}")]
    Internal(String),
}
