//! Domain error taxonomy shared by every actor in the engine.
//!
//! All operations surface one of these kinds at the boundary. `InvalidState`
//! is the transition-guard failure (a bad request, never a crash);
//! `Unavailable` covers actor channel failures and plays no part in the
//! domain rules.

use thiserror::Error;

use crate::framework::FrameworkError;
use crate::model::OrderStatus;

/// Caller-visible error kinds for every engine operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketError {
    /// The entity is absent, soft-deleted, or not visible to the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Wrong role, inactive account, or an actor that does not own the
    /// resource it is operating on.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Empty cart, insufficient stock, invalid exchange target, and similar
    /// input problems.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Double payment authorization.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested transition is not legal from the order's current status.
    #[error("cannot {action} an order in status {status:?}")]
    InvalidState {
        action: &'static str,
        status: OrderStatus,
    },

    /// An actor channel was closed or dropped mid-request.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for MarketError {
    fn from(msg: String) -> Self {
        MarketError::Unavailable(msg)
    }
}

impl From<FrameworkError> for MarketError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => MarketError::NotFound(id),
            // Entity hooks return `MarketError`; recover the typed kind from
            // the boxed transport so callers never see a stringly error.
            FrameworkError::EntityError(inner) => match inner.downcast::<MarketError>() {
                Ok(domain) => *domain,
                Err(other) => MarketError::Unavailable(other.to_string()),
            },
            other => MarketError::Unavailable(other.to_string()),
        }
    }
}
