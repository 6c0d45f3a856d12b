//! Error taxonomy for the order-lifecycle core.
//!
//! Validation and lifecycle guard failures are typed so callers can route
//! them to the transient banner channel; persistence failures carry the
//! collaborator's message and surface as persistent banners.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PosError {
    /// Send/pay attempted with no priced items in the session.
    #[error("Please add items to the order before proceeding")]
    EmptyOrder,

    /// Pay attempted on a check that has already been closed.
    #[error("Check {0} is already closed")]
    AlreadyClosed(i64),

    /// The open ledger has no check with this id.
    #[error("Check {0} not found in the open ledger")]
    CheckNotFound(i64),

    /// The catalog has no dish with this id.
    #[error("Dish {0} is not in the menu catalog")]
    DishNotFound(i64),

    /// A second session was started while one is active.
    #[error("An order session is already active")]
    SessionAlreadyActive,

    /// A session operation was invoked with no active session.
    #[error("No active order session")]
    NoActiveSession,

    /// A commit or mutation arrived while the session is dispatching.
    #[error("Kitchen dispatch in progress, please wait")]
    DispatchInProgress,

    /// Defensive guard on table/covers input.
    #[error("Table and covers must both be greater than zero")]
    InvalidTableCovers,

    /// Persistence collaborator failure (already user-friendly text).
    #[error("{0}")]
    Api(String),
}

impl PosError {
    /// Whether this error should be shown as a transient, auto-dismissed
    /// banner (validation/guard failures) rather than a persistent one.
    pub fn is_transient(&self) -> bool {
        !matches!(self, PosError::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            PosError::EmptyOrder.to_string(),
            "Please add items to the order before proceeding"
        );
        assert_eq!(
            PosError::AlreadyClosed(12345678).to_string(),
            "Check 12345678 is already closed"
        );
        assert_eq!(
            PosError::Api("Cannot reach order service".into()).to_string(),
            "Cannot reach order service"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(PosError::EmptyOrder.is_transient());
        assert!(PosError::InvalidTableCovers.is_transient());
        assert!(!PosError::Api("boom".into()).is_transient());
    }
}
