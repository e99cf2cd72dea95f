use thiserror::Error;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Cart is empty or not found")]
    CartEmptyOrMissing,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Cannot transition order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Cannot cancel orders that have been shipped or delivered")]
    CancelNotAllowed,

    #[error("Order is already cancelled")]
    AlreadyCancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Business-rule failures are reported to the caller inside the mutation
    /// result; only `Internal` propagates as a fault.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, DomainError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_classification() {
        assert!(DomainError::UserNotFound.is_business_rule());
        assert!(DomainError::CartEmptyOrMissing.is_business_rule());
        assert!(DomainError::OrderNotFound.is_business_rule());
        assert!(DomainError::AlreadyCancelled.is_business_rule());
        assert!(DomainError::CancelNotAllowed.is_business_rule());
        assert!(!DomainError::Internal("db down".to_string()).is_business_rule());
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = DomainError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        };
        assert_eq!(err.to_string(), "Cannot transition order from PENDING to SHIPPED");
    }

    #[test]
    fn cancellation_guard_messages() {
        assert_eq!(
            DomainError::CancelNotAllowed.to_string(),
            "Cannot cancel orders that have been shipped or delivered"
        );
        assert_eq!(DomainError::AlreadyCancelled.to_string(), "Order is already cancelled");
    }
}
