use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutDraft, ListResult, OrderChanges, OrderView};
use crate::domain::ports::OrderRepository;

/// Uniform outcome of a lifecycle mutation.
///
/// Expected business-rule violations (missing user, empty cart, invalid
/// transition, disallowed cancellation, not-found) land here with
/// `success = false`; infrastructure faults never do — they propagate as
/// `DomainError::Internal` for the HTTP layer to turn into a 500.
#[derive(Debug, Clone)]
pub struct OrderMutationResult {
    pub success: bool,
    pub message: String,
    pub order: Option<OrderView>,
}

impl OrderMutationResult {
    fn ok(message: &str, order: OrderView) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            order: Some(order),
        }
    }

    fn rejected(err: &DomainError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            order: None,
        }
    }
}

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    fn fold(
        result: Result<OrderView, DomainError>,
        success_message: &str,
    ) -> Result<OrderMutationResult, DomainError> {
        match result {
            Ok(order) => Ok(OrderMutationResult::ok(success_message, order)),
            Err(e) if e.is_business_rule() => Ok(OrderMutationResult::rejected(&e)),
            Err(e) => Err(e),
        }
    }

    pub fn create_order(
        &self,
        user_id: Uuid,
        actor: &str,
        draft: CheckoutDraft,
    ) -> Result<OrderMutationResult, DomainError> {
        Self::fold(
            self.repo.checkout(user_id, actor, draft),
            "Order created successfully",
        )
    }

    pub fn update_order(
        &self,
        id: Uuid,
        actor: &str,
        changes: OrderChanges,
    ) -> Result<OrderMutationResult, DomainError> {
        Self::fold(
            self.repo.update(id, actor, changes),
            "Order updated successfully",
        )
    }

    /// Cancellation entry point; never deletes a row.
    pub fn cancel_order(
        &self,
        id: Uuid,
        actor: &str,
        reason: Option<String>,
    ) -> Result<OrderMutationResult, DomainError> {
        Self::fold(
            self.repo.cancel(id, actor, reason),
            "Order cancelled successfully",
        )
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page, limit)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;
    use crate::domain::order::{generate_order_number, OrderStatus};

    /// Repository stub that answers every call with a preconfigured result.
    struct StubRepo {
        outcome: Result<(), DomainError>,
    }

    impl StubRepo {
        fn ok() -> Self {
            Self { outcome: Ok(()) }
        }

        fn failing(err: DomainError) -> Self {
            Self { outcome: Err(err) }
        }

        fn resolve(&self) -> Result<OrderView, DomainError> {
            match &self.outcome {
                Ok(()) => Ok(sample_order()),
                Err(DomainError::UserNotFound) => Err(DomainError::UserNotFound),
                Err(DomainError::CartEmptyOrMissing) => Err(DomainError::CartEmptyOrMissing),
                Err(DomainError::OrderNotFound) => Err(DomainError::OrderNotFound),
                Err(DomainError::InvalidTransition { from, to }) => {
                    Err(DomainError::InvalidTransition { from: *from, to: *to })
                }
                Err(DomainError::CancelNotAllowed) => Err(DomainError::CancelNotAllowed),
                Err(DomainError::AlreadyCancelled) => Err(DomainError::AlreadyCancelled),
                Err(DomainError::Internal(msg)) => Err(DomainError::Internal(msg.clone())),
            }
        }
    }

    fn sample_order() -> OrderView {
        let zero = BigDecimal::from_str("0").unwrap();
        OrderView {
            id: Uuid::new_v4(),
            order_number: generate_order_number(),
            user_id: Uuid::new_v4(),
            status: OrderStatus::Pending,
            subtotal: BigDecimal::from_str("25.00").unwrap(),
            tax_amount: zero.clone(),
            shipping_amount: zero.clone(),
            discount_amount: zero.clone(),
            total_amount: BigDecimal::from_str("25.00").unwrap(),
            currency: "USD".to_string(),
            notes: None,
            shipping_address_id: None,
            billing_address_id: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            items: vec![],
            history: vec![],
        }
    }

    impl OrderRepository for StubRepo {
        fn checkout(
            &self,
            _user_id: Uuid,
            _actor: &str,
            _draft: CheckoutDraft,
        ) -> Result<OrderView, DomainError> {
            self.resolve()
        }

        fn find_by_id(&self, _id: Uuid) -> Result<Option<OrderView>, DomainError> {
            self.resolve().map(Some)
        }

        fn update(
            &self,
            _id: Uuid,
            _actor: &str,
            _changes: OrderChanges,
        ) -> Result<OrderView, DomainError> {
            self.resolve()
        }

        fn cancel(
            &self,
            _id: Uuid,
            _actor: &str,
            _reason: Option<String>,
        ) -> Result<OrderView, DomainError> {
            self.resolve()
        }

        fn list(&self, _page: i64, _limit: i64) -> Result<ListResult, DomainError> {
            Ok(ListResult {
                items: vec![],
                total: 0,
            })
        }
    }

    #[test]
    fn successful_checkout_yields_success_result() {
        let service = OrderService::new(StubRepo::ok());
        let result = service
            .create_order(Uuid::new_v4(), "system", CheckoutDraft::default())
            .expect("no fault expected");
        assert!(result.success);
        assert_eq!(result.message, "Order created successfully");
        assert!(result.order.is_some());
    }

    #[test]
    fn missing_user_is_folded_into_the_result() {
        let service = OrderService::new(StubRepo::failing(DomainError::UserNotFound));
        let result = service
            .create_order(Uuid::new_v4(), "system", CheckoutDraft::default())
            .expect("business failures are not faults");
        assert!(!result.success);
        assert_eq!(result.message, "User not found");
        assert!(result.order.is_none());
    }

    #[test]
    fn empty_cart_is_folded_into_the_result() {
        let service = OrderService::new(StubRepo::failing(DomainError::CartEmptyOrMissing));
        let result = service
            .create_order(Uuid::new_v4(), "system", CheckoutDraft::default())
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Cart is empty or not found");
    }

    #[test]
    fn invalid_transition_message_names_the_pair() {
        let service = OrderService::new(StubRepo::failing(DomainError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        }));
        let changes = OrderChanges {
            new_status: Some(OrderStatus::Shipped),
            ..OrderChanges::default()
        };
        let result = service.update_order(Uuid::new_v4(), "system", changes).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Cannot transition order from PENDING to SHIPPED");
    }

    #[test]
    fn cancel_guards_are_folded_into_the_result() {
        let service = OrderService::new(StubRepo::failing(DomainError::CancelNotAllowed));
        let result = service.cancel_order(Uuid::new_v4(), "system", None).unwrap();
        assert!(!result.success);
        assert_eq!(
            result.message,
            "Cannot cancel orders that have been shipped or delivered"
        );

        let service = OrderService::new(StubRepo::failing(DomainError::AlreadyCancelled));
        let result = service.cancel_order(Uuid::new_v4(), "system", None).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Order is already cancelled");
    }

    #[test]
    fn infrastructure_faults_propagate() {
        let service =
            OrderService::new(StubRepo::failing(DomainError::Internal("pool exhausted".into())));
        let err = service
            .create_order(Uuid::new_v4(), "system", CheckoutDraft::default())
            .expect_err("internal errors must not be folded");
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
