use uuid::Uuid;

use super::errors::DomainError;
use super::order::{CheckoutDraft, ListResult, OrderChanges, OrderView};

/// Persistence seam for the order lifecycle.
///
/// Each mutating method is one atomic unit of work: either every row change
/// it implies commits, or none do. Business-rule violations surface as the
/// corresponding `DomainError` variants; infrastructure faults as
/// `DomainError::Internal`.
pub trait OrderRepository: Send + Sync + 'static {
    /// Turn `user_id`'s active cart into an order (items snapshotted, cart
    /// deactivated and emptied, initial history row, outbox event).
    fn checkout(
        &self,
        user_id: Uuid,
        actor: &str,
        draft: CheckoutDraft,
    ) -> Result<OrderView, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Apply field changes and an optional validated status transition.
    fn update(&self, id: Uuid, actor: &str, changes: OrderChanges)
        -> Result<OrderView, DomainError>;

    /// Cancel the order (status change, never a row deletion).
    fn cancel(
        &self,
        id: Uuid,
        actor: &str,
        reason: Option<String>,
    ) -> Result<OrderView, DomainError>;

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}
