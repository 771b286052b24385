//! Store ports for orders and tags (implemented in `orderdesk-infra`).

use async_trait::async_trait;

use orderdesk_core::{OrderId, OrderTagId, StoreResult};

use crate::{DateRange, Deactivation, NewOrder, NewOrderTag, Order, OrderTag};

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, ascending by id.
    async fn list(&self) -> StoreResult<Vec<Order>>;

    /// Insert a new, active order. Tag ids must already exist.
    async fn insert(&self, new: NewOrder) -> StoreResult<Order>;

    /// Atomically move an order from active to inactive.
    ///
    /// Concurrent callers for the same id observe exactly one
    /// `Deactivated`. Unknown ids yield `StoreError::NotFound`.
    async fn deactivate(&self, id: OrderId) -> StoreResult<Deactivation>;

    /// Orders contained in `range`, ascending by id.
    async fn within(&self, range: DateRange) -> StoreResult<Vec<Order>>;
}

#[async_trait]
pub trait OrderTagStore: Send + Sync {
    /// All tags, ascending by id.
    async fn list(&self) -> StoreResult<Vec<OrderTag>>;

    async fn insert(&self, new: NewOrderTag) -> StoreResult<OrderTag>;

    /// The subset of `ids` that exist.
    async fn existing(&self, ids: &[OrderTagId]) -> StoreResult<Vec<OrderTagId>>;
}
