use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{Entity, OrderId, OrderTagId};

/// Validated input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub start_date: NaiveDate,
    pub embargo_date: NaiveDate,
    /// Sorted, without duplicates.
    pub tags: Vec<OrderTagId>,
}

/// An order with its validity window.
///
/// # Invariants
/// - `is_active` starts `true` and only ever moves to `false`.
/// - `start_date <= embargo_date` is *not* enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub start_date: NaiveDate,
    pub embargo_date: NaiveDate,
    pub tags: Vec<OrderTagId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a deactivation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// The order was active and is now inactive.
    Deactivated,
    /// The order was already inactive; nothing changed.
    AlreadyInactive,
}

impl Order {
    /// Materialize a freshly inserted order.
    pub fn create(id: OrderId, new: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            start_date: new.start_date,
            embargo_date: new.embargo_date,
            tags: new.tags,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// One-way `active -> inactive` transition.
    ///
    /// Deactivating an inactive order is reported, not silently accepted, and
    /// leaves the order untouched.
    pub fn deactivate(&mut self, at: DateTime<Utc>) -> Deactivation {
        if !self.is_active {
            return Deactivation::AlreadyInactive;
        }
        self.is_active = false;
        self.updated_at = at;
        Deactivation::Deactivated
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, crate::DATE_FORMAT).unwrap()
    }

    fn test_order() -> Order {
        let new = NewOrder {
            start_date: date("2024-01-01"),
            embargo_date: date("2024-06-30"),
            tags: vec![OrderTagId::new(1)],
        };
        Order::create(OrderId::new(1), new, Utc::now())
    }

    #[test]
    fn created_orders_are_active() {
        let order = test_order();
        assert!(order.is_active);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(order.tags, vec![OrderTagId::new(1)]);
    }

    #[test]
    fn deactivate_flips_active_once() {
        let mut order = test_order();
        let later = order.created_at + Duration::seconds(5);

        assert_eq!(order.deactivate(later), Deactivation::Deactivated);
        assert!(!order.is_active);
        assert_eq!(order.updated_at, later);
    }

    #[test]
    fn deactivating_inactive_order_is_reported_and_changes_nothing() {
        let mut order = test_order();
        let first = order.created_at + Duration::seconds(5);
        order.deactivate(first);
        let snapshot = order.clone();

        let outcome = order.deactivate(first + Duration::seconds(5));

        assert_eq!(outcome, Deactivation::AlreadyInactive);
        assert_eq!(order, snapshot);
    }
}
