//! Response bodies. Request bodies are the payload types of the domain
//! crates (`OrderPayload`, `OrderTagPayload`), validated there.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use orderdesk_orders::{Order, OrderTag};

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub start_date: NaiveDate,
    pub embargo_date: NaiveDate,
    pub tags: Vec<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.get(),
            start_date: order.start_date,
            embargo_date: order.embargo_date,
            tags: order.tags.iter().map(|t| t.get()).collect(),
            is_active: order.is_active,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderTagResponse {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&OrderTag> for OrderTagResponse {
    fn from(tag: &OrderTag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name.clone(),
            is_active: tag.is_active,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

/// `{"status": ..., "message": ...}` body of the deactivate endpoint.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: &'static str,
}

impl StatusMessage {
    pub const DEACTIVATED: Self = Self {
        status: "success",
        message: "Order deactivated",
    };

    pub const ALREADY_DEACTIVATED: Self = Self {
        status: "fail",
        message: "Order already deactivated",
    };
}

pub fn orders_to_json(orders: &[Order]) -> Vec<OrderResponse> {
    orders.iter().map(OrderResponse::from).collect()
}

pub fn tags_to_json(tags: &[OrderTag]) -> Vec<OrderTagResponse> {
    tags.iter().map(OrderTagResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use orderdesk_core::{OrderId, OrderTagId};
    use orderdesk_orders::NewOrder;

    use super::*;

    #[test]
    fn order_json_uses_plain_ids_and_iso_dates() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let order = Order::create(
            OrderId::new(7),
            NewOrder {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                embargo_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                tags: vec![OrderTagId::new(3)],
            },
            now,
        );

        let json = serde_json::to_value(OrderResponse::from(&order)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["embargo_date"], "2024-12-31");
        assert_eq!(json["tags"], serde_json::json!([3]));
        assert_eq!(json["is_active"], true);
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }
}
