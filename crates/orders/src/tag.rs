use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{Entity, OrderTagId};

/// Longest accepted tag name, in characters.
pub const TAG_NAME_MAX_LEN: usize = 100;

/// Validated input for creating a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderTag {
    pub name: String,
    pub is_active: bool,
}

/// A label that can be attached to any number of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTag {
    pub id: OrderTagId,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderTag {
    pub fn create(id: OrderTagId, new: NewOrderTag, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for OrderTag {
    type Id = OrderTagId;

    fn id(&self) -> OrderTagId {
        self.id
    }
}
