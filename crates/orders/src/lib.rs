//! `orderdesk-orders`: orders, order tags and the date-range filter.
//!
//! Pure domain: entity definitions, payload validation and the store ports
//! implemented by `orderdesk-infra`.

pub mod date_range;
pub mod order;
pub mod payload;
pub mod store;
pub mod tag;

pub use date_range::{DateRange, DateRangeQuery};
pub use order::{Deactivation, NewOrder, Order};
pub use payload::{OrderPayload, OrderTagPayload};
pub use store::{OrderStore, OrderTagStore};
pub use tag::{NewOrderTag, OrderTag, TAG_NAME_MAX_LEN};

/// Wire format for every date field and query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
