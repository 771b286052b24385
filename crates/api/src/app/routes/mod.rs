use axum::{
    Router,
    routing::{MethodRouter, get, patch},
};

pub mod orders;
pub mod system;
pub mod tags;

/// Order and tag routes, mounted under the configured prefix.
pub fn router() -> Router {
    Router::new()
        .route("/", order_collection())
        .route("/tags/", get(tags::list_tags).post(tags::create_tag))
        .route("/orders/:id/deactivate/", patch(orders::deactivate_order))
        .route("/orders/by-date-range/", get(orders::orders_by_date_range))
}

/// List/create orders. Also served at `<prefix>/` since nesting maps `/`
/// to the bare prefix only.
pub fn order_collection() -> MethodRouter {
    get(orders::list_orders).post(orders::create_order)
}
