use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use orderdesk_core::OrderId;
use orderdesk_orders::{DateRangeQuery, Deactivation, OrderPayload};

use crate::app::dto::{self, OrderResponse, StatusMessage};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_orders().await {
        Ok(orders) => Json(dto::orders_to_json(&orders)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.create_order(payload).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, tags = order.tags.len(), "order created");
            (StatusCode::CREATED, Json(OrderResponse::from(&order))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn deactivate_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.deactivate_order(id).await {
        Ok(Deactivation::Deactivated) => {
            tracing::info!(order_id = %id, "order deactivated");
            (StatusCode::OK, Json(StatusMessage::DEACTIVATED)).into_response()
        }
        Ok(Deactivation::AlreadyInactive) => {
            tracing::warn!(order_id = %id, "order already deactivated");
            (StatusCode::BAD_REQUEST, Json(StatusMessage::ALREADY_DEACTIVATED)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn orders_by_date_range(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    match services.orders_by_date_range(&query).await {
        Ok(orders) => Json(dto::orders_to_json(&orders)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
