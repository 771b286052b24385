use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use orderdesk_orders::OrderTagPayload;

use crate::app::dto::{self, OrderTagResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_tags(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_tags().await {
        Ok(tags) => Json(dto::tags_to_json(&tags)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_tag(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderTagPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.create_tag(payload).await {
        Ok(tag) => {
            tracing::info!(tag_id = %tag.id, name = %tag.name, "order tag created");
            (StatusCode::CREATED, Json(OrderTagResponse::from(&tag))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
