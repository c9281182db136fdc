use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::subscription::{Model, SubscriptionPayload};

use crate::{errors::ApiError, routes::AppState};

#[utoipa::path(
    get, path = "/api/subscriptions", tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions, oldest first", body = [crate::openapi::SubscriptionDoc])
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Model>>, ApiError> {
    let list = state.subscriptions.list().await?;
    info!(count = list.len(), "list subscriptions");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>, ApiError> {
    state.subscriptions.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

#[utoipa::path(
    post, path = "/api/subscriptions", tag = "subscriptions",
    request_body = crate::openapi::SubscriptionPayloadDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<Json<Model>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;
    let created = state.subscriptions.create(input).await?;
    Ok(Json(created))
}

/// Validation runs before the existence check, so an invalid body for an
/// unknown id is a 400 rather than a 404.
#[utoipa::path(
    put, path = "/api/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    request_body = crate::openapi::SubscriptionPayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<Json<Model>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;
    let updated = state.subscriptions.update(id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.subscriptions.delete(id).await?;
    Ok(StatusCode::OK)
}
