//! HTTP handlers for callback endpoint management.
//!
//! This module provides API endpoints for integrators to register,
//! list, and delete callback endpoints that receive booking
//! status-change notifications.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::callback::{CallbackEndpointRequest, CallbackEndpointResponse};
use crate::services::notification_service;

/// Register a new callback endpoint.
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/booking-events"
/// }
/// ```
///
/// # Response
///
/// Returns 201 Created with the endpoint details.
/// The `secret` is only returned once during creation.
///
/// # Security
///
/// - HTTPS URLs required (HTTP localhost allowed for development)
/// - Secret is 64-character hex string for HMAC-SHA256
pub async fn create_callback(
    State(pool): State<DbPool>,
    Json(request): Json<CallbackEndpointRequest>,
) -> Result<impl IntoResponse, AppError> {
    let endpoint = notification_service::create_callback_endpoint(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// List all active callback endpoints.
///
/// Secrets are never returned in list operations.
pub async fn list_callbacks(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<CallbackEndpointResponse>>, AppError> {
    let callbacks = notification_service::list_callback_endpoints(&pool).await?;

    Ok(Json(callbacks))
}

/// Delete a callback endpoint (soft delete).
///
/// # Response
///
/// Returns 204 No Content on success.
///
/// Sets `is_active = false` to preserve event history.
/// The endpoint will no longer receive notifications.
pub async fn delete_callback(
    State(pool): State<DbPool>,
    Path(callback_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    notification_service::delete_callback_endpoint(&pool, callback_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
