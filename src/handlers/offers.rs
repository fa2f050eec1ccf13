//! Personalized offer HTTP handlers.
//!
//! This module implements the offer API endpoints:
//! - POST /api/offers - Create an offer for a client
//! - GET /api/offers?client_email=... - List a client's offers
//! - POST /api/offers/:id/accept - Accept a pending offer
//! - POST /api/offers/:id/decline - Decline a pending offer

use crate::{
    db::DbPool,
    error::AppError,
    models::offer::{CreateOfferRequest, OfferResponse},
    services::offer_service,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for listing offers.
#[derive(Debug, Deserialize)]
pub struct ListOffersQuery {
    /// Client whose offers to list (required)
    pub client_email: String,
}

/// Create a personalized offer.
///
/// # Request Body
///
/// ```json
/// {
///   "client_email": "maria@example.com",
///   "tour_id": "550e8400-e29b-41d4-a716-446655440000",
///   "percent": 15,
///   "expires_at": "2025-07-01T00:00:00Z"
/// }
/// ```
pub async fn create_offer(
    State(pool): State<DbPool>,
    Json(request): Json<CreateOfferRequest>,
) -> Result<impl IntoResponse, AppError> {
    let offer = offer_service::create_offer(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(OfferResponse::from(offer))))
}

/// List a client's offers, newest first.
///
/// Pending offers past expiry show up as `expired`.
pub async fn list_offers(
    State(pool): State<DbPool>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<Vec<OfferResponse>>, AppError> {
    let offers = offer_service::list_offers_for_client(&pool, &query.client_email).await?;

    let responses: Vec<OfferResponse> = offers.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Accept a pending offer.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the accepted offer
/// - **Error (404)**: Offer not found
/// - **Error (422)**: Offer already decided or expired
pub async fn accept_offer(
    State(pool): State<DbPool>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<OfferResponse>, AppError> {
    let offer = offer_service::accept_offer(&pool, offer_id).await?;

    Ok(Json(offer.into()))
}

/// Decline a pending offer.
pub async fn decline_offer(
    State(pool): State<DbPool>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<OfferResponse>, AppError> {
    let offer = offer_service::decline_offer(&pool, offer_id).await?;

    Ok(Json(offer.into()))
}
