//! Booking HTTP handlers.
//!
//! This module implements the booking-related API endpoints:
//! - POST /api/bookings - Create a booking (reserves seats)
//! - POST /api/bookings/quote - Price a booking without creating it
//! - GET /api/bookings - List bookings
//! - GET /api/bookings/:id - Get booking details
//! - POST /api/bookings/:id/status - Change booking status
//! - GET /api/bookings/:id/history - Status transition history

use crate::{
    db::DbPool,
    error::AppError,
    models::booking::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest},
    models::history::BookingHistoryResponse,
    services::{booking_service, notification_service, pricing},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// Restrict the list to one client's bookings
    pub client_email: Option<String>,
}

/// Request body for the quote endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "tour_id": "550e8400-e29b-41d4-a716-446655440000",
///   "flight_id": null,
///   "client_email": "maria@example.com",
///   "seats": 2
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub tour_id: Uuid,
    pub flight_id: Option<Uuid>,

    /// When given, the client's accepted offer competes for the price
    pub client_email: Option<String>,

    #[serde(default = "default_seats")]
    pub seats: i32,

    /// Pricing date; defaults to today
    pub on_date: Option<NaiveDate>,
}

fn default_seats() -> i32 {
    1
}

/// Create a booking.
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "tour_id": "550e8400-...",
///   "seats": 2,
///   "base_price_cents": 240000,
///   "discount_percent": 15,
///   "total_price_cents": 204000,
///   "status": "pending",
///   "created_at": "2025-06-01T12:00:00Z"
/// }
/// ```
///
/// Seats are reserved atomically; a sold-out tour or flight returns 422
/// without reserving anything. Registered callback endpoints are notified
/// of the new pending booking; an idempotent replay returns the original
/// booking without notifying again.
pub async fn create_booking(
    State(pool): State<DbPool>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, created) = booking_service::create_booking(&pool, request).await?;

    // Notification problems are logged inside the service, never surfaced
    if created {
        notification_service::notify_status_changed(&pool, &booking, None, booking.status.clone())
            .await;
    }

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// Price a booking without creating it.
///
/// Shares its discount resolution with booking creation, so the quote
/// matches what an immediately created booking would cost.
pub async fn quote_booking(
    State(pool): State<DbPool>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<pricing::PriceQuote>, AppError> {
    let quote = pricing::quote_for_tour(
        &pool,
        request.tour_id,
        request.flight_id,
        request.client_email.as_deref(),
        request.seats,
        request.on_date,
    )
    .await?;

    Ok(Json(quote))
}

/// List bookings, newest first.
pub async fn list_bookings(
    State(pool): State<DbPool>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = booking_service::list_bookings(&pool, query.client_email.as_deref()).await?;

    let responses: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Get booking by ID.
pub async fn get_booking(
    State(pool): State<DbPool>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = booking_service::get_booking(&pool, booking_id)
        .await?
        .ok_or(AppError::BookingNotFound)?;

    Ok(Json(booking.into()))
}

/// Change a booking's status.
///
/// # Request Body
///
/// ```json
/// {
///   "status": "confirmed",
///   "note": "Payment received"
/// }
/// ```
///
/// # Validation
///
/// Only transitions the state machine allows go through; anything else
/// returns 422. Cancelling releases the reserved seats.
pub async fn update_status(
    State(pool): State<DbPool>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let (booking, from) =
        booking_service::transition_status(&pool, booking_id, &request.status, request.note)
            .await?;

    // The transition is committed; notification problems stay server-side
    notification_service::notify_status_changed(
        &pool,
        &booking,
        Some(from.as_str().to_string()),
        booking.status.clone(),
    )
    .await;

    Ok(Json(booking.into()))
}

/// Status transition history of a booking, oldest first.
pub async fn booking_history(
    State(pool): State<DbPool>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<BookingHistoryResponse>>, AppError> {
    let entries = booking_service::booking_history(&pool, booking_id).await?;

    let responses: Vec<BookingHistoryResponse> = entries.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}
