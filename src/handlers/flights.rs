//! Flight HTTP handlers.
//!
//! This module implements the flight-related API endpoints:
//! - POST /api/flights - Create new flight
//! - GET /api/flights - List all flights
//! - GET /api/flights/:id - Get flight by ID

use crate::{
    db::DbPool,
    error::AppError,
    models::flight::{CreateFlightRequest, Flight, FlightResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Create a new flight.
///
/// # Endpoint
///
/// `POST /api/flights`
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created flight
/// - **Error (400)**: Validation failed
pub async fn create_flight(
    State(pool): State<DbPool>,
    Json(request): Json<CreateFlightRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let flight = sqlx::query_as::<_, Flight>(
        r#"
        INSERT INTO flights (
            flight_number, origin, destination,
            departure_at, arrival_at,
            price_cents, seats_available
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(request.flight_number)
    .bind(request.origin)
    .bind(request.destination)
    .bind(request.departure_at)
    .bind(request.arrival_at)
    .bind(request.price_cents)
    .bind(request.seats_available)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(FlightResponse::from(flight))))
}

/// List all flights, soonest departure first.
pub async fn list_flights(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<FlightResponse>>, AppError> {
    let flights = sqlx::query_as::<_, Flight>("SELECT * FROM flights ORDER BY departure_at ASC")
        .fetch_all(&pool)
        .await?;

    let responses: Vec<FlightResponse> = flights.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Get a specific flight by ID.
pub async fn get_flight(
    State(pool): State<DbPool>,
    Path(flight_id): Path<Uuid>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight = sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = $1")
        .bind(flight_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::FlightNotFound)?;

    Ok(Json(flight.into()))
}
