//! Tour HTTP handlers, including the reviews nested under a tour.
//!
//! This module implements the tour-related API endpoints:
//! - POST /api/tours - Create new tour
//! - GET /api/tours - List all tours
//! - GET /api/tours/:id - Get tour by ID
//! - POST /api/tours/:id/reviews - Post a review
//! - GET /api/tours/:id/reviews - List reviews
//! - GET /api/tours/:id/reviews/summary - Review count and average rating

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        review::{CreateReviewRequest, Review, ReviewResponse, ReviewSummary},
        tour::{CreateTourRequest, Tour, TourResponse},
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Create a new tour.
///
/// # Endpoint
///
/// `POST /api/tours`
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created tour
/// - **Error (400)**: Validation failed
/// - **Error (500)**: Database error
///
/// Seats available start equal to capacity.
pub async fn create_tour(
    State(pool): State<DbPool>,
    Json(request): Json<CreateTourRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let tour = sqlx::query_as::<_, Tour>(
        r#"
        INSERT INTO tours (
            title, destination, description,
            departure_date, return_date,
            price_cents, capacity, seats_available
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING *
        "#,
    )
    .bind(request.title)
    .bind(request.destination)
    .bind(request.description)
    .bind(request.departure_date)
    .bind(request.return_date)
    .bind(request.price_cents)
    .bind(request.capacity)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(TourResponse::from(tour))))
}

/// List all tours, soonest departure first.
pub async fn list_tours(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<TourResponse>>, AppError> {
    let tours = sqlx::query_as::<_, Tour>("SELECT * FROM tours ORDER BY departure_date ASC")
        .fetch_all(&pool)
        .await?;

    let responses: Vec<TourResponse> = tours.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Get a specific tour by ID.
///
/// # Response
///
/// - **Success (200 OK)**: Returns tour details
/// - **Error (404)**: Tour not found
pub async fn get_tour(
    State(pool): State<DbPool>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<TourResponse>, AppError> {
    let tour = sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = $1")
        .bind(tour_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::TourNotFound)?;

    Ok(Json(tour.into()))
}

/// Post a review for a tour.
///
/// # Endpoint
///
/// `POST /api/tours/:id/reviews`
///
/// # Validation
///
/// - Rating must be within 1..=5
/// - Comment must be non-empty and at most 2000 characters
pub async fn create_review(
    State(pool): State<DbPool>,
    Path(tour_id): Path<Uuid>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let tour_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tours WHERE id = $1)")
        .bind(tour_id)
        .fetch_one(&pool)
        .await?;
    if !tour_exists {
        return Err(AppError::TourNotFound);
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (tour_id, client_name, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(tour_id)
    .bind(request.client_name)
    .bind(request.rating)
    .bind(request.comment)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// List reviews for a tour, newest first.
pub async fn list_reviews(
    State(pool): State<DbPool>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE tour_id = $1 ORDER BY created_at DESC",
    )
    .bind(tour_id)
    .fetch_all(&pool)
    .await?;

    let responses: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Review count and average rating for a tour.
///
/// `average_rating` is null when the tour has no reviews.
pub async fn review_summary(
    State(pool): State<DbPool>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<ReviewSummary>, AppError> {
    let (review_count, average_rating): (i64, Option<f64>) = sqlx::query_as(
        "SELECT COUNT(*), AVG(rating::float8) FROM reviews WHERE tour_id = $1",
    )
    .bind(tour_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(ReviewSummary {
        tour_id,
        review_count,
        average_rating,
    }))
}
