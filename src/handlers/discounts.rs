//! Discount HTTP handlers.
//!
//! This module implements the discount API endpoints:
//! - POST /api/discount - Create new discount
//! - GET /api/discount - List active discounts
//! - DELETE /api/discount/:id - Deactivate a discount

use crate::{
    db::DbPool,
    error::AppError,
    models::discount::{CreateDiscountRequest, Discount, DiscountResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Create a new discount.
///
/// # Request Body
///
/// ```json
/// {
///   "code": "SUMMER25",
///   "percent": 25,
///   "tour_id": null,
///   "valid_from": "2025-06-01",
///   "valid_until": "2025-08-31"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created discount
/// - **Error (400)**: Percent out of 1..=100, inverted date window,
///   or blank code
/// - **Error (404)**: Targeted tour doesn't exist
pub async fn create_discount(
    State(pool): State<DbPool>,
    Json(request): Json<CreateDiscountRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    if let Some(tour_id) = request.tour_id {
        let tour_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tours WHERE id = $1)")
                .bind(tour_id)
                .fetch_one(&pool)
                .await?;
        if !tour_exists {
            return Err(AppError::TourNotFound);
        }
    }

    let discount = sqlx::query_as::<_, Discount>(
        r#"
        INSERT INTO discounts (code, percent, tour_id, valid_from, valid_until)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(request.code)
    .bind(request.percent)
    .bind(request.tour_id)
    .bind(request.valid_from)
    .bind(request.valid_until)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(DiscountResponse::from(discount))))
}

/// List all active discounts, newest first.
pub async fn list_discounts(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<DiscountResponse>>, AppError> {
    let discounts = sqlx::query_as::<_, Discount>(
        "SELECT * FROM discounts WHERE is_active = true ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;

    let responses: Vec<DiscountResponse> = discounts.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Deactivate a discount (soft delete).
///
/// # Response
///
/// Returns 204 No Content on success.
///
/// Sets `is_active = false` so existing booking quotes keep their
/// recorded percentage, but no new bookings can use the discount.
pub async fn deactivate_discount(
    State(pool): State<DbPool>,
    Path(discount_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result =
        sqlx::query("UPDATE discounts SET is_active = false WHERE id = $1 AND is_active = true")
            .bind(discount_id)
            .execute(&pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::DiscountNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
