//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Resource Errors**: Requested resources not found
/// - **Business Logic Errors**: Operations that violate booking rules
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested tour does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Tour not found")]
    TourNotFound,

    /// Requested flight does not exist.
    #[error("Flight not found")]
    FlightNotFound,

    /// Requested booking does not exist.
    #[error("Booking not found")]
    BookingNotFound,

    /// Requested discount does not exist or is already inactive.
    #[error("Discount not found")]
    DiscountNotFound,

    /// Requested personalized offer does not exist.
    #[error("Offer not found")]
    OfferNotFound,

    /// Requested callback endpoint does not exist.
    #[error("Callback endpoint not found")]
    CallbackNotFound,

    /// Not enough seats left on the tour or flight.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Not enough seats available")]
    SoldOut,

    /// A booking status change that the state machine does not allow.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String describes the rejected transition.
    #[error("Invalid status transition")]
    InvalidTransition(String),

    /// An offer lifecycle change that is not allowed (e.g., accepting
    /// a declined or expired offer).
    #[error("Invalid offer state")]
    InvalidOfferState(String),

    /// Callback URL failed validation.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid callback URL")]
    InvalidCallbackUrl(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "success": false,
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `TourNotFound` / `FlightNotFound` / `BookingNotFound` /
///   `DiscountNotFound` / `OfferNotFound` / `CallbackNotFound` → 404
/// - `SoldOut` / `InvalidTransition` / `InvalidOfferState` → 422
/// - `InvalidRequest` / `InvalidCallbackUrl` → 400
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::TourNotFound => (StatusCode::NOT_FOUND, "tour_not_found", self.to_string()),
            AppError::FlightNotFound => {
                (StatusCode::NOT_FOUND, "flight_not_found", self.to_string())
            }
            AppError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "booking_not_found", self.to_string())
            }
            AppError::DiscountNotFound => {
                (StatusCode::NOT_FOUND, "discount_not_found", self.to_string())
            }
            AppError::OfferNotFound => (StatusCode::NOT_FOUND, "offer_not_found", self.to_string()),
            AppError::CallbackNotFound => (
                StatusCode::NOT_FOUND,
                "callback_not_found",
                self.to_string(),
            ),
            AppError::SoldOut => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "sold_out",
                self.to_string(),
            ),
            AppError::InvalidTransition(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                msg.clone(),
            ),
            AppError::InvalidOfferState(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_offer_state",
                msg.clone(),
            ),
            AppError::InvalidCallbackUrl(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_callback_url", msg.clone())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
