//! Booking data models, status state machine, and API request/response types.
//!
//! This module defines:
//! - `Booking`: Database entity representing a booking
//! - `BookingStatus`: The allowed statuses and transitions between them
//! - Request types for creating bookings and changing their status
//! - `BookingResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Status of a booking.
///
/// # Lifecycle
///
/// ```text
/// pending ──> confirmed ──> completed
///    │            │
///    └────────────┴───────> cancelled
/// ```
///
/// `completed` and `cancelled` are terminal: no further transitions
/// are allowed out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Booking created, seats reserved, payment not yet confirmed
    Pending,
    /// Payment confirmed by a manager
    Confirmed,
    /// Tour took place
    Completed,
    /// Booking cancelled; reserved seats are released
    Cancelled,
}

impl BookingStatus {
    /// Parse a status from its wire/database representation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRequest` for any unknown status string.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }

    /// Wire/database representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether any transition out of this status is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// # Allowed Transitions
    ///
    /// - pending → confirmed
    /// - pending → cancelled
    /// - confirmed → completed
    /// - confirmed → cancelled
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

/// Represents a booking record from the database.
///
/// # Database Table
///
/// Maps to the `bookings` table. Each booking:
/// - Has a unique ID and optional idempotency key
/// - References one tour and optionally one flight
/// - Stores the price quote that was in effect when it was created
/// - Tracks status (pending, confirmed, completed, cancelled)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Booking {
    /// Unique identifier for this booking
    pub id: Uuid,

    /// Optional idempotency key for preventing duplicates
    ///
    /// If a client sends the same idempotency_key twice, the second request
    /// returns the original booking instead of creating a duplicate.
    pub idempotency_key: Option<String>,

    /// Tour being booked
    pub tour_id: Uuid,

    /// Optional flight attached to the booking
    pub flight_id: Option<Uuid>,

    /// Name of the client making the booking
    pub client_name: String,

    /// Email of the client making the booking
    ///
    /// Also used to look up the client's accepted personalized offer
    /// when the price is resolved.
    pub client_email: String,

    /// Number of seats reserved (>= 1)
    pub seats: i32,

    /// Undiscounted price in cents at booking time
    pub base_price_cents: i64,

    /// Discount percentage that was applied (0 when no discount applied)
    pub discount_percent: i32,

    /// Final price in cents after the discount
    pub total_price_cents: i64,

    /// Current booking status (see `BookingStatus`)
    pub status: String,

    /// When the booking was created
    pub created_at: DateTime<Utc>,

    /// When the booking was last updated
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new booking.
///
/// # JSON Example
///
/// ```json
/// {
///   "tour_id": "550e8400-e29b-41d4-a716-446655440000",
///   "flight_id": "660e8400-e29b-41d4-a716-446655440001",
///   "client_name": "Maria Petrova",
///   "client_email": "maria@example.com",
///   "seats": 2,
///   "idempotency_key": "booking-2025-001"
/// }
/// ```
///
/// # Validation
///
/// - Tour must exist and have enough seats
/// - Flight (when given) must exist and have enough seats
/// - `seats` must be >= 1
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Tour to book
    pub tour_id: Uuid,

    /// Optional flight to attach
    pub flight_id: Option<Uuid>,

    /// Client name (required, non-empty)
    pub client_name: String,

    /// Client email (required)
    pub client_email: String,

    /// Number of seats to reserve (defaults to 1)
    #[serde(default = "default_seats")]
    pub seats: i32,

    /// Optional idempotency key to prevent duplicates
    pub idempotency_key: Option<String>,
}

/// Default seat count when not specified in request.
fn default_seats() -> i32 {
    1
}

impl CreateBookingRequest {
    /// Validate request fields that do not require database access.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.client_name.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Client name must not be empty".to_string(),
            ));
        }
        if !self.client_email.contains('@') {
            return Err(AppError::InvalidRequest(
                "Client email is not valid".to_string(),
            ));
        }
        if self.seats < 1 {
            return Err(AppError::InvalidRequest(
                "Seats must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request to change a booking's status.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": "confirmed",
///   "note": "Payment received"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    /// Target status (pending, confirmed, completed, cancelled)
    pub status: String,

    /// Optional note recorded in the booking history
    pub note: Option<String>,
}

/// Response returned for booking operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "tour_id": "550e8400-e29b-41d4-a716-446655440000",
///   "flight_id": null,
///   "client_name": "Maria Petrova",
///   "client_email": "maria@example.com",
///   "seats": 2,
///   "base_price_cents": 240000,
///   "discount_percent": 15,
///   "total_price_cents": 204000,
///   "status": "pending",
///   "created_at": "2025-06-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub flight_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub seats: i32,
    pub base_price_cents: i64,
    pub discount_percent: i32,
    pub total_price_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Convert database Booking to API BookingResponse.
///
/// This removes internal fields like idempotency_key
/// that clients don't need to see.
impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            tour_id: booking.tour_id,
            flight_id: booking.flight_id,
            client_name: booking.client_name,
            client_email: booking.client_email,
            seats: booking.seats,
            base_price_cents: booking.base_price_cents,
            discount_percent: booking.discount_percent,
            total_price_cents: booking.total_price_cents,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_statuses() {
        assert_eq!(
            BookingStatus::parse("pending").unwrap(),
            BookingStatus::Pending
        );
        assert_eq!(
            BookingStatus::parse("confirmed").unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            BookingStatus::parse("completed").unwrap(),
            BookingStatus::Completed
        );
        assert_eq!(
            BookingStatus::parse("cancelled").unwrap(),
            BookingStatus::Cancelled
        );
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!(BookingStatus::parse("paid").is_err());
        assert!(BookingStatus::parse("").is_err());
        assert!(BookingStatus::parse("Pending").is_err());
    }

    #[test]
    fn as_str_round_trips() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn pending_can_be_confirmed_or_cancelled() {
        let pending = BookingStatus::Pending;
        assert!(pending.can_transition_to(BookingStatus::Confirmed));
        assert!(pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!pending.can_transition_to(BookingStatus::Completed));
        assert!(!pending.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn confirmed_can_be_completed_or_cancelled() {
        let confirmed = BookingStatus::Confirmed;
        assert!(confirmed.can_transition_to(BookingStatus::Completed));
        assert!(confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(!confirmed.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn terminal_statuses_allow_no_transitions() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            tour_id: Uuid::new_v4(),
            flight_id: None,
            client_name: "Maria Petrova".to_string(),
            client_email: "maria@example.com".to_string(),
            seats: 1,
            idempotency_key: None,
        }
    }

    #[test]
    fn create_request_validates() {
        assert!(valid_request().validate().is_ok());

        let mut req = valid_request();
        req.client_name = "   ".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.client_email = "not-an-email".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.seats = 0;
        assert!(req.validate().is_err());
    }
}
