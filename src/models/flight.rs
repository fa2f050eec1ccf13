//! Flight data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a flight record from the database.
///
/// # Database Table
///
/// Maps to the `flights` table. A flight can be attached to a booking;
/// its price is added on top of the (possibly discounted) tour price.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Flight {
    /// Unique identifier for this flight
    pub id: Uuid,

    /// Carrier flight number (e.g. "LH1234")
    pub flight_number: String,

    /// Departure airport or city
    pub origin: String,

    /// Arrival airport or city
    pub destination: String,

    /// Scheduled departure
    pub departure_at: DateTime<Utc>,

    /// Scheduled arrival
    ///
    /// Must be after `departure_at` (enforced by CHECK constraint).
    pub arrival_at: DateTime<Utc>,

    /// Price per seat in cents
    pub price_cents: i64,

    /// Seats still available for booking
    pub seats_available: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new flight.
///
/// # JSON Example
///
/// ```json
/// {
///   "flight_number": "LH1234",
///   "origin": "FRA",
///   "destination": "INN",
///   "departure_at": "2025-07-10T06:30:00Z",
///   "arrival_at": "2025-07-10T07:45:00Z",
///   "price_cents": 18000,
///   "seats_available": 120
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    /// Carrier flight number (required, non-empty)
    pub flight_number: String,

    /// Departure airport or city
    pub origin: String,

    /// Arrival airport or city
    pub destination: String,

    /// Scheduled departure
    pub departure_at: DateTime<Utc>,

    /// Scheduled arrival (must be after departure)
    pub arrival_at: DateTime<Utc>,

    /// Price per seat in cents (must be positive)
    pub price_cents: i64,

    /// Seats offered for sale
    pub seats_available: i32,
}

impl CreateFlightRequest {
    /// Validate the request before it touches the database.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.flight_number.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Flight number must not be empty".to_string(),
            ));
        }
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Origin and destination must not be empty".to_string(),
            ));
        }
        if self.departure_at >= self.arrival_at {
            return Err(AppError::InvalidRequest(
                "Departure must be before arrival".to_string(),
            ));
        }
        if self.price_cents <= 0 {
            return Err(AppError::InvalidRequest(
                "Price must be positive".to_string(),
            ));
        }
        if self.seats_available < 0 {
            return Err(AppError::InvalidRequest(
                "Seats must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response body for flight endpoints.
#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub price_cents: i64,
    pub seats_available: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id,
            flight_number: flight.flight_number,
            origin: flight.origin,
            destination: flight.destination,
            departure_at: flight.departure_at,
            arrival_at: flight.arrival_at,
            price_cents: flight.price_cents,
            seats_available: flight.seats_available,
            created_at: flight.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_request() -> CreateFlightRequest {
        let departure = Utc::now();
        CreateFlightRequest {
            flight_number: "LH1234".to_string(),
            origin: "FRA".to_string(),
            destination: "INN".to_string(),
            departure_at: departure,
            arrival_at: departure + Duration::hours(1),
            price_cents: 18000,
            seats_available: 120,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn arrival_must_follow_departure() {
        let mut req = valid_request();
        req.arrival_at = req.departure_at;
        assert!(req.validate().is_err());

        req.arrival_at = req.departure_at - Duration::hours(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn price_and_seats_are_bounded() {
        let mut req = valid_request();
        req.price_cents = -100;
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.seats_available = -1;
        assert!(req.validate().is_err());
    }
}
