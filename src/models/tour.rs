//! Tour data models and API request/response types.
//!
//! This module defines:
//! - `Tour`: Database entity representing a tour
//! - `CreateTourRequest`: Request body for creating tours
//! - `TourResponse`: Response body returned to clients

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a tour record from the database.
///
/// # Database Table
///
/// Maps to the `tours` table. Each tour:
/// - Has a price stored in cents (to avoid floating-point errors)
/// - Tracks a fixed capacity and the seats still available
/// - Runs from `departure_date` through `return_date`
///
/// # Price Storage
///
/// Prices are stored as `i64` cents to avoid floating-point precision issues.
///
/// For example:
/// - $10.50 is stored as 1050 cents
/// - $100.00 is stored as 10000 cents
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Tour {
    /// Unique identifier for this tour
    pub id: Uuid,

    /// Human-readable tour title
    pub title: String,

    /// Destination city or region
    pub destination: String,

    /// Optional longer description
    pub description: Option<String>,

    /// First day of the tour
    pub departure_date: NaiveDate,

    /// Last day of the tour
    ///
    /// Must not be before `departure_date` (enforced by CHECK constraint).
    pub return_date: NaiveDate,

    /// Price per seat in cents (not dollars)
    pub price_cents: i64,

    /// Total number of seats that can ever be sold
    pub capacity: i32,

    /// Seats still available for booking
    ///
    /// Must be >= 0 and <= capacity (enforced by CHECK constraints).
    /// Decremented when bookings are created, restored when they are
    /// cancelled.
    pub seats_available: i32,

    /// Timestamp when tour was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of last update
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new tour.
///
/// # JSON Example
///
/// ```json
/// {
///   "title": "Alpine Hiking Week",
///   "destination": "Innsbruck",
///   "description": "Seven days in the Tyrolean Alps",
///   "departure_date": "2025-07-10",
///   "return_date": "2025-07-17",
///   "price_cents": 120000,
///   "capacity": 20
/// }
/// ```
///
/// # Validation
///
/// - `title` / `destination`: Required, non-empty
/// - `price_cents`: Must be positive
/// - `capacity`: Must be >= 1
/// - `departure_date` must not be after `return_date`
#[derive(Debug, Deserialize)]
pub struct CreateTourRequest {
    /// Tour title
    pub title: String,

    /// Destination city or region
    pub destination: String,

    /// Optional description
    pub description: Option<String>,

    /// First day of the tour
    pub departure_date: NaiveDate,

    /// Last day of the tour
    pub return_date: NaiveDate,

    /// Price per seat in cents
    pub price_cents: i64,

    /// Total seat capacity
    pub capacity: i32,
}

impl CreateTourRequest {
    /// Validate the request before it touches the database.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Tour title must not be empty".to_string(),
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Tour destination must not be empty".to_string(),
            ));
        }
        if self.price_cents <= 0 {
            return Err(AppError::InvalidRequest(
                "Price must be positive".to_string(),
            ));
        }
        if self.capacity < 1 {
            return Err(AppError::InvalidRequest(
                "Capacity must be at least 1".to_string(),
            ));
        }
        if self.departure_date > self.return_date {
            return Err(AppError::InvalidRequest(
                "Departure date must not be after return date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response body for tour endpoints.
#[derive(Debug, Serialize)]
pub struct TourResponse {
    pub id: Uuid,
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price_cents: i64,
    pub capacity: i32,
    pub seats_available: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tour> for TourResponse {
    fn from(tour: Tour) -> Self {
        Self {
            id: tour.id,
            title: tour.title,
            destination: tour.destination,
            description: tour.description,
            departure_date: tour.departure_date,
            return_date: tour.return_date,
            price_cents: tour.price_cents,
            capacity: tour.capacity,
            seats_available: tour.seats_available,
            created_at: tour.created_at,
            updated_at: tour.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateTourRequest {
        CreateTourRequest {
            title: "Alpine Hiking Week".to_string(),
            destination: "Innsbruck".to_string(),
            description: None,
            departure_date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 7, 17).unwrap(),
            price_cents: 120000,
            capacity: 20,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn single_day_tour_is_allowed() {
        let mut req = valid_request();
        req.return_date = req.departure_date;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let mut req = valid_request();
        req.title = String::new();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.price_cents = 0;
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.capacity = 0;
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.return_date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert!(req.validate().is_err());
    }
}
