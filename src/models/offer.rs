//! Personalized offer models and offer lifecycle.
//!
//! A personalized offer is a discount made to one client for one tour.
//! Offers move through a small state machine:
//!
//! ```text
//! offered ──> accepted
//!    │
//!    ├─────> declined
//!    └─────> expired
//! ```
//!
//! Only an accepted, unexpired offer participates in price resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::discount::validate_percent;

/// Status of a personalized offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    /// Offer made, waiting for the client's decision
    Offered,
    /// Client accepted; the offer now applies to their bookings
    Accepted,
    /// Client declined; terminal
    Declined,
    /// Offer passed its expiry before being accepted; terminal
    Expired,
}

impl OfferStatus {
    /// Parse a status from its wire/database representation.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "offered" => Ok(Self::Offered),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown offer status: {}",
                other
            ))),
        }
    }

    /// Wire/database representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }

    /// Only pending offers can be decided on.
    pub fn can_transition_to(&self, next: OfferStatus) -> bool {
        matches!(
            (self, next),
            (Self::Offered, Self::Accepted)
                | (Self::Offered, Self::Declined)
                | (Self::Offered, Self::Expired)
        )
    }
}

/// Represents a personalized offer record from the database.
///
/// # Database Table
///
/// Maps to the `personalized_offers` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PersonalizedOffer {
    /// Unique identifier for this offer
    pub id: Uuid,

    /// Email of the client the offer was made to
    pub client_email: String,

    /// Tour the offer applies to
    pub tour_id: Uuid,

    /// Percentage off, within 1..=100
    pub percent: i32,

    /// Moment after which the offer can no longer be accepted
    pub expires_at: DateTime<Utc>,

    /// Current status (see `OfferStatus`)
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalizedOffer {
    /// Whether the offer's expiry moment has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Request to create a personalized offer.
///
/// # JSON Example
///
/// ```json
/// {
///   "client_email": "maria@example.com",
///   "tour_id": "550e8400-e29b-41d4-a716-446655440000",
///   "percent": 15,
///   "expires_at": "2025-07-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    /// Client the offer is for
    pub client_email: String,

    /// Tour the offer applies to
    pub tour_id: Uuid,

    /// Percentage off, within 1..=100
    pub percent: i32,

    /// Expiry moment
    pub expires_at: DateTime<Utc>,
}

impl CreateOfferRequest {
    /// Validate the percentage bound and the client email.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.client_email.contains('@') {
            return Err(AppError::InvalidRequest(
                "Client email is not valid".to_string(),
            ));
        }
        validate_percent(self.percent)
    }
}

/// Response body for offer endpoints.
#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub id: Uuid,
    pub client_email: String,
    pub tour_id: Uuid,
    pub percent: i32,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<PersonalizedOffer> for OfferResponse {
    fn from(offer: PersonalizedOffer) -> Self {
        Self {
            id: offer.id,
            client_email: offer.client_email,
            tour_id: offer.tour_id,
            percent: offer.percent,
            expires_at: offer.expires_at,
            status: offer.status,
            created_at: offer.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn offered_can_be_decided() {
        let offered = OfferStatus::Offered;
        assert!(offered.can_transition_to(OfferStatus::Accepted));
        assert!(offered.can_transition_to(OfferStatus::Declined));
        assert!(offered.can_transition_to(OfferStatus::Expired));
    }

    #[test]
    fn decided_offers_are_terminal() {
        for terminal in [
            OfferStatus::Accepted,
            OfferStatus::Declined,
            OfferStatus::Expired,
        ] {
            for next in [
                OfferStatus::Offered,
                OfferStatus::Accepted,
                OfferStatus::Declined,
                OfferStatus::Expired,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn parse_round_trips() {
        for status in [
            OfferStatus::Offered,
            OfferStatus::Accepted,
            OfferStatus::Declined,
            OfferStatus::Expired,
        ] {
            assert_eq!(OfferStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(OfferStatus::parse("rescinded").is_err());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let offer = PersonalizedOffer {
            id: Uuid::new_v4(),
            client_email: "maria@example.com".to_string(),
            tour_id: Uuid::new_v4(),
            percent: 15,
            expires_at: now,
            status: "offered".to_string(),
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
        };
        // An offer expiring exactly now is already expired
        assert!(offer.is_expired(now));
        assert!(!offer.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn create_request_validates_percent_and_email() {
        let request = CreateOfferRequest {
            client_email: "maria@example.com".to_string(),
            tour_id: Uuid::new_v4(),
            percent: 15,
            expires_at: Utc::now(),
        };
        assert!(request.validate().is_ok());

        let bad_percent = CreateOfferRequest {
            percent: 0,
            ..request
        };
        assert!(bad_percent.validate().is_err());

        let bad_email = CreateOfferRequest {
            client_email: "maria".to_string(),
            ..bad_percent
        };
        assert!(bad_email.validate().is_err());
    }
}
