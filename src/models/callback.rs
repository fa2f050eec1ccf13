//! Callback models for endpoint registration and event delivery.
//!
//! This module defines the data structures for managing callback endpoints
//! and tracking the booking status-change events delivered to them.
//!
//! # Callback Flow
//!
//! 1. An integrator registers a callback endpoint via `POST /api/callbacks`
//! 2. System generates a secret for HMAC signature verification
//! 3. When a booking changes status, system sends a signed payload
//! 4. The integrator verifies the signature using the secret
//!
//! # Security
//!
//! - Secrets are only shown once during registration
//! - Payloads are signed using HMAC-SHA256
//! - HTTPS is required for production endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::booking::Booking;

/// Callback endpoint registered by an integrator.
///
/// # Database Table
///
/// Maps to the `callback_endpoints` table.
///
/// # Secret Storage
///
/// The `secret` is stored in plaintext (required for HMAC generation)
/// but never returned in list operations for security.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CallbackEndpoint {
    pub id: Uuid,
    pub url: String,
    pub secret: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to register a new callback endpoint.
///
/// # Example
///
/// ```json
/// {
///   "url": "https://example.com/booking-events"
/// }
/// ```
///
/// # Validation
///
/// - URL must be valid HTTPS (HTTP allowed for localhost in development)
/// - URL must not exceed 2048 characters
#[derive(Debug, Deserialize)]
pub struct CallbackEndpointRequest {
    pub url: String,
}

/// Response when registering or listing a callback endpoint.
///
/// # Security Note
///
/// The `secret` field is ONLY included when creating a new endpoint.
/// It is never returned in list operations.
#[derive(Debug, Serialize)]
pub struct CallbackEndpointResponse {
    pub id: Uuid,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CallbackEndpoint> for CallbackEndpointResponse {
    fn from(endpoint: CallbackEndpoint) -> Self {
        Self {
            id: endpoint.id,
            url: endpoint.url,
            secret: None, // Never include secret by default
            is_active: endpoint.is_active,
            created_at: endpoint.created_at,
        }
    }
}

impl CallbackEndpointResponse {
    /// Create response with secret included (only for registration).
    pub fn with_secret(mut self, secret: String) -> Self {
        self.secret = Some(secret);
        self
    }
}

/// New callback event record, before it has been written to the
/// `callback_events` table. Tracks the payload sent, the HTTP response
/// status, and any error message.
#[derive(Debug)]
pub struct NewCallbackEvent {
    pub id: Uuid,
    pub callback_endpoint_id: Uuid,
    pub booking_id: Uuid,
    pub payload: serde_json::Value,
    pub response_status: Option<i32>,
    pub response_body: Option<String>,
}

impl NewCallbackEvent {
    pub fn new(
        id: Uuid,
        callback_endpoint_id: Uuid,
        booking_id: Uuid,
        payload: serde_json::Value,
        response_status: Option<i32>,
        response_body: Option<String>,
    ) -> Self {
        Self {
            id,
            callback_endpoint_id,
            booking_id,
            payload,
            response_status,
            response_body,
        }
    }
}

/// Callback payload sent to registered endpoints.
///
/// # Example
///
/// ```json
/// {
///   "event_type": "booking.status_changed",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2025-06-01T12:30:00Z",
///   "data": {
///     "booking": {
///       "id": "...",
///       "tour_id": "...",
///       "seats": 2,
///       "total_price_cents": 204000,
///       "status": "confirmed"
///     },
///     "from_status": "pending",
///     "to_status": "confirmed"
///   }
/// }
/// ```
///
/// # Signature Verification
///
/// The request includes an `X-Callback-Signature` header with format:
/// `sha256=<hex_encoded_hmac>`
///
/// Receivers should verify it by computing HMAC-SHA256(secret, json_body)
#[derive(Debug, Serialize, Deserialize)]
pub struct CallbackPayload {
    /// Type of event (always "booking.status_changed")
    pub event_type: String,

    /// Unique identifier for this callback event
    pub event_id: Uuid,

    /// When the event was created
    pub created_at: DateTime<Utc>,

    /// Event data containing booking details
    pub data: CallbackData,
}

/// Data portion of the callback payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallbackData {
    /// Booking that changed status
    pub booking: BookingCallbackData,

    /// Status before the change (null on creation)
    pub from_status: Option<String>,

    /// Status after the change
    pub to_status: String,
}

/// Booking data included in callback payloads.
///
/// This is a subset of the full Booking model, containing
/// only the fields relevant for callback consumers.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingCallbackData {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub flight_id: Option<Uuid>,
    pub client_email: String,
    pub seats: i32,
    pub total_price_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingCallbackData {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            tour_id: b.tour_id,
            flight_id: b.flight_id,
            client_email: b.client_email,
            seats: b.seats,
            total_price_cents: b.total_price_cents,
            status: b.status,
            created_at: b.created_at,
        }
    }
}

impl CallbackPayload {
    /// Create a new callback payload for a status-change event.
    pub fn new(
        event_id: Uuid,
        booking: Booking,
        from_status: Option<String>,
        to_status: String,
    ) -> Self {
        Self {
            event_type: "booking.status_changed".to_string(),
            event_id,
            created_at: Utc::now(),
            data: CallbackData {
                booking: booking.into(),
                from_status,
                to_status,
            },
        }
    }
}
