//! Booking history models.
//!
//! Every booking status change appends one row to the `booking_history`
//! table, in the same database transaction as the status update itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One recorded status transition for a booking.
///
/// `from_status` is NULL for the entry written when the booking
/// is first created.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct BookingHistoryEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Response body for booking history endpoints.
#[derive(Debug, Serialize)]
pub struct BookingHistoryResponse {
    pub booking_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl From<BookingHistoryEntry> for BookingHistoryResponse {
    fn from(entry: BookingHistoryEntry) -> Self {
        Self {
            booking_id: entry.booking_id,
            from_status: entry.from_status,
            to_status: entry.to_status,
            note: entry.note,
            changed_at: entry.changed_at,
        }
    }
}
