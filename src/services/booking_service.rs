//! Booking service - Core business logic for bookings.
//!
//! This service handles:
//! - Atomic seat reservation on tours and flights
//! - Idempotency checking
//! - Price quote snapshots
//! - Booking status transitions with history records
//!
//! # Atomicity Guarantees
//!
//! Seat updates, booking rows, and history rows are written within
//! PostgreSQL transactions. The database ensures all-or-nothing execution.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        booking::{Booking, BookingStatus, CreateBookingRequest},
        history::BookingHistoryEntry,
    },
    services::pricing,
};

/// Create a new booking.
///
/// # Process
///
/// 1. Validate the request
/// 2. Check for duplicate idempotency key
/// 3. Gather applicable discounts for (tour, client, today)
/// 4. Start database transaction
/// 5. Lock tour row, check and decrement seats
/// 6. Lock flight row (when attached), check and decrement seats
/// 7. Resolve the price and record the booking with its quote snapshot
/// 8. Append the initial history row
/// 9. Commit (or rollback on error)
///
/// # Returns
///
/// The booking together with a flag that is false when the request was
/// an idempotent replay, so callers can skip side effects (such as
/// callback notifications) that already fired for the original request.
///
/// # Errors
///
/// - `TourNotFound` / `FlightNotFound`: Referenced resource doesn't exist
/// - `SoldOut`: Not enough seats on the tour or flight
/// - `InvalidRequest`: Request failed validation
/// - `Database`: Database error occurred
pub async fn create_booking(
    pool: &DbPool,
    request: CreateBookingRequest,
) -> Result<(Booking, bool), AppError> {
    request.validate()?;

    // Check for duplicate idempotency key
    if let Some(ref key) = request.idempotency_key {
        if let Some(existing) =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE idempotency_key = $1")
                .bind(key)
                .fetch_optional(pool)
                .await?
        {
            return Ok((existing, false));
        }
    }

    // Discounts are resolved against the booking date, not the tour date
    let today = Utc::now().date_naive();
    let candidates = pricing::gather_candidates(
        pool,
        request.tour_id,
        Some(request.client_email.as_str()),
        today,
    )
    .await?;

    // Start database transaction
    let mut tx = pool.begin().await?;

    // Lock the tour row and read seats + price
    // FOR UPDATE ensures no other booking can grab the same seats
    let row: Option<(i32, i64)> = sqlx::query_as(
        "SELECT seats_available, price_cents FROM tours WHERE id = $1 FOR UPDATE",
    )
    .bind(request.tour_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (seats_available, tour_price_cents) = row.ok_or(AppError::TourNotFound)?;

    if let Err(err) = ensure_seats_available(seats_available, request.seats) {
        tx.rollback().await?;
        return Err(err);
    }

    sqlx::query(
        r#"
        UPDATE tours
        SET seats_available = seats_available - $1,
            updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(request.seats)
    .bind(request.tour_id)
    .execute(&mut *tx)
    .await?;

    // Lock and decrement the flight, when one is attached
    let mut flight_price_cents: i64 = 0;
    if let Some(flight_id) = request.flight_id {
        let row: Option<(i32, i64)> = sqlx::query_as(
            "SELECT seats_available, price_cents FROM flights WHERE id = $1 FOR UPDATE",
        )
        .bind(flight_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (flight_seats, price_cents) = match row {
            Some(row) => row,
            None => {
                tx.rollback().await?;
                return Err(AppError::FlightNotFound);
            }
        };

        if let Err(err) = ensure_seats_available(flight_seats, request.seats) {
            tx.rollback().await?;
            return Err(err);
        }

        sqlx::query(
            r#"
            UPDATE flights
            SET seats_available = seats_available - $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(request.seats)
        .bind(flight_id)
        .execute(&mut *tx)
        .await?;

        flight_price_cents = price_cents;
    }

    // Resolve the price against the locked-in per-seat prices
    let quote = pricing::resolve_price(
        tour_price_cents * i64::from(request.seats),
        flight_price_cents * i64::from(request.seats),
        &candidates,
    );

    // Record the booking with its quote snapshot
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (
            idempotency_key,
            tour_id,
            flight_id,
            client_name,
            client_email,
            seats,
            base_price_cents,
            discount_percent,
            total_price_cents,
            status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
        RETURNING *
        "#,
    )
    .bind(request.idempotency_key)
    .bind(request.tour_id)
    .bind(request.flight_id)
    .bind(request.client_name)
    .bind(request.client_email)
    .bind(request.seats)
    .bind(quote.tour_cents + quote.flight_cents)
    .bind(quote.percent_applied)
    .bind(quote.total_cents)
    .fetch_one(&mut *tx)
    .await?;

    // Initial history row: no prior status
    sqlx::query(
        r#"
        INSERT INTO booking_history (booking_id, from_status, to_status, note)
        VALUES ($1, NULL, 'pending', $2)
        "#,
    )
    .bind(booking.id)
    .bind(format!("Booking created ({})", quote.source))
    .execute(&mut *tx)
    .await?;

    // Commit all changes atomically
    tx.commit().await?;

    Ok((booking, true))
}

/// Reject a reservation that would oversell.
///
/// Called while the seat row is locked, so `available - requested` is
/// exactly what the UPDATE will leave behind: an `Ok` here guarantees
/// the remaining seat count stays >= 0.
fn ensure_seats_available(available: i32, requested: i32) -> Result<(), AppError> {
    if available < requested {
        return Err(AppError::SoldOut);
    }
    Ok(())
}

/// Seats to give back when a booking moves to `next`.
///
/// Only cancellation releases seats; a completed booking keeps them
/// consumed. The release is exactly the count the booking reserved.
fn seats_released_on(next: BookingStatus, reserved: i32) -> i32 {
    if next == BookingStatus::Cancelled {
        reserved
    } else {
        0
    }
}

/// Change a booking's status, enforcing the state machine.
///
/// # Process
///
/// 1. Start database transaction
/// 2. Lock the booking row
/// 3. Reject transitions the state machine does not allow
/// 4. Update the status
/// 5. On cancellation, release the reserved tour (and flight) seats
/// 6. Append the history row
/// 7. Commit
///
/// # Returns
///
/// The updated booking together with the status it moved from, so the
/// caller can build a notification payload.
///
/// # Errors
///
/// - `BookingNotFound`: Booking doesn't exist
/// - `InvalidTransition`: The state machine forbids the move
/// - `InvalidRequest`: Unknown target status
pub async fn transition_status(
    pool: &DbPool,
    booking_id: Uuid,
    target: &str,
    note: Option<String>,
) -> Result<(Booking, BookingStatus), AppError> {
    let next = BookingStatus::parse(target)?;

    let mut tx = pool.begin().await?;

    // Lock the booking so concurrent transitions serialize
    let booking =
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BookingNotFound)?;

    let current = BookingStatus::parse(&booking.status)?;
    if !current.can_transition_to(next) {
        tx.rollback().await?;
        return Err(AppError::InvalidTransition(format!(
            "Cannot move booking from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }

    let updated = sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET status = $1,
            updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(next.as_str())
    .bind(booking_id)
    .fetch_one(&mut *tx)
    .await?;

    // Cancelling gives the seats back
    let released = seats_released_on(next, booking.seats);
    if released > 0 {
        sqlx::query(
            r#"
            UPDATE tours
            SET seats_available = seats_available + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(released)
        .bind(booking.tour_id)
        .execute(&mut *tx)
        .await?;

        if let Some(flight_id) = booking.flight_id {
            sqlx::query(
                r#"
                UPDATE flights
                SET seats_available = seats_available + $1,
                    updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(released)
            .bind(flight_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query(
        r#"
        INSERT INTO booking_history (booking_id, from_status, to_status, note)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(booking_id)
    .bind(current.as_str())
    .bind(next.as_str())
    .bind(note)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((updated, current))
}

/// Get booking by ID.
pub async fn get_booking(pool: &DbPool, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(booking_id)
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

/// List bookings, optionally filtered by client email, newest first.
pub async fn list_bookings(
    pool: &DbPool,
    client_email: Option<&str>,
) -> Result<Vec<Booking>, AppError> {
    let bookings = match client_email {
        Some(email) => {
            sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE client_email = $1 ORDER BY created_at DESC",
            )
            .bind(email)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(bookings)
}

/// List the status history of a booking, oldest first.
pub async fn booking_history(
    pool: &DbPool,
    booking_id: Uuid,
) -> Result<Vec<BookingHistoryEntry>, AppError> {
    // 404 for unknown bookings rather than an empty history
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)")
        .bind(booking_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(AppError::BookingNotFound);
    }

    let entries = sqlx::query_as::<_, BookingHistoryEntry>(
        "SELECT * FROM booking_history WHERE booking_id = $1 ORDER BY changed_at ASC",
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overselling_is_rejected() {
        assert!(matches!(
            ensure_seats_available(1, 2),
            Err(AppError::SoldOut)
        ));
        assert!(matches!(
            ensure_seats_available(0, 1),
            Err(AppError::SoldOut)
        ));
    }

    #[test]
    fn reserving_the_last_seats_is_allowed() {
        // Taking exactly what's left leaves zero, never a negative count
        assert!(ensure_seats_available(2, 2).is_ok());
        assert!(ensure_seats_available(5, 3).is_ok());
    }

    #[test]
    fn only_cancellation_releases_seats() {
        assert_eq!(seats_released_on(BookingStatus::Cancelled, 3), 3);
        assert_eq!(seats_released_on(BookingStatus::Confirmed, 3), 0);
        assert_eq!(seats_released_on(BookingStatus::Completed, 3), 0);
        assert_eq!(seats_released_on(BookingStatus::Pending, 3), 0);
    }

    #[test]
    fn release_matches_what_was_reserved() {
        // Giving back exactly the reserved count can never push
        // seats_available past the capacity it was decremented from
        for reserved in [1, 2, 10] {
            assert_eq!(seats_released_on(BookingStatus::Cancelled, reserved), reserved);
        }
    }
}
