//! Price resolution - the discount engine.
//!
//! Given a tour, a client, and a date, this module decides which single
//! discount applies and what the final price is.
//!
//! # Rules
//!
//! - Discounts never stack: the one best percentage wins
//! - General discounts compete with the client's accepted personalized
//!   offer on equal terms; on a tie the personalized offer wins
//! - A general discount applies only when active and the date lies inside
//!   its `[valid_from, valid_until]` window
//! - A personalized offer applies only when accepted and not yet expired
//! - The discount applies to the tour portion of the price; a flight
//!   attached to the booking is charged at full price on top
//! - All math is integer cents; the discount amount is floored

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{discount::Discount, flight::Flight, offer::PersonalizedOffer, tour::Tour},
};

/// Where a winning percentage came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountSource {
    /// A general discount, identified by its code
    Code(String),
    /// The client's accepted personalized offer
    Offer(Uuid),
}

impl DiscountSource {
    /// Human-readable label used in quote responses.
    pub fn label(&self) -> String {
        match self {
            Self::Code(code) => format!("discount:{}", code),
            Self::Offer(id) => format!("offer:{}", id),
        }
    }
}

/// One discount that could apply to a price.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub percent: i32,
    pub source: DiscountSource,
}

/// A resolved price.
///
/// # JSON Example
///
/// ```json
/// {
///   "tour_cents": 240000,
///   "flight_cents": 36000,
///   "percent_applied": 15,
///   "discount_cents": 36000,
///   "total_cents": 240000,
///   "source": "offer:660e8400-e29b-41d4-a716-446655440001"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    /// Tour price for all seats, before the discount
    pub tour_cents: i64,

    /// Flight price for all seats (0 when no flight is attached)
    pub flight_cents: i64,

    /// Winning percentage (0 when nothing applied)
    pub percent_applied: i32,

    /// Amount taken off the tour portion
    pub discount_cents: i64,

    /// Final price: tour - discount + flight
    pub total_cents: i64,

    /// "none", "discount:<code>" or "offer:<id>"
    pub source: String,
}

/// Pick the winning candidate and compute the final price.
///
/// Pure function over already-filtered candidates: callers are responsible
/// for only passing discounts that actually apply on the pricing date.
///
/// # Tie Break
///
/// When a general discount and a personalized offer carry the same
/// percentage, the personalized offer wins (it is the more specific
/// grant). Ties between two general discounts keep the first seen.
pub fn resolve_price(tour_cents: i64, flight_cents: i64, candidates: &[Candidate]) -> PriceQuote {
    let mut best: Option<&Candidate> = None;

    for candidate in candidates {
        let wins = match best {
            None => true,
            Some(current) => {
                candidate.percent > current.percent
                    || (candidate.percent == current.percent
                        && matches!(candidate.source, DiscountSource::Offer(_))
                        && matches!(current.source, DiscountSource::Code(_)))
            }
        };
        if wins {
            best = Some(candidate);
        }
    }

    match best {
        Some(winner) => {
            // Integer cents only; division floors the discount
            let discount_cents = tour_cents * i64::from(winner.percent) / 100;
            PriceQuote {
                tour_cents,
                flight_cents,
                percent_applied: winner.percent,
                discount_cents,
                total_cents: tour_cents - discount_cents + flight_cents,
                source: winner.source.label(),
            }
        }
        None => PriceQuote {
            tour_cents,
            flight_cents,
            percent_applied: 0,
            discount_cents: 0,
            total_cents: tour_cents + flight_cents,
            source: "none".to_string(),
        },
    }
}

/// Gather every discount that applies to a tour for a client on a date.
///
/// # Candidates
///
/// - Active general discounts targeting this tour or storewide, whose
///   window contains `on_date`
/// - The client's accepted, unexpired personalized offer for this tour
///   (highest percentage when several exist)
pub async fn gather_candidates(
    pool: &DbPool,
    tour_id: Uuid,
    client_email: Option<&str>,
    on_date: NaiveDate,
) -> Result<Vec<Candidate>, AppError> {
    let discounts = sqlx::query_as::<_, Discount>(
        r#"
        SELECT * FROM discounts
        WHERE is_active = true
          AND (tour_id = $1 OR tour_id IS NULL)
          AND valid_from <= $2
          AND valid_until >= $2
        "#,
    )
    .bind(tour_id)
    .bind(on_date)
    .fetch_all(pool)
    .await?;

    let mut candidates: Vec<Candidate> = discounts
        .into_iter()
        // The query already filtered; applies_on guards against clock skew
        .filter(|d| d.applies_on(on_date))
        .map(|d| Candidate {
            percent: d.percent,
            source: DiscountSource::Code(d.code),
        })
        .collect();

    if let Some(email) = client_email {
        let offer = sqlx::query_as::<_, PersonalizedOffer>(
            r#"
            SELECT * FROM personalized_offers
            WHERE client_email = $1
              AND tour_id = $2
              AND status = 'accepted'
              AND expires_at > NOW()
            ORDER BY percent DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(tour_id)
        .fetch_optional(pool)
        .await?;

        if let Some(offer) = offer {
            candidates.push(Candidate {
                percent: offer.percent,
                source: DiscountSource::Offer(offer.id),
            });
        }
    }

    Ok(candidates)
}

/// Produce a price quote for a tour without creating a booking.
///
/// Used by the quote endpoint and shares its candidate gathering with
/// booking creation, so a quote always matches the price a booking
/// created in the same moment would get.
pub async fn quote_for_tour(
    pool: &DbPool,
    tour_id: Uuid,
    flight_id: Option<Uuid>,
    client_email: Option<&str>,
    seats: i32,
    on_date: Option<NaiveDate>,
) -> Result<PriceQuote, AppError> {
    if seats < 1 {
        return Err(AppError::InvalidRequest(
            "Seats must be at least 1".to_string(),
        ));
    }

    let tour = sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = $1")
        .bind(tour_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::TourNotFound)?;

    let flight_cents = match flight_id {
        Some(flight_id) => {
            let flight = sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = $1")
                .bind(flight_id)
                .fetch_optional(pool)
                .await?
                .ok_or(AppError::FlightNotFound)?;
            flight.price_cents * i64::from(seats)
        }
        None => 0,
    };

    let on_date = on_date.unwrap_or_else(|| Utc::now().date_naive());
    let candidates = gather_candidates(pool, tour_id, client_email, on_date).await?;

    Ok(resolve_price(
        tour.price_cents * i64::from(seats),
        flight_cents,
        &candidates,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(percent: i32, code: &str) -> Candidate {
        Candidate {
            percent,
            source: DiscountSource::Code(code.to_string()),
        }
    }

    fn offer(percent: i32) -> Candidate {
        Candidate {
            percent,
            source: DiscountSource::Offer(Uuid::new_v4()),
        }
    }

    #[test]
    fn no_candidates_means_full_price() {
        let quote = resolve_price(120000, 0, &[]);
        assert_eq!(quote.percent_applied, 0);
        assert_eq!(quote.discount_cents, 0);
        assert_eq!(quote.total_cents, 120000);
        assert_eq!(quote.source, "none");
    }

    #[test]
    fn best_percentage_wins() {
        let quote = resolve_price(120000, 0, &[code(10, "TEN"), code(25, "QUARTER"), code(5, "FIVE")]);
        assert_eq!(quote.percent_applied, 25);
        assert_eq!(quote.discount_cents, 30000);
        assert_eq!(quote.total_cents, 90000);
        assert_eq!(quote.source, "discount:QUARTER");
    }

    #[test]
    fn discounts_do_not_stack() {
        // 10% + 10% is not 20%: only one applies
        let quote = resolve_price(100000, 0, &[code(10, "A"), code(10, "B")]);
        assert_eq!(quote.percent_applied, 10);
        assert_eq!(quote.total_cents, 90000);
    }

    #[test]
    fn offer_beats_equal_general_discount() {
        let personal = offer(15);
        let quote = resolve_price(100000, 0, &[code(15, "GEN"), personal.clone()]);
        assert_eq!(quote.source, personal.source.label());

        // Order must not matter
        let quote = resolve_price(100000, 0, &[personal.clone(), code(15, "GEN")]);
        assert_eq!(quote.source, personal.source.label());
    }

    #[test]
    fn bigger_general_discount_beats_smaller_offer() {
        let quote = resolve_price(100000, 0, &[offer(10), code(20, "BIG")]);
        assert_eq!(quote.percent_applied, 20);
        assert_eq!(quote.source, "discount:BIG");
    }

    #[test]
    fn discount_amount_is_floored() {
        // 3% of 999 cents = 29.97 -> 29
        let quote = resolve_price(999, 0, &[code(3, "ODD")]);
        assert_eq!(quote.discount_cents, 29);
        assert_eq!(quote.total_cents, 970);
    }

    #[test]
    fn hundred_percent_makes_tour_free() {
        let quote = resolve_price(120000, 0, &[code(100, "FREE")]);
        assert_eq!(quote.discount_cents, 120000);
        assert_eq!(quote.total_cents, 0);
    }

    #[test]
    fn flight_portion_is_never_discounted() {
        let quote = resolve_price(100000, 40000, &[code(50, "HALF")]);
        assert_eq!(quote.discount_cents, 50000);
        // Tour halved, flight untouched
        assert_eq!(quote.total_cents, 50000 + 40000);
    }
}
