//! Discount data models and API request/response types.
//!
//! Discounts carry the two invariants that matter most in this service:
//! the percentage must lie within 1..=100, and the validity window must
//! satisfy `valid_from <= valid_until`. Both are enforced at request
//! validation time and again by database CHECK constraints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a discount record from the database.
///
/// # Database Table
///
/// Maps to the `discounts` table. Each discount:
/// - Has a unique, human-readable code
/// - Either targets one tour (`tour_id` set) or applies storewide (NULL)
/// - Is valid only inside its `[valid_from, valid_until]` date window
/// - Can be deactivated without being deleted (`is_active`)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Discount {
    /// Unique identifier for this discount
    pub id: Uuid,

    /// Human-readable discount code (unique)
    pub code: String,

    /// Percentage off, within 1..=100
    pub percent: i32,

    /// Tour this discount targets; NULL means storewide
    pub tour_id: Option<Uuid>,

    /// First day (inclusive) the discount applies
    pub valid_from: NaiveDate,

    /// Last day (inclusive) the discount applies
    pub valid_until: NaiveDate,

    /// Whether the discount is currently enabled
    pub is_active: bool,

    /// When the discount was created
    pub created_at: DateTime<Utc>,
}

impl Discount {
    /// Whether this discount applies on the given date.
    ///
    /// A discount applies iff it is active and the date lies inside the
    /// inclusive `[valid_from, valid_until]` window.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.valid_from <= date && date <= self.valid_until
    }
}

/// Request to create a new discount.
///
/// # JSON Example
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
/// # Validation
///
/// - `code`: Required, non-empty
/// - `percent`: Must be within 1..=100
/// - `valid_from` must not be after `valid_until`
#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    /// Discount code (unique, non-empty)
    pub code: String,

    /// Percentage off, within 1..=100
    pub percent: i32,

    /// Tour to target, or null for a storewide discount
    pub tour_id: Option<Uuid>,

    /// First valid day (inclusive)
    pub valid_from: NaiveDate,

    /// Last valid day (inclusive)
    pub valid_until: NaiveDate,
}

impl CreateDiscountRequest {
    /// Validate the percentage bound and date window invariants.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Discount code must not be empty".to_string(),
            ));
        }
        validate_percent(self.percent)?;
        if self.valid_from > self.valid_until {
            return Err(AppError::InvalidRequest(
                "valid_from must not be after valid_until".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a discount percentage lies within 1..=100.
///
/// Shared by general discounts and personalized offers.
pub fn validate_percent(percent: i32) -> Result<(), AppError> {
    if !(1..=100).contains(&percent) {
        return Err(AppError::InvalidRequest(format!(
            "Discount percent must be between 1 and 100, got {}",
            percent
        )));
    }
    Ok(())
}

/// Response body for discount endpoints.
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub id: Uuid,
    pub code: String,
    pub percent: i32,
    pub tour_id: Option<Uuid>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Discount> for DiscountResponse {
    fn from(discount: Discount) -> Self {
        Self {
            id: discount.id,
            code: discount.code,
            percent: discount.percent,
            tour_id: discount.tour_id,
            valid_from: discount.valid_from,
            valid_until: discount.valid_until,
            is_active: discount.is_active,
            created_at: discount.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_discount() -> Discount {
        Discount {
            id: Uuid::new_v4(),
            code: "SUMMER25".to_string(),
            percent: 25,
            tour_id: None,
            valid_from: date(2025, 6, 1),
            valid_until: date(2025, 8, 31),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn applies_inside_window_inclusive() {
        let discount = sample_discount();
        assert!(discount.applies_on(date(2025, 6, 1)));
        assert!(discount.applies_on(date(2025, 7, 15)));
        assert!(discount.applies_on(date(2025, 8, 31)));
    }

    #[test]
    fn does_not_apply_outside_window() {
        let discount = sample_discount();
        assert!(!discount.applies_on(date(2025, 5, 31)));
        assert!(!discount.applies_on(date(2025, 9, 1)));
    }

    #[test]
    fn inactive_discount_never_applies() {
        let mut discount = sample_discount();
        discount.is_active = false;
        assert!(!discount.applies_on(date(2025, 7, 15)));
    }

    #[test]
    fn percent_bounds_are_enforced() {
        assert!(validate_percent(1).is_ok());
        assert!(validate_percent(50).is_ok());
        assert!(validate_percent(100).is_ok());
        assert!(validate_percent(0).is_err());
        assert!(validate_percent(-5).is_err());
        assert!(validate_percent(101).is_err());
    }

    #[test]
    fn request_rejects_inverted_window() {
        let request = CreateDiscountRequest {
            code: "LATE".to_string(),
            percent: 10,
            tour_id: None,
            valid_from: date(2025, 8, 31),
            valid_until: date(2025, 6, 1),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn request_accepts_single_day_window() {
        let request = CreateDiscountRequest {
            code: "FLASH".to_string(),
            percent: 30,
            tour_id: None,
            valid_from: date(2025, 7, 1),
            valid_until: date(2025, 7, 1),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_rejects_blank_code() {
        let request = CreateDiscountRequest {
            code: "  ".to_string(),
            percent: 10,
            tour_id: None,
            valid_from: date(2025, 6, 1),
            valid_until: date(2025, 8, 31),
        };
        assert!(request.validate().is_err());
    }
}
