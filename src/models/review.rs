//! Review models for tour feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Longest accepted review comment, in characters.
const MAX_COMMENT_CHARS: usize = 2000;

/// Represents a review record from the database.
///
/// Maps to the `reviews` table. Ratings are bounded 1..=5 at request
/// validation time and by a database CHECK constraint.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub client_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a review.
///
/// # JSON Example
///
/// ```json
/// {
///   "client_name": "Maria Petrova",
///   "rating": 5,
///   "comment": "Wonderful guides, great food."
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    /// Name of the reviewer (required, non-empty)
    pub client_name: String,

    /// Star rating, within 1..=5
    pub rating: i32,

    /// Review text (required, at most 2000 characters)
    pub comment: String,
}

impl CreateReviewRequest {
    /// Validate the rating bound and comment length.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.client_name.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Reviewer name must not be empty".to_string(),
            ));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::InvalidRequest(format!(
                "Rating must be between 1 and 5, got {}",
                self.rating
            )));
        }
        if self.comment.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Comment must not be empty".to_string(),
            ));
        }
        if self.comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(AppError::InvalidRequest(format!(
                "Comment must not exceed {} characters",
                MAX_COMMENT_CHARS
            )));
        }
        Ok(())
    }
}

/// Response body for review endpoints.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub client_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            tour_id: review.tour_id,
            client_name: review.client_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Aggregated review stats for a tour.
///
/// `average_rating` is null when the tour has no reviews yet.
#[derive(Debug, Serialize)]
pub struct ReviewSummary {
    pub tour_id: Uuid,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateReviewRequest {
        CreateReviewRequest {
            client_name: "Maria Petrova".to_string(),
            rating: 5,
            comment: "Wonderful guides, great food.".to_string(),
        }
    }

    #[test]
    fn rating_bounds_are_enforced() {
        for rating in 1..=5 {
            let mut req = valid_request();
            req.rating = rating;
            assert!(req.validate().is_ok());
        }

        for rating in [0, 6, -1] {
            let mut req = valid_request();
            req.rating = rating;
            assert!(req.validate().is_err());
        }
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut req = valid_request();
        req.comment = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let mut req = valid_request();
        req.comment = "x".repeat(MAX_COMMENT_CHARS + 1);
        assert!(req.validate().is_err());

        req.comment = "x".repeat(MAX_COMMENT_CHARS);
        assert!(req.validate().is_ok());
    }
}
