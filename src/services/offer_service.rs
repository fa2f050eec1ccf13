//! Personalized offer service.
//!
//! Handles offer creation and the accept/decline lifecycle. Offers that
//! pass their expiry are marked expired lazily, either when listed or
//! when a client tries to accept them.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::offer::{CreateOfferRequest, OfferStatus, PersonalizedOffer},
};

/// Create a personalized offer for a client.
///
/// # Errors
///
/// - `TourNotFound`: The referenced tour doesn't exist
/// - `InvalidRequest`: Percentage out of 1..=100, bad email, or an
///   expiry that is already in the past
pub async fn create_offer(
    pool: &DbPool,
    request: CreateOfferRequest,
) -> Result<PersonalizedOffer, AppError> {
    request.validate()?;

    if request.expires_at <= Utc::now() {
        return Err(AppError::InvalidRequest(
            "Offer expiry must be in the future".to_string(),
        ));
    }

    let tour_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tours WHERE id = $1)")
        .bind(request.tour_id)
        .fetch_one(pool)
        .await?;
    if !tour_exists {
        return Err(AppError::TourNotFound);
    }

    let offer = sqlx::query_as::<_, PersonalizedOffer>(
        r#"
        INSERT INTO personalized_offers (client_email, tour_id, percent, expires_at, status)
        VALUES ($1, $2, $3, $4, 'offered')
        RETURNING *
        "#,
    )
    .bind(request.client_email)
    .bind(request.tour_id)
    .bind(request.percent)
    .bind(request.expires_at)
    .fetch_one(pool)
    .await?;

    Ok(offer)
}

/// List a client's offers, newest first.
///
/// Pending offers past their expiry are flipped to `expired` before the
/// list is read, so clients never see a stale `offered` status.
pub async fn list_offers_for_client(
    pool: &DbPool,
    client_email: &str,
) -> Result<Vec<PersonalizedOffer>, AppError> {
    expire_stale_offers(pool, client_email).await?;

    let offers = sqlx::query_as::<_, PersonalizedOffer>(
        "SELECT * FROM personalized_offers WHERE client_email = $1 ORDER BY created_at DESC",
    )
    .bind(client_email)
    .fetch_all(pool)
    .await?;

    Ok(offers)
}

/// Accept a pending offer.
///
/// # Errors
///
/// - `OfferNotFound`: Offer doesn't exist
/// - `InvalidOfferState`: Offer already decided, or expired
pub async fn accept_offer(pool: &DbPool, offer_id: Uuid) -> Result<PersonalizedOffer, AppError> {
    decide_offer(pool, offer_id, OfferStatus::Accepted).await
}

/// Decline a pending offer.
///
/// Declining an expired offer is also rejected: the offer is already gone.
pub async fn decline_offer(pool: &DbPool, offer_id: Uuid) -> Result<PersonalizedOffer, AppError> {
    decide_offer(pool, offer_id, OfferStatus::Declined).await
}

/// Apply a client decision to an offer inside one transaction.
async fn decide_offer(
    pool: &DbPool,
    offer_id: Uuid,
    decision: OfferStatus,
) -> Result<PersonalizedOffer, AppError> {
    let mut tx = pool.begin().await?;

    let offer = sqlx::query_as::<_, PersonalizedOffer>(
        "SELECT * FROM personalized_offers WHERE id = $1 FOR UPDATE",
    )
    .bind(offer_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::OfferNotFound)?;

    let current = OfferStatus::parse(&offer.status)?;

    // A pending offer past its expiry is expired, whatever was asked
    if current == OfferStatus::Offered && offer.is_expired(Utc::now()) {
        sqlx::query(
            "UPDATE personalized_offers SET status = 'expired', updated_at = NOW() WHERE id = $1",
        )
        .bind(offer_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        return Err(AppError::InvalidOfferState(
            "Offer has expired".to_string(),
        ));
    }

    if !current.can_transition_to(decision) {
        tx.rollback().await?;
        return Err(AppError::InvalidOfferState(format!(
            "Cannot move offer from {} to {}",
            current.as_str(),
            decision.as_str()
        )));
    }

    let updated = sqlx::query_as::<_, PersonalizedOffer>(
        r#"
        UPDATE personalized_offers
        SET status = $1,
            updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(decision.as_str())
    .bind(offer_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(updated)
}

/// Flip a client's pending offers past expiry to `expired`.
async fn expire_stale_offers(pool: &DbPool, client_email: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE personalized_offers
        SET status = 'expired',
            updated_at = NOW()
        WHERE client_email = $1
          AND status = 'offered'
          AND expires_at <= NOW()
        "#,
    )
    .bind(client_email)
    .execute(pool)
    .await?;

    Ok(())
}
