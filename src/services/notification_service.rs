//! Notification service for managing callback endpoints and sending events.
//!
//! This module handles callback endpoint registration, delivery of booking
//! status-change events, and HMAC signature generation so receivers can
//! verify that events really came from this service.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::booking::Booking;
use crate::models::callback::{
    CallbackEndpoint, CallbackEndpointRequest, CallbackEndpointResponse, CallbackPayload,
    NewCallbackEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Register a new callback endpoint.
///
/// # Process
///
/// 1. Validate URL format
/// 2. Generate cryptographically secure secret (32 bytes)
/// 3. Store endpoint in database
/// 4. Return endpoint with secret (only shown once)
///
/// # Security
///
/// - HTTPS is required for production endpoints
/// - HTTP localhost is allowed for testing
/// - Secret is 64 hex characters (32 bytes of randomness)
pub async fn create_callback_endpoint(
    pool: &DbPool,
    request: CallbackEndpointRequest,
) -> Result<CallbackEndpointResponse, AppError> {
    // Validate URL
    validate_callback_url(&request.url)?;

    // Generate secure random secret (32 bytes = 64 hex chars)
    let secret = generate_secret();

    // Insert into database
    let endpoint = sqlx::query_as::<_, CallbackEndpoint>(
        r#"
        INSERT INTO callback_endpoints (url, secret)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&request.url)
    .bind(&secret)
    .fetch_one(pool)
    .await?;

    // Return response with secret included (only time it's shown)
    Ok(CallbackEndpointResponse::from(endpoint).with_secret(secret))
}

/// List all active callback endpoints.
///
/// Does NOT return secrets.
pub async fn list_callback_endpoints(
    pool: &DbPool,
) -> Result<Vec<CallbackEndpointResponse>, AppError> {
    let endpoints = sqlx::query_as::<_, CallbackEndpoint>(
        "SELECT * FROM callback_endpoints WHERE is_active = true ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    // Convert to response format (secrets excluded)
    Ok(endpoints.into_iter().map(|e| e.into()).collect())
}

/// Delete a callback endpoint (soft delete).
///
/// Sets `is_active = false` so the event history is preserved.
pub async fn delete_callback_endpoint(pool: &DbPool, endpoint_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE callback_endpoints SET is_active = false WHERE id = $1")
        .bind(endpoint_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::CallbackNotFound);
    }

    Ok(())
}

/// Send a status-change notification to all registered endpoints.
///
/// # Error Handling
///
/// Never returns an error: the booking change is already committed when
/// this runs, so nothing notification-side may surface to the client.
/// Failures to load endpoints, deliver an event, or record a delivery
/// are logged and swallowed.
pub async fn notify_status_changed(
    pool: &DbPool,
    booking: &Booking,
    from_status: Option<String>,
    to_status: String,
) {
    let endpoints = match sqlx::query_as::<_, CallbackEndpoint>(
        "SELECT * FROM callback_endpoints WHERE is_active = true",
    )
    .fetch_all(pool)
    .await
    {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!("Failed to load callback endpoints: {:?}", e);
            return;
        }
    };

    for endpoint in endpoints {
        if let Err(e) = send_callback(
            pool,
            &endpoint,
            booking,
            from_status.clone(),
            to_status.clone(),
        )
        .await
        {
            tracing::error!("Failed to send callback to {}: {:?}", endpoint.url, e);
            // Continue to next endpoint even if one fails
        }
    }
}

/// Send a single callback with HMAC signature.
///
/// # Headers Sent
///
/// - `Content-Type: application/json`
/// - `X-Callback-Signature: sha256=<hex>`
/// - `X-Callback-Event-Id: <uuid>`
///
/// # Timeout
///
/// 5 seconds per delivery (prevents hanging on slow endpoints)
async fn send_callback(
    pool: &DbPool,
    endpoint: &CallbackEndpoint,
    booking: &Booking,
    from_status: Option<String>,
    to_status: String,
) -> Result<(), AppError> {
    let event_id = Uuid::new_v4();

    // Build payload
    let payload = CallbackPayload::new(event_id, booking.clone(), from_status, to_status);
    let payload_json = serde_json::to_string(&payload)
        .map_err(|e| AppError::InvalidRequest(format!("Failed to serialize payload: {}", e)))?;

    // Generate HMAC signature
    let signature = generate_signature(&endpoint.secret, &payload_json);

    // Send HTTP POST
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .map_err(|e| AppError::InvalidRequest(format!("HTTP client error: {}", e)))?;

    let response = client
        .post(&endpoint.url)
        .header("Content-Type", "application/json")
        .header("X-Callback-Signature", &signature)
        .header("X-Callback-Event-Id", event_id.to_string())
        .body(payload_json.clone())
        .send()
        .await;

    // Record event in database
    let (status, body) = match response {
        Ok(resp) => {
            let status = resp.status().as_u16() as i32;
            let body = resp.text().await.ok();
            (Some(status), body)
        }
        Err(e) => {
            let error_msg = format!("Request failed: {}", e);
            tracing::error!("{}", error_msg);
            (None, Some(error_msg))
        }
    };

    // Create callback event record
    let payload_value = serde_json::from_str::<serde_json::Value>(&payload_json)
        .map_err(|e| AppError::InvalidRequest(format!("Failed to parse payload: {}", e)))?;

    let event = NewCallbackEvent::new(event_id, endpoint.id, booking.id, payload_value, status, body);

    // Store event record
    sqlx::query(
        r#"
        INSERT INTO callback_events (
            id,
            callback_endpoint_id,
            booking_id,
            payload,
            response_status,
            response_body
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(event.id)
    .bind(event.callback_endpoint_id)
    .bind(event.booking_id)
    .bind(event.payload)
    .bind(event.response_status)
    .bind(event.response_body)
    .execute(pool)
    .await?;

    Ok(())
}

/// Generate HMAC-SHA256 signature for a callback payload.
///
/// # Format
///
/// `sha256=<hex_encoded_hmac>`
///
/// # Verification
///
/// Receivers should:
/// 1. Extract signature from `X-Callback-Signature` header
/// 2. Compute HMAC-SHA256(secret, request_body)
/// 3. Compare using constant-time comparison
fn generate_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    let result = mac.finalize();
    format!("sha256={}", hex::encode(result.into_bytes()))
}

/// Generate cryptographically secure random secret.
///
/// # Output
///
/// 64 hex characters (32 random bytes)
fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Validate callback URL format.
///
/// # Rules
///
/// - Must be valid URL
/// - Must be HTTPS (HTTP localhost allowed for development)
/// - Maximum 2048 characters
fn validate_callback_url(url: &str) -> Result<(), AppError> {
    if url.len() > 2048 {
        return Err(AppError::InvalidCallbackUrl(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    // Parse URL
    let parsed = url::Url::parse(url)
        .map_err(|_| AppError::InvalidCallbackUrl("Invalid URL format".to_string()))?;

    // Check scheme
    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            // Allow HTTP for localhost/127.0.0.1 (testing)
            if parsed.host_str() == Some("localhost")
                || parsed.host_str() == Some("127.0.0.1")
                || parsed.host_str() == Some("0.0.0.0")
            {
                Ok(())
            } else {
                Err(AppError::InvalidCallbackUrl(
                    "HTTP is only allowed for localhost. Use HTTPS for production.".to_string(),
                ))
            }
        }
        _ => Err(AppError::InvalidCallbackUrl(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_urls_are_accepted() {
        assert!(validate_callback_url("https://example.com/events").is_ok());
    }

    #[test]
    fn http_is_localhost_only() {
        assert!(validate_callback_url("http://localhost:8080/events").is_ok());
        assert!(validate_callback_url("http://127.0.0.1/events").is_ok());
        assert!(validate_callback_url("http://example.com/events").is_err());
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(validate_callback_url("ftp://example.com/events").is_err());
        assert!(validate_callback_url("not a url").is_err());
    }

    #[test]
    fn overlong_urls_are_rejected() {
        let url = format!("https://example.com/{}", "a".repeat(2048));
        assert!(validate_callback_url(&url).is_err());
    }

    #[test]
    fn signature_is_stable_and_prefixed() {
        let sig = generate_signature("secret", "payload");
        assert!(sig.starts_with("sha256="));
        // Same inputs, same signature
        assert_eq!(sig, generate_signature("secret", "payload"));
        // Different secret, different signature
        assert_ne!(sig, generate_signature("other", "payload"));
    }

    #[test]
    fn secrets_are_64_hex_chars_and_unique() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
