//! Tour Booking Service - Main Application Entry Point
//!
//! This is a REST API server for a tour-and-flight booking application.
//! It manages tours, flights, discounts, personalized offers, bookings
//! with a status state machine, tour reviews, and signed status-change
//! callbacks.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Tour routes
        .route("/api/tours", post(handlers::tours::create_tour))
        .route("/api/tours", get(handlers::tours::list_tours))
        .route("/api/tours/{id}", get(handlers::tours::get_tour))
        // Reviews nested under tours
        .route(
            "/api/tours/{id}/reviews",
            post(handlers::tours::create_review),
        )
        .route(
            "/api/tours/{id}/reviews",
            get(handlers::tours::list_reviews),
        )
        .route(
            "/api/tours/{id}/reviews/summary",
            get(handlers::tours::review_summary),
        )
        // Flight routes
        .route("/api/flights", post(handlers::flights::create_flight))
        .route("/api/flights", get(handlers::flights::list_flights))
        .route("/api/flights/{id}", get(handlers::flights::get_flight))
        // Discount routes
        .route("/api/discount", post(handlers::discounts::create_discount))
        .route("/api/discount", get(handlers::discounts::list_discounts))
        .route(
            "/api/discount/{id}",
            delete(handlers::discounts::deactivate_discount),
        )
        // Personalized offer routes
        .route("/api/offers", post(handlers::offers::create_offer))
        .route("/api/offers", get(handlers::offers::list_offers))
        .route(
            "/api/offers/{id}/accept",
            post(handlers::offers::accept_offer),
        )
        .route(
            "/api/offers/{id}/decline",
            post(handlers::offers::decline_offer),
        )
        // Booking routes
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/api/bookings/quote",
            post(handlers::bookings::quote_booking),
        )
        .route("/api/bookings/{id}", get(handlers::bookings::get_booking))
        .route(
            "/api/bookings/{id}/status",
            post(handlers::bookings::update_status),
        )
        .route(
            "/api/bookings/{id}/history",
            get(handlers::bookings::booking_history),
        )
        // Callback endpoint routes
        .route("/api/callbacks", post(handlers::callbacks::create_callback))
        .route("/api/callbacks", get(handlers::callbacks::list_callbacks))
        .route(
            "/api/callbacks/{id}",
            delete(handlers::callbacks::delete_callback),
        )
        // Browser clients call these endpoints directly
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
