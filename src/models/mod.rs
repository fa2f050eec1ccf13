//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response types for the JSON API.

/// Booking entity and status state machine
pub mod booking;
/// Callback endpoint and event models
pub mod callback;
/// General discounts with percentage and date-window invariants
pub mod discount;
/// Flight entity
pub mod flight;
/// Booking status history entries
pub mod history;
/// Personalized per-client offers
pub mod offer;
/// Tour reviews
pub mod review;
/// Tour entity
pub mod tour;
