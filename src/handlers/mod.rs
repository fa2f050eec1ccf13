//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

pub mod bookings;
pub mod callbacks;
pub mod discounts;
pub mod flights;
pub mod health;
pub mod offers;
pub mod tours;
