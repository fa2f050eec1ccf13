//! Runtime configuration for the booking server.
//!
//! Everything the server needs at startup comes from the environment
//! (optionally via a `.env` file), deserialized into `Config` by the
//! `envy` crate so field types are checked up front.

use serde::Deserialize;

/// Configuration the booking server reads at startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string for the
///   tours/bookings database
/// - `SERVER_PORT` (optional): HTTP listen port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

/// Listen port used when SERVER_PORT is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// A `.env` file in the working directory is applied first when
    /// present; a missing one is not an error. Envy maps field names to
    /// upper-cased variables (`database_url` reads `DATABASE_URL`).
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` is missing or a value
    /// cannot be parsed into its field type (e.g. a non-numeric port).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_3000() {
        assert_eq!(default_port(), 3000);
    }
}
