//! Environment-driven settings.

use std::env;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Settings {
    /// Read settings from the process environment. `.env` loading is the
    /// binary's job (dotenvy) so the library stays environment-agnostic.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/farmacia".into());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(5);
        Settings {
            database_url,
            port,
            max_connections,
        }
    }
}
