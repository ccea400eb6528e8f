// Remote monitor API contract
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::reading::Reading;

/// Login credentials replayed when the session expires.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Failure taxonomy for remote calls.
///
/// Network, Status and Malformed are recovered inside the polling loop; only
/// staleness makes them visible. Unauthorized routes to re-authentication.
/// Kept free of transport types so the application layer stays agnostic of
/// the client implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("not authenticated or session expired")]
    Unauthorized,
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TelemetryApi: Send + Sync {
    /// Fetch the most recent reading.
    async fn fetch_latest(&self) -> Result<Reading, FetchError>;

    /// Fetch the recent history window, newest-first.
    async fn fetch_history(&self, days: u32) -> Result<Vec<Reading>, FetchError>;

    /// Establish a session. `Ok(false)` means the credentials were rejected.
    async fn login(&self, credentials: &Credentials) -> Result<bool, FetchError>;
}
