//! Castpulse error types.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, CastpulseError>;

/// Result alias for remote provider calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Top-level error for Castpulse operations.
#[derive(Error, Debug)]
pub enum CastpulseError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure classes for remote status/action calls.
///
/// The retry wrapper only retries `Timeout` and `Connection`; everything
/// else propagates immediately. `Exhausted` is the distinguished "remote
/// call failed" condition raised after retries run out.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authorization rejected: {0}")]
    Auth(String),

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("remote call failed after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl ApiError {
    /// Whether the retry wrapper should attempt this call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Connection(_))
    }

    /// Whether this is an authorization failure (token scope, expiry).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}
