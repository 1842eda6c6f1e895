//! Unified error handling for `llm-service`.
//!
//! A single top-level [`LlmServiceError`] covers the whole crate, with
//! domain-specific sub-enums for config loading and provider failures.
//! Helpers for reading environment variables return the unified
//! [`Result<T>`] alias.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmServiceError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmServiceError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider-side failures (bad status, undecodable payload, timeout).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error without a status.
    #[error("transport error: {0}")]
    HttpTransport(reqwest::Error),
}

/// Errors raised while loading or validating a config.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A numeric variable failed to parse.
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Config carries the wrong provider for the requested client.
    #[error("unsupported provider for this client")]
    InvalidProvider,

    /// API key absent for a provider that requires one.
    #[error("missing API key")]
    MissingApiKey,

    /// Endpoint is empty or does not start with http(s)://.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors raised by a live provider call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-success HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The completion response carried no choices.
    #[error("empty choices in completion response")]
    EmptyChoices,

    /// The call exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return LlmServiceError::Provider(ProviderError::Timeout);
        }
        LlmServiceError::HttpTransport(e)
    }
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            LlmServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            LlmServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Trims a response body into a short, single-line log snippet.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 240;
    let one_line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.len() <= MAX {
        one_line
    } else {
        let mut cut = MAX;
        while !one_line.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &one_line[..cut])
    }
}
