//! Hetzner DNS API error types

use thiserror::Error;

/// Errors returned by the Hetzner DNS API client
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing API token: api_token must not be empty")]
    MissingApiToken,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid API endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("'{0}' is not a valid domain, it must correspond to the schema <domain>.<tld>")]
    InvalidDomainName(String),

    #[error("invalid primary server port {0}, must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("multiple zones matching name '{0}' found")]
    AmbiguousZoneName(String),

    #[error("API returned HTTP 401 Unauthorized error with message: '{0}'. Check if your API key is valid")]
    Unauthorized(String),

    #[error("API returned HTTP 422 Unprocessable Entity error with message: '{0}'")]
    Validation(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("HTTP status {0} unhandled")]
    UnhandledStatus(u16),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to resolve nameserver {name}")]
    Resolve {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
