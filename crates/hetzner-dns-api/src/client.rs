//! Hetzner DNS API client
//!
//! The client maps typed operations onto the JSON HTTP API at
//! `https://dns.hetzner.com`. It keeps no entity state between calls; the
//! caller owns all declarative state.
//!
//! Mutating requests (POST/PUT/DELETE) are serialized through an in-process
//! lock because the API misbehaves under concurrent writes to the same
//! account. Reads are not restricted.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::errors::Error;
use crate::retry::send_with_retry;

/// Production endpoint of the Hetzner DNS API.
pub const DEFAULT_ENDPOINT: &str = "https://dns.hetzner.com";

/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "ratelimit-reset";

const AUTH_TOKEN_HEADER: &str = "Auth-API-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API token, required and non-empty.
    pub api_token: String,
    /// Base endpoint of the API.
    pub endpoint: String,
    /// Number of retries for transient failures.
    pub max_retries: u32,
    /// Optional `User-Agent` header value.
    pub user_agent: Option<String>,
    /// Apply the TXT chunking codec inside record operations.
    pub txt_formatter: bool,
}

impl ClientConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: None,
            txt_formatter: true,
        }
    }

    /// Reads the configuration from `HETZNER_DNS_API_TOKEN`,
    /// `HETZNER_DNS_MAX_RETRIES` and `HETZNER_DNS_ENABLE_TXT_FORMATTER`.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new(std::env::var("HETZNER_DNS_API_TOKEN").unwrap_or_default());

        if let Ok(value) = std::env::var("HETZNER_DNS_MAX_RETRIES") {
            config.max_retries = value
                .parse()
                .map_err(|_| Error::Config(format!("max_retries must be a non-negative integer, got '{value}'")))?;
        }

        if let Ok(value) = std::env::var("HETZNER_DNS_ENABLE_TXT_FORMATTER") {
            config.txt_formatter = parse_env_bool(&value)
                .ok_or_else(|| Error::Config(format!("enable_txt_formatter must be a boolean, got '{value}'")))?;
        }

        Ok(config)
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn txt_formatter(mut self, enabled: bool) -> Self {
        self.txt_formatter = enabled;
        self
    }
}

/// Accepts the usual shell spellings of a boolean: `1`, `t`, `true`,
/// `TRUE`, `True` and their negative counterparts.
fn parse_env_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Client for the Hetzner DNS API
pub struct Client {
    http: reqwest::Client,
    // Validated base URL, kept as a string so a path prefix (e.g. a
    // reverse proxy in front of the API) survives path concatenation.
    endpoint: String,
    headers: HeaderMap,
    max_retries: u32,
    pub(crate) txt_formatter: bool,
    // Only one mutating request may be in flight at a time; the API
    // corrupts zone state under concurrent writes to the same account.
    write_lock: Mutex<()>,
}

/// Message body of an HTTP 401 response.
#[derive(Debug, Deserialize)]
struct ErrorMessage {
    #[serde(default)]
    message: String,
}

/// Body of an HTTP 422 response, with the message one level down.
#[derive(Debug, Deserialize)]
struct UnprocessableEntity {
    #[serde(default)]
    error: NestedErrorMessage,
}

#[derive(Debug, Default, Deserialize)]
struct NestedErrorMessage {
    #[serde(default)]
    message: String,
}

impl Client {
    /// Creates a new API client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.api_token.is_empty() {
            return Err(Error::MissingApiToken);
        }

        Url::parse(&config.endpoint)?;
        let endpoint = config.endpoint.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTH_TOKEN_HEADER,
            HeaderValue::from_str(&config.api_token)
                .map_err(|_| Error::Config("api_token contains invalid header characters".to_string()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        if let Some(user_agent) = &config.user_agent {
            headers.insert(
                reqwest::header::USER_AGENT,
                HeaderValue::from_str(user_agent)
                    .map_err(|_| Error::Config("user_agent contains invalid header characters".to_string()))?,
            );
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint,
            headers,
            max_retries: config.max_retries,
            txt_formatter: config.txt_formatter,
            write_lock: Mutex::new(()),
        })
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Response, Error> {
        self.request::<()>(Method::GET, path, None).await
    }

    /// Executes a request against the API and classifies the response.
    ///
    /// 401, 422 and 429 are turned into typed errors here; every other
    /// status is handed back to the endpoint for per-endpoint handling.
    pub(crate) async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, Error> {
        let url = Url::parse(&format!("{}{}", self.endpoint, path))?;

        let (headers, body_bytes) = match body {
            Some(body) => {
                let mut headers = self.headers.clone();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                );
                (headers, Some(serde_json::to_vec(body)?))
            }
            None => (self.headers.clone(), None),
        };

        let _guard = if method == Method::POST || method == Method::PUT || method == Method::DELETE {
            Some(self.write_lock.lock().await)
        } else {
            None
        };

        let response =
            send_with_retry(&self.http, method, url, headers, body_bytes, self.max_retries).await?;

        debug!(
            "rate limit remaining: {}",
            header_str(&response, RATE_LIMIT_REMAINING_HEADER)
        );

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                let body: ErrorMessage = read_json(response).await?;
                Err(Error::Unauthorized(body.message))
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: UnprocessableEntity = read_json(response).await?;
                Err(Error::Validation(body.error.message))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("rate limit limit: {}", header_str(&response, RATE_LIMIT_LIMIT_HEADER));
                debug!("rate limit reset: {}", header_str(&response, RATE_LIMIT_RESET_HEADER));
                Err(Error::RateLimited)
            }
            _ => Ok(response),
        }
    }
}

/// Reads the full response body and deserializes it. A malformed body
/// surfaces as [`Error::Parse`], never as a status error.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = response.text().await?;
    trace!("{}", body);

    Ok(serde_json::from_str(&body)?)
}

fn header_str<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_token_is_rejected() {
        let result = Client::new(ClientConfig::new(""));

        assert!(matches!(result, Err(Error::MissingApiToken)));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = Client::new(ClientConfig::new("token").endpoint("not a url"));

        assert!(matches!(result, Err(Error::InvalidEndpoint(_))));
    }

    #[test]
    fn env_booleans_accept_the_usual_spellings() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_env_bool(value), Some(true), "{value}");
        }

        for value in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_env_bool(value), Some(false), "{value}");
        }

        assert_eq!(parse_env_bool("yes"), None);
        assert_eq!(parse_env_bool(""), None);
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::new("token");

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.txt_formatter);
        assert!(config.user_agent.is_none());
    }
}
