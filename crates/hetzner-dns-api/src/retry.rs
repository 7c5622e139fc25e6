//! Transport retry with exponential backoff
//!
//! The API uses HTTP 422 both for permanent validation errors and for a
//! class of transient races, so a 422 response is retried like a transport
//! failure. The request body is buffered up front and replayed byte for
//! byte on every attempt.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, trace};
use url::Url;

use crate::errors::Error;

/// Set to `0` by the API when the per-minute request quota is used up.
const RATE_LIMIT_REMAINING_MINUTE_HEADER: &str = "x-ratelimit-remaining-minute";

/// Sends a request, retrying on transport errors and 422 responses up to
/// `max_retries` times. The final response or error is returned unchanged.
pub(crate) async fn send_with_retry(
    http: &reqwest::Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    max_retries: u32,
) -> Result<Response, Error> {
    debug!("HTTP request to API {} {}", method, url);

    let mut result = send_once(http, &method, &url, &headers, body.as_deref()).await;
    let mut retries = 0;

    loop {
        let retryable = match &result {
            Err(_) => true,
            Ok(response) => response.status() == StatusCode::UNPROCESSABLE_ENTITY,
        };

        if !retryable || retries >= max_retries {
            return result;
        }

        if let Ok(response) = &result {
            if minute_quota_exhausted(response) {
                debug!("per-minute rate limit quota exhausted, pausing for one minute");
                sleep(Duration::from_secs(60)).await;
            }
        }

        sleep(backoff(retries)).await;

        // Drain the previous response body so the connection can be reused.
        if let Ok(response) = result {
            let _ = response.bytes().await;
        }

        debug!("request to API {} {}", method, url);

        if let Some(bytes) = body.as_deref() {
            trace!("{}", String::from_utf8_lossy(bytes));
        }

        result = send_once(http, &method, &url, &headers, body.as_deref()).await;

        if let Ok(response) = &result {
            debug!("HTTP response from API {} {}", response.status(), url);
            trace!("{:?}", response.headers());
        }

        retries += 1;
    }
}

async fn send_once(
    http: &reqwest::Client,
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    body: Option<&[u8]>,
) -> Result<Response, Error> {
    let mut request = http.request(method.clone(), url.clone()).headers(headers.clone());

    if let Some(bytes) = body {
        request = request.body(bytes.to_vec());
    }

    Ok(request.send().await?)
}

fn minute_quota_exhausted(response: &Response) -> bool {
    response
        .headers()
        .get(RATE_LIMIT_REMAINING_MINUTE_HEADER)
        .is_some_and(|value| value.as_bytes() == b"0")
}

/// Doubles every two retries: 1s, 1s, 2s, 2s, 4s, ...
fn backoff(retries: u32) -> Duration {
    Duration::from_secs(1 << (retries / 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_headers(headers: &[(&str, &str)]) -> Response {
        let mut builder = http::Response::builder().status(200);

        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        Response::from(builder.body("").unwrap())
    }

    #[test]
    fn minute_pause_triggers_only_on_exhausted_quota() {
        let exhausted = response_with_headers(&[(RATE_LIMIT_REMAINING_MINUTE_HEADER, "0")]);
        assert!(minute_quota_exhausted(&exhausted));

        let remaining = response_with_headers(&[(RATE_LIMIT_REMAINING_MINUTE_HEADER, "7")]);
        assert!(!minute_quota_exhausted(&remaining));

        let absent = response_with_headers(&[]);
        assert!(!minute_quota_exhausted(&absent));
    }

    #[test]
    fn backoff_doubles_every_two_retries() {
        assert_eq!(backoff(0), Duration::from_secs(1));
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(2));
        assert_eq!(backoff(4), Duration::from_secs(4));
        assert_eq!(backoff(5), Duration::from_secs(4));
        assert_eq!(backoff(6), Duration::from_secs(8));
    }
}
