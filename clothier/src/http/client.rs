//! HTTP client abstraction for testability

use super::session::SessionConfig;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::StatusCode;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Name of the session cookie carrying the auth token.
const AUTH_COOKIE_NAME: &str = ".ROBLOSECURITY";

/// Errors from HTTP operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Build(String),

    /// The request never produced a response (connect, timeout, ...)
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

impl HttpError {
    /// Returns the HTTP status code if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for asynchronous HTTP client operations.
///
/// Implementations return the full response body on `200 OK` and an error
/// for anything else, other 2xx statuses included.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, including any query string
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Async HTTP client implementation using reqwest.
///
/// One instance is one session: its connection pool is shared by every
/// request of a run and released when the client is dropped.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client from session settings.
    ///
    /// The auth cookie, when present, is installed as a default header so it
    /// is attached to every outbound request.
    pub fn new(config: &SessionConfig) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.auth_cookie {
            let mut value = HeaderValue::from_str(&format!("{}={}", AUTH_COOKIE_NAME, cookie))
                .map_err(|e| HttpError::Build(format!("invalid auth cookie: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if !is_accepted(response.status()) {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(HttpError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Only a plain `200 OK` carries a usable body.
fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK
}
