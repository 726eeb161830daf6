//! Per-run HTTP sessions and authentication.

use super::client::{AsyncHttpClient, HttpError, ReqwestClient};
use crate::config::{DEFAULT_POOL_MAX_IDLE_PER_HOST, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings applied to every session opened by a [`ReqwestConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Total timeout per request
    pub timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// Auth token attached as a session cookie, if any
    pub auth_cookie: Option<String>,
}

impl SessionConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_cookie(mut self, cookie: Option<String>) -> Self {
        self.auth_cookie = cookie;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            auth_cookie: None,
        }
    }
}

/// Opens HTTP sessions.
///
/// The pipeline calls [`connect`](HttpConnector::connect) once at the start
/// of each run and drops the returned client when the run ends.
pub trait HttpConnector: Send + Sync + 'static {
    /// Client type produced by this connector.
    type Client: AsyncHttpClient + 'static;

    /// Opens a new session.
    fn connect(&self) -> Result<Self::Client, HttpError>;
}

/// Connector producing reqwest-backed sessions.
#[derive(Debug, Clone, Default)]
pub struct ReqwestConnector {
    config: SessionConfig,
}

impl ReqwestConnector {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Returns the settings applied to each session.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl HttpConnector for ReqwestConnector {
    type Client = ReqwestClient;

    fn connect(&self) -> Result<ReqwestClient, HttpError> {
        ReqwestClient::new(&self.config)
    }
}

/// Reads the auth token from a local file.
///
/// A missing, unreadable or blank file means unauthenticated requests.
pub fn load_auth_cookie(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                debug!(path = %path.display(), "Cookie file is empty");
                None
            } else {
                debug!(path = %path.display(), "Loaded auth cookie");
                Some(token.to_string())
            }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No cookie file found");
            None
        }
    }
}
