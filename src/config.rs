//! Settings for the arXiv API client.

use std::time::Duration;

/// Base URL of the arXiv API; the `query` method is appended to it.
pub const ARXIV_BASE: &str = "http://export.arxiv.org/api/";

/// Agent string sent with every request unless the caller supplies one.
pub const DEFAULT_AGENT: &str = concat!("bibpub/", env!("CARGO_PKG_VERSION"));

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Budget for a whole request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra attempts after a transient failure.
pub const RETRIES: u32 = 1;

pub const RETRY_PAUSE: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Identifies the caller to arXiv, per their API usage policy.
    pub agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub retries: u32,
    pub retry_pause: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: ARXIV_BASE.to_string(),
            agent: DEFAULT_AGENT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            timeout: REQUEST_TIMEOUT,
            retries: RETRIES,
            retry_pause: RETRY_PAUSE,
        }
    }
}

impl ClientConfig {
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }
}
