//! Error types for resolving published versions.
//!
//! An arXiv ID that cannot be extracted, or a preprint with no published version, is not an
//! error: the entry is simply left out of the result. Everything here aborts the whole run.

/// Errors from talking to the arXiv API.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Connection, DNS, TLS, timeout or similar, after all retries were used up.
    #[error("arXiv API request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: ureq::Error,
    },

    /// The API answered with an error status.
    #[error("arXiv API rejected the request with status {0}")]
    Status(u16),

    /// The response was not a readable Atom feed.
    #[error("malformed Atom feed: {0}")]
    Feed(String),

    #[error("invalid API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl ApiError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport { source, .. } => is_transient(source),
            ApiError::Status(status) => *status >= 500 || *status == 429,
            ApiError::Feed(_) | ApiError::Endpoint(_) => false,
        }
    }
}

pub(crate) fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::StatusCode(status) => *status >= 500 || *status == 429,
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound
        | ureq::Error::BodyStalled => true,
        _ => false,
    }
}

/// Errors from a pipeline run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API returned a different number of entries than IDs were asked for. Its entries carry
    /// no key to match them up by, so nothing from this response can be trusted.
    #[error("arXiv API returned {returned} entries for {requested} requested IDs")]
    ResolutionMismatch { requested: usize, returned: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Whether the run failed because the API could not be reached or refused the request, as
    /// opposed to answering with something that does not line up.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Api(ApiError::Transport { .. } | ApiError::Status(_))
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
