use std::thread;

use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::ApiError,
    identifier::ArxivId,
    resolver::Publication,
};

pub mod atom;

/// Anything that can look up publication metadata for a batch of arXiv IDs.
///
/// Implementations must return one publication per requested ID, in request order. The resolver
/// checks the count; it cannot check the order, because the API's entries carry no key.
pub trait MetadataSource {
    fn fetch(&self, ids: &[ArxivId]) -> Result<Vec<Publication>, ApiError>;
}

/// Blocking client for the arXiv `query` API.
pub struct ArxivClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl ArxivClient {
    pub fn new(config: ClientConfig) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(config.connect_timeout))
            .timeout_global(Some(config.timeout))
            .build();
        ArxivClient {
            agent: ureq::Agent::new_with_config(cfg),
            config,
        }
    }

    /// `{base}query?id_list=a,b,c&max_results=3`
    pub fn query_url(&self, ids: &[ArxivId]) -> Result<Url, ApiError> {
        let mut base = self.config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let mut url = Url::parse(&base)?.join("query")?;
        let id_list = ids.iter().map(ArxivId::as_str).collect::<Vec<_>>().join(",");
        url.query_pairs_mut()
            .append_pair("id_list", &id_list)
            .append_pair("max_results", &ids.len().to_string());
        Ok(url)
    }

    fn fetch_once(&self, url: &Url, attempt: u32) -> Result<String, ApiError> {
        let transport = |source: ureq::Error| match source {
            ureq::Error::StatusCode(status) => ApiError::Status(status),
            source => ApiError::Transport {
                attempts: attempt,
                source,
            },
        };
        self.agent
            .get(url.as_str())
            .header("User-Agent", self.config.agent.as_str())
            .header("Accept", "application/atom+xml")
            .call()
            .map_err(transport)?
            .into_body()
            .read_to_string()
            .map_err(transport)
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        ArxivClient::new(ClientConfig::default())
    }
}

impl MetadataSource for ArxivClient {
    fn fetch(&self, ids: &[ArxivId]) -> Result<Vec<Publication>, ApiError> {
        let url = self.query_url(ids)?;
        info!(ids = ids.len(), "querying arXiv API");
        debug!(%url, agent = %self.config.agent);

        let mut attempt = 0;
        let body = loop {
            attempt += 1;
            match self.fetch_once(&url, attempt) {
                Ok(body) => break body,
                Err(e) if e.is_transient() && attempt <= self.config.retries => {
                    warn!(
                        attempt,
                        "arXiv request failed ({e}); retrying in {:?}", self.config.retry_pause
                    );
                    thread::sleep(self.config.retry_pause);
                }
                Err(e) => return Err(e),
            }
        };

        atom::parse_feed(&body)
    }
}
