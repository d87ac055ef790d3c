//! Find the published versions of arXiv preprints cited in a BibTeX file.
//!
//! ```no_run
//! use bibpub::{ArxivClient, ClientConfig, find_published_entries};
//!
//! let bibtext = std::fs::read_to_string("refs.bib")?;
//! let client = ArxivClient::new(ClientConfig::default().with_agent("my-thesis-tool"));
//! for (key, link) in find_published_entries(&bibtext, &client)? {
//!     println!("{key}\t{link}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod identifier;
pub mod pipeline;
pub mod record;
pub mod resolver;

pub use api::{ArxivClient, MetadataSource};
pub use config::ClientConfig;
pub use error::{ApiError, Error};
pub use identifier::{ArxivId, Convention};
pub use pipeline::{ResultMapping, find_published_entries};
pub use record::Record;
pub use resolver::Publication;
