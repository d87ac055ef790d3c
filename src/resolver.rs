use std::collections::HashMap;

use tracing::debug;

use crate::{
    api::MetadataSource,
    error::{Error, Result},
    identifier::ArxivId,
};

/// What arXiv knows about where a preprint was published.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Publication {
    pub doi: Option<String>,
    /// Free-text journal reference, e.g. `Phys. Rev. A 96, 012345 (2017)`.
    pub journal_ref: Option<String>,
}

impl Publication {
    /// Link to the published version: a DOI resolver URL if there is a DOI, otherwise the journal
    /// reference as-is.
    pub fn published_link(&self) -> Option<String> {
        if let Some(doi) = &self.doi {
            Some(format!("https://dx.doi.org/{doi}"))
        } else {
            self.journal_ref.clone()
        }
    }
}

/// Look up every ID in `ids` with a single request to `source`.
///
/// `ids` should be distinct. The source's answers are paired with `ids` by position, so a
/// response of any other length is rejected outright.
pub fn resolve<S>(source: &S, ids: &[ArxivId]) -> Result<HashMap<ArxivId, Publication>>
where
    S: MetadataSource + ?Sized,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let publications = source.fetch(ids)?;
    if publications.len() != ids.len() {
        return Err(Error::ResolutionMismatch {
            requested: ids.len(),
            returned: publications.len(),
        });
    }

    Ok(ids
        .iter()
        .cloned()
        .zip(publications)
        .inspect(|(id, publication)| debug!(%id, ?publication, "resolved"))
        .collect())
}
