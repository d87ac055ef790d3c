use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::{
    api::MetadataSource,
    error::Result,
    identifier::{self, ArxivId, Convention},
    record::{self, Record},
    resolver,
};

/// Citation key to published-version link, for every entry that could be resolved.
pub type ResultMapping = BTreeMap<String, String>;

/// An arXiv ID found in one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extracted {
    pub key: String,
    pub id: ArxivId,
    pub convention: Convention,
}

/// Every record of `records` that carries a recognisable arXiv ID, in input order. Records
/// without one are left out.
pub fn extract_ids(records: &[Record]) -> Vec<Extracted> {
    records
        .iter()
        .filter_map(|r| match identifier::detect(r) {
            Some((convention, id)) => {
                debug!(key = r.key(), %id, legacy = id.is_legacy(), %convention, "found arXiv ID");
                Some(Extracted {
                    key: r.key().to_string(),
                    id,
                    convention,
                })
            }
            None => {
                debug!(key = r.key(), "no arXiv ID");
                None
            }
        })
        .collect()
}

/// Distinct IDs in first-seen order.
pub fn distinct_ids(extracted: &[Extracted]) -> Vec<ArxivId> {
    let mut seen = HashSet::new();
    extracted
        .iter()
        .filter(|e| seen.insert(&e.id))
        .map(|e| e.id.clone())
        .collect()
}

/// Find links to the published versions of the arXiv preprints cited in `bibtext`.
///
/// All distinct IDs go to `source` in one batch. Entries without an arXiv ID, and preprints with
/// neither a DOI nor a journal reference, are silently left out of the result.
pub fn find_published_entries<S>(bibtext: &str, source: &S) -> Result<ResultMapping>
where
    S: MetadataSource + ?Sized,
{
    resolve_records(&record::parse(bibtext), source)
}

/// Same as [`find_published_entries`], for records that have already been parsed.
pub fn resolve_records<S>(records: &[Record], source: &S) -> Result<ResultMapping>
where
    S: MetadataSource + ?Sized,
{
    let extracted = extract_ids(records);
    let ids = distinct_ids(&extracted);
    info!(
        records = records.len(),
        with_id = extracted.len(),
        distinct = ids.len(),
        "extracted arXiv IDs"
    );

    let publications = resolver::resolve(source, &ids)?;

    Ok(extracted
        .into_iter()
        .filter_map(|e| {
            let link = publications.get(&e.id)?.published_link()?;
            Some((e.key, link))
        })
        .collect())
}
