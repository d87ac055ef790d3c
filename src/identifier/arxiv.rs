use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// An arXiv identifier as it will be sent to the API.
///
/// New-style IDs look like `1703.08618`, legacy ones like `quant-ph/0210073`. Every extraction
/// path strips the version suffix except the `archiveprefix`/`eprint` one, which passes the
/// `eprint` value through untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArxivId(String);

impl ArxivId {
    pub fn new(id: impl Into<String>) -> Self {
        ArxivId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the ID is legacy-style (`subject-class/YYMMNNN`).
    pub fn is_legacy(&self) -> bool {
        self.0.contains('/')
    }
}

impl fmt::Display for ArxivId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArxivId {
    fn from(s: &str) -> Self {
        ArxivId::new(s)
    }
}

/// Mendeley: `arxivid = {arXiv:quant-ph/0210073v1}`.
pub(crate) fn from_arxivid(value: &str) -> Option<ArxivId> {
    static ARXIVID_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:arXiv:)?(.+?)(?:v[0-9]+)?$").unwrap());
    capture(&ARXIVID_RE, value)
}

/// arXiv's own recommendation: `archiveprefix = {arXiv}` plus `eprint`. The `eprint` value is
/// used verbatim, version suffix and all.
pub(crate) fn from_eprint(archive_prefix: &str, eprint: &str) -> Option<ArxivId> {
    if !archive_prefix.trim().eq_ignore_ascii_case("arxiv") || eprint.is_empty() {
        return None;
    }
    Some(ArxivId::new(eprint))
}

/// Zotero: `url = {http://arxiv.org/abs/1703.08618v1}`.
pub(crate) fn from_abs_url(value: &str) -> Option<ArxivId> {
    static ABS_URL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^https?://arxiv\.org/abs/(.+?)(?:v[0-9]+)?$").unwrap());
    capture(&ABS_URL_RE, value)
}

/// Zotero: `note = {arXiv: 1703.08618}`, possibly surrounded by other text.
///
/// Only well-formed new-style (`YYMM.NNNNN`) or legacy (`archive/NNNNNNN`) IDs are taken, so
/// surrounding punctuation never ends up in the ID.
pub(crate) fn from_note(value: &str) -> Option<ArxivId> {
    static NOTE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\barXiv: (\d{4}\.[0-9]{4,5}|[A-Za-z-]+(?:\.[A-Za-z-]+)?/[0-9]{7})(?:v\d+)?\b")
            .unwrap()
    });
    capture(&NOTE_RE, value)
}

fn capture(re: &Regex, value: &str) -> Option<ArxivId> {
    re.captures(value.trim())
        .and_then(|c| c.get(1))
        .map(|m| ArxivId::new(m.as_str()))
}
