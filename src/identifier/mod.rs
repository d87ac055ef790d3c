use std::fmt;

use crate::record::Record;

pub mod arxiv;

pub use arxiv::ArxivId;

/// The ways citation managers embed an arXiv identifier in a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `arxivid` field, as written by Mendeley.
    Mendeley,
    /// `archiveprefix = {arXiv}` with `eprint`, as recommended by arXiv.
    ArxivRecommended,
    /// `url` pointing at an `arxiv.org/abs/` page, as written by Zotero.
    ZoteroUrl,
    /// `note = {arXiv: ...}`, as written by older Zotero exports.
    ZoteroNote,
}

/// Conventions to try, in order.
///
/// NOTE: Ordering is important here, as it signifies priority. The first convention that yields
/// an identifier wins and the rest are never consulted, so `arxivid` beats a conflicting
/// `eprint` or `url`.
pub static CONVENTIONS: &[Convention] = &[
    Convention::Mendeley,
    Convention::ArxivRecommended,
    Convention::ZoteroUrl,
    Convention::ZoteroNote,
];

impl Convention {
    /// Try this convention alone on `record`.
    pub fn extract(self, record: &Record) -> Option<ArxivId> {
        match self {
            Convention::Mendeley => record.get("arxivid").and_then(arxiv::from_arxivid),
            Convention::ArxivRecommended => {
                arxiv::from_eprint(record.get("archiveprefix")?, record.get("eprint")?)
            }
            Convention::ZoteroUrl => record.get("url").and_then(arxiv::from_abs_url),
            Convention::ZoteroNote => record.get("note").and_then(arxiv::from_note),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Convention::Mendeley => "mendeley",
            Convention::ArxivRecommended => "arxiv",
            Convention::ZoteroUrl => "zotero-url",
            Convention::ZoteroNote => "zotero-note",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the arXiv identifier in `record` along with the convention it was found by.
pub fn detect(record: &Record) -> Option<(Convention, ArxivId)> {
    CONVENTIONS
        .iter()
        .find_map(|&c| c.extract(record).map(|id| (c, id)))
}

/// Find the arXiv identifier in `record`, if any.
pub fn extract(record: &Record) -> Option<ArxivId> {
    detect(record).map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        Record::new("key", fields.iter().copied())
    }

    fn check(fields: &[(&str, &str)], expected: &str) {
        let got = extract(&record(fields));
        assert_eq!(got.as_ref().map(ArxivId::as_str), Some(expected), "fields: {fields:?}");
    }

    #[test]
    fn url_new_versioned() {
        check(&[("url", "http://arxiv.org/abs/1703.08618v1")], "1703.08618");
    }

    #[test]
    fn url_old_versioned() {
        check(&[("url", "http://arxiv.org/abs/quant-ph/0210073v1")], "quant-ph/0210073");
    }

    #[test]
    fn mendeley_old_unversioned() {
        check(
            &[
                ("archiveprefix", "arXiv"),
                ("arxivid", "quant-ph/0404076"),
                ("eprint", "0404076"),
                ("primaryclass", "quant-ph"),
            ],
            "quant-ph/0404076",
        );
    }

    #[test]
    fn mendeley_old_versioned() {
        check(
            &[
                ("archiveprefix", "arXiv"),
                ("arxivid", "arXiv:quant-ph/0210073v1"),
                ("eprint", "0210073v1"),
                ("primaryclass", "arXiv:quant-ph"),
            ],
            "quant-ph/0210073",
        );
    }

    #[test]
    fn zotero_new() {
        check(
            &[
                ("url", "http://arxiv.org/abs/1703.08618"),
                ("journal", "arXiv:1703.08618 [math-ph, physics:quant-ph]"),
                ("note", "arXiv: 1703.08618"),
            ],
            "1703.08618",
        );
    }

    #[test]
    fn zotero_old() {
        check(
            &[
                ("url", "http://arxiv.org/abs/quant-ph/0304127"),
                ("journal", "arXiv:quant-ph/0304127"),
                ("note", "arXiv: quant-ph/0304127"),
            ],
            "quant-ph/0304127",
        );
    }

    #[test]
    fn arxivid_beats_conflicting_url() {
        let r = record(&[
            ("arxivid", "1703.08618"),
            ("url", "http://arxiv.org/abs/quant-ph/0210073"),
        ]);
        assert_eq!(detect(&r), Some((Convention::Mendeley, ArxivId::from("1703.08618"))));
    }

    #[test]
    fn eprint_path_keeps_version() {
        let r = record(&[("archiveprefix", "arxiv"), ("eprint", "1703.08618v2")]);
        assert_eq!(
            detect(&r),
            Some((Convention::ArxivRecommended, ArxivId::from("1703.08618v2")))
        );
    }

    #[test]
    fn eprint_without_arxiv_prefix_falls_through() {
        let r = record(&[
            ("archiveprefix", "HAL"),
            ("eprint", "hal-01234"),
            ("note", "arXiv: 1703.08618"),
        ]);
        assert_eq!(detect(&r), Some((Convention::ZoteroNote, ArxivId::from("1703.08618"))));
    }

    #[test]
    fn note_only() {
        check(&[("note", "arXiv: quant-ph/0304127v3")], "quant-ph/0304127");
    }

    #[test]
    fn nothing_recognisable() {
        assert!(extract(&record(&[("title", "A paper"), ("doi", "10.1/x")])).is_none());
        assert!(extract(&record(&[("url", "https://example.org/paper")])).is_none());
        assert!(extract(&record(&[])).is_none());
    }

    #[test]
    fn extract_never_panics() {
        proptest::proptest!(|(
            arxivid in proptest::option::of(".{0,40}"),
            archiveprefix in proptest::option::of("arXiv|ARXIV|.{0,10}"),
            eprint in proptest::option::of(".{0,40}"),
            url in proptest::option::of(".{0,40}"),
            note in proptest::option::of(".{0,40}"),
        )| {
            let mut fields = Vec::new();
            if let Some(v) = arxivid { fields.push(("arxivid", v)); }
            if let Some(v) = archiveprefix { fields.push(("archiveprefix", v)); }
            if let Some(v) = eprint { fields.push(("eprint", v)); }
            if let Some(v) = url { fields.push(("url", v)); }
            if let Some(v) = note { fields.push(("note", v)); }
            let r = Record::new("k", fields);
            if let Some(id) = extract(&r) {
                proptest::prop_assert!(!id.as_str().is_empty());
            }
        })
    }
}
