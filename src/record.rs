use std::collections::{BTreeMap, HashSet};

use biblatex::{Bibliography, ChunksExt, Entry, ParseError, ParseErrorKind};
use tracing::{debug, warn};

/// A single bibliography entry, flattened to plain strings.
///
/// Field names are always lower-case. Values are the verbatim field contents with BibTeX
/// braces removed and `@string` abbreviations (including month names) resolved. An abbreviation
/// the file uses but never defines is left as its own name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    key: String,
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new<K, V>(key: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Record {
            key: key.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    /// The citation key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Look up a field by its lower-case name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&Entry> for Record {
    fn from(entry: &Entry) -> Self {
        Record {
            key: entry.key.clone(),
            fields: entry
                .fields
                .iter()
                .map(|(name, chunks)| (name.clone(), chunks.format_verbatim().trim().to_string()))
                .collect(),
        }
    }
}

/// Parse BibTeX/BibLaTeX text into records, in input order.
///
/// A malformed entry never takes the rest of the file down with it: if the text as a whole does
/// not parse, every top-level `@...` block is parsed on its own (with the file's `@string`
/// definitions in scope) and the blocks that still fail are skipped.
pub fn parse(text: &str) -> Vec<Record> {
    match parse_bibliography(text) {
        Ok(bib) => bib.iter().map(Record::from).collect(),
        Err(e) => {
            warn!("bibliography failed to parse as a whole ({e}); retrying entry by entry");
            parse_leniently(text)
        }
    }
}

fn parse_leniently(text: &str) -> Vec<Record> {
    let blocks = split_blocks(text);

    // `@string` blocks have to travel with every entry that may refer to them.
    let strings: String = blocks
        .iter()
        .filter(|b| block_kind(b).eq_ignore_ascii_case("string"))
        .filter(|b| parse_bibliography(b).is_ok())
        .fold(String::new(), |mut acc, b| {
            acc.push_str(b);
            acc.push('\n');
            acc
        });

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for block in blocks {
        let kind = block_kind(block);
        if ["string", "preamble", "comment"]
            .iter()
            .any(|k| kind.eq_ignore_ascii_case(k))
        {
            continue;
        }

        let src = format!("{strings}{block}");
        match parse_bibliography(&src) {
            Ok(bib) => {
                for entry in bib.iter() {
                    if seen.insert(entry.key.clone()) {
                        records.push(Record::from(entry));
                    } else {
                        warn!(key = %entry.key, "duplicate citation key; keeping the first entry");
                    }
                }
            }
            Err(e) => {
                let head: String = block.chars().take(60).collect();
                warn!("skipping malformed entry ({e}): {}", head.trim());
            }
        }
    }
    records
}

/// [`Bibliography::parse`], except that abbreviations defined nowhere in `src` (usually supplied
/// by the `.bst` style) stand for their own name instead of failing the parse.
fn parse_bibliography(src: &str) -> Result<Bibliography, ParseError> {
    let mut placeholders = String::new();
    let mut defined = HashSet::new();
    loop {
        let result = if placeholders.is_empty() {
            Bibliography::parse(src)
        } else {
            Bibliography::parse(&format!("{placeholders}{src}"))
        };
        match result {
            Err(ParseError {
                kind: ParseErrorKind::UnknownAbbreviation(name),
                ..
            }) if defined.insert(name.clone()) => {
                debug!(abbreviation = %name, "undefined @string abbreviation; keeping its name");
                placeholders.push_str(&format!("@string{{{name} = {{{name}}}}}\n"));
            }
            result => return result,
        }
    }
}

/// Split text into top-level `@kind{...}` blocks. Anything before the first `@` is dropped.
///
/// An `@` starts a new block when it sits outside braces or opens a line, so an entry with
/// unbalanced braces cannot swallow the entries after it.
fn split_blocks(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut depth: usize = 0;
    let mut line_start = true;
    for (i, c) in text.char_indices() {
        match c {
            '@' if depth == 0 || line_start => {
                starts.push(i);
                depth = 0;
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c == '\n' {
            line_start = true;
        } else if !c.is_whitespace() {
            line_start = false;
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

fn block_kind(block: &str) -> &str {
    let rest = block.trim_start_matches('@');
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    &rest[..end]
}
