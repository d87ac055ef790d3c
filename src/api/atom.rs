use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};

use crate::error::ApiError;
use crate::resolver::Publication;

/// Decode an arXiv API Atom feed into one [`Publication`] per `<entry>`, in document order.
///
/// Only `<arxiv:doi>` and `<arxiv:journal_ref>` are read; an entry without them yields an empty
/// publication rather than being skipped, so positions keep lining up with the request.
pub fn parse_feed(xml: &str) -> Result<Vec<Publication>, ApiError> {
    let mut reader = Reader::from_str(xml);

    let mut seen_feed = false;
    let mut current: Option<Publication> = None;
    let mut entries = Vec::new();
    let mut cur_text = String::new();

    fn is_local(name: &[u8], target: &str) -> bool {
        // Compare local name ignoring namespace prefixes.
        if let Some(pos) = name.iter().rposition(|&b| b == b':') {
            &name[pos + 1..] == target.as_bytes()
        } else {
            name == target.as_bytes()
        }
    }

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.name();
                if is_local(name.as_ref(), "feed") {
                    seen_feed = true;
                } else if is_local(name.as_ref(), "entry") {
                    current = Some(Publication::default());
                }
                cur_text.clear();
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if is_local(name.as_ref(), "entry") {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else if let Some(entry) = current.as_mut() {
                    if is_local(name.as_ref(), "doi") {
                        entry.doi = non_empty(&cur_text);
                    } else if is_local(name.as_ref(), "journal_ref") {
                        entry.journal_ref = non_empty(&cur_text);
                    }
                }
                cur_text.clear();
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                if is_local(name.as_ref(), "feed") {
                    seen_feed = true;
                } else if is_local(name.as_ref(), "entry") {
                    entries.push(Publication::default());
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.decode().map_err(|e| ApiError::Feed(e.to_string()))?;
                cur_text.push_str(&text);
            }
            Ok(Event::CData(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::GeneralRef(r)) => push_reference(&mut cur_text, &r)?,
            Err(e) => {
                return Err(ApiError::Feed(format!(
                    "XML error at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if !seen_feed {
        return Err(ApiError::Feed("response has no <feed> element".to_string()));
    }
    Ok(entries)
}

fn push_reference(out: &mut String, r: &BytesRef<'_>) -> Result<(), ApiError> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| ApiError::Feed(e.to_string()))?
    {
        out.push(ch);
        return Ok(());
    }
    let name = r.decode().map_err(|e| ApiError::Feed(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(s) => out.push_str(s),
        None => return Err(ApiError::Feed(format!("unknown entity &{name};"))),
    }
    Ok(())
}

fn non_empty(s: &str) -> Option<String> {
    let s = normalize_ws(s);
    (!s.is_empty()).then_some(s)
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
