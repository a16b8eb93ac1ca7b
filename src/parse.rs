//! A minimal Burmeister-style context table reader.
//!
//! `object : attr attr attr ;` records, one or more per line or spanning
//! several lines; `#`, `--`, and `%` start a comment running to end of
//! line. A thin external shell: it knows nothing about
//! [`crate::context::Context`] beyond [`Context::from_pairs`].

use crate::error::{Error, Result};

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        let mut cut = bare.len();
        for marker in ["#", "--", "%"] {
            if let Some(pos) = bare.find(marker) {
                cut = cut.min(pos);
            }
        }
        out.push_str(&bare[..cut]);
        if line.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Parses `text` into `(object, attributes)` pairs in declaration order.
/// Each record is `object : attr attr … ;`; an empty attribute list after
/// the colon is allowed (an object with no attributes yet).
pub fn parse_context(text: &str) -> Result<Vec<(String, Vec<String>)>> {
    let stripped = strip_comments(text);
    let mut out = Vec::new();
    let mut offset = 0usize;
    for segment in stripped.split(';') {
        let record_start = offset;
        offset += segment.len() + 1;
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        let colon = trimmed.find(':').ok_or_else(|| Error::Parse {
            offset: record_start,
            message: "expected ':' separating object from attributes".to_string(),
        })?;
        let object = trimmed[..colon].trim();
        if object.is_empty() {
            return Err(Error::Parse { offset: record_start, message: "empty object name".to_string() });
        }
        let attributes: Vec<String> = trimmed[colon + 1..].split_whitespace().map(str::to_string).collect();
        out.push((object.to_string(), attributes));
    }
    Ok(out)
}
