use crate::encoding::{decode_text, Encoding};
use crate::errors::ExtractError;
use serde::Deserialize;
use serde_json::{Deserializer, Value};
use std::ops::Range;
use tracing::debug;

/// The value recovered from a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The parsed JSON value.
    pub value: Value,
    /// Encoding the transcript was decoded with.
    pub encoding: Encoding,
    /// Byte range of the value within the decoded text.
    pub span: Range<usize>,
}

/// Decodes `bytes` and returns the JSON value whose parse ends furthest
/// toward the end of the text.
///
/// Every `{` or `[` is tried as a start offset; text after a parsed value
/// is ignored. If two parses end at the same offset the earlier start is
/// kept.
///
/// # Errors
///
/// Returns [`ExtractError::NotFound`] when no offset yields a value.
pub fn extract_last_json(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let (text, encoding) = decode_text(bytes);
    let (value, span) = extract_last_json_from_str(&text).ok_or(ExtractError::NotFound)?;
    Ok(Extraction {
        value,
        encoding,
        span,
    })
}

/// Scans already-decoded text. See [`extract_last_json`].
pub fn extract_last_json_from_str(text: &str) -> Option<(Value, Range<usize>)> {
    let mut best: Option<(Value, Range<usize>)> = None;
    let mut candidates = 0usize;

    // '{' and '[' are ASCII, so their byte positions are char boundaries.
    for (start, _) in text
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'{' || b == b'[')
    {
        candidates += 1;
        let Some((value, len)) = parse_prefix(&text[start..]) else {
            continue;
        };
        let end = start + len;
        if best.as_ref().map_or(true, |(_, span)| end > span.end) {
            best = Some((value, start..end));
        }
    }

    match &best {
        Some((_, span)) => debug!(
            candidates,
            start = span.start,
            end = span.end,
            "selected JSON value"
        ),
        None => debug!(candidates, "no JSON value in text"),
    }
    best
}

/// Parses one JSON value at the start of `text`, returning it with the
/// number of bytes consumed. Trailing content is not inspected.
///
/// Nesting depth is not capped; the stack grows on demand instead.
fn parse_prefix(text: &str) -> Option<(Value, usize)> {
    let mut de = Deserializer::from_str(text);
    de.disable_recursion_limit();
    let mut stream = de.into_iter::<Unbounded>();
    match stream.next() {
        Some(Ok(Unbounded(value))) => Some((value, stream.byte_offset())),
        _ => None,
    }
}

/// A [`Value`] deserialized through `serde_stacker`.
struct Unbounded(Value);

impl<'de> Deserialize<'de> for Unbounded {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(serde_stacker::Deserializer::new(deserializer)).map(Unbounded)
    }
}
