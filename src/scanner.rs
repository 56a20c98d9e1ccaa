//! @ai:module:intent Find `/** ... */` doc comments in source text and turn each into an event sequence
//! @ai:module:layer application
//! @ai:module:public_api Scanner, ScannerConfig, DocComment, scan_events
//! @ai:module:depends_on event
//! @ai:module:stateless true
//!
//! The scan is a single forward pass. String literals and `//` line comments are
//! skipped so that a `/**` inside them never opens a doc comment. Nothing here
//! fails: unterminated literals and comments simply run to the end of input.

use crate::event::{Event, EventSink, Tag};
use regex::Regex;
use std::sync::LazyLock;

/// Leading whitespace and `*` decoration on every line of a comment body.
static LINE_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[\s*]*").expect("Invalid regex"));

pub const DEFAULT_TAG_MARKER: char = '@';

/// @ai:intent Scanner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    pub tag_marker: char,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tag_marker: DEFAULT_TAG_MARKER,
        }
    }
}

/// @ai:intent One doc comment split into its description and ordered tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub description: String,
    /// Raw `(name, value)` pairs in source order
    pub tags: Vec<(String, String)>,
}

impl DocComment {
    /// @ai:intent Parse a comment body (without the outer delimiters)
    /// @ai:post description is everything before the first unescaped marker
    /// @ai:effects pure
    pub fn parse(body: &str, tag_marker: char) -> Self {
        let text = normalize(body);
        let markers = unescaped_markers(&text, tag_marker);

        let description_end = markers.first().copied().unwrap_or(text.len());
        let description = text[..description_end].to_string();

        let mut tags = Vec::with_capacity(markers.len());
        for (i, &start) in markers.iter().enumerate() {
            let end = markers.get(i + 1).copied().unwrap_or(text.len());
            let segment = &text[start + tag_marker.len_utf8()..end];

            let name_end = segment.find(char::is_whitespace).unwrap_or(segment.len());
            if name_end == 0 {
                continue;
            }
            tags.push((
                segment[..name_end].to_string(),
                segment[name_end..].to_string(),
            ));
        }

        Self { description, tags }
    }

    /// @ai:intent Expand into the fixed event order: open, tags, description, close
    /// @ai:effects pure
    pub fn events(&self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.tags.len() + 3);
        events.push(Event::open());
        events.extend(
            self.tags
                .iter()
                .map(|(name, value)| Event::from_raw(name, value)),
        );
        events.push(Event::new(Tag::Description, &self.description));
        events.push(Event::close());
        events
    }
}

/// @ai:intent Linear scanner over source text
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// @ai:intent Scan source text and feed every doc comment's events to a sink
    /// @ai:effects calls sink
    pub fn scan<S: EventSink + ?Sized>(&self, source: &str, sink: &mut S) {
        for comment in self.comments(source) {
            tracing::trace!(
                tags = comment.tags.len(),
                description_len = comment.description.len(),
                "doc comment"
            );
            for event in comment.events() {
                sink.accept(&event);
            }
        }
    }

    /// @ai:intent Parse every doc comment in source order
    /// @ai:effects pure
    pub fn comments(&self, source: &str) -> Vec<DocComment> {
        raw_blocks(source)
            .into_iter()
            .map(|body| DocComment::parse(body, self.config.tag_marker))
            .collect()
    }
}

/// @ai:intent Scan with the default marker and collect the events
/// @ai:effects pure
pub fn scan_events(source: &str) -> Vec<Event> {
    let mut events = Vec::new();
    Scanner::default().scan(source, &mut events);
    events
}

/// @ai:intent Locate doc comment bodies, skipping string literals and line comments
/// @ai:complexity O(n), every sub-loop only moves forward
/// @ai:effects pure
fn raw_blocks(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            quote @ (b'\'' | b'"') => pos = skip_string(bytes, pos, quote),
            b'/' if bytes.get(pos + 1) == Some(&b'/') => pos = skip_line(bytes, pos),
            b'/' if source[pos..].starts_with(Tag::OPEN_MARKER) => {
                let body_start = pos + Tag::OPEN_MARKER.len();
                // The opener's second `*` may close it, so `/**/` is an empty comment.
                let (body_end, after) = match source[pos + 2..].find(Tag::CLOSE_MARKER) {
                    Some(offset) => (pos + 2 + offset, pos + 2 + offset + 2),
                    None => (bytes.len(), bytes.len()),
                };
                blocks.push(&source[body_start.min(body_end)..body_end]);
                pos = after;
                continue;
            }
            _ => {}
        }
        pos += 1;
    }

    blocks
}

/// Index of the closing quote, or the input length when unterminated.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    (start + 1..bytes.len())
        .find(|&i| bytes[i] == quote && bytes[i - 1] != b'\\')
        .unwrap_or(bytes.len())
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| start + offset)
}

/// @ai:intent Strip one delimiter layer and per-line `*` decoration
/// @ai:effects pure
fn normalize(body: &str) -> String {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix(Tag::OPEN_MARKER).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(Tag::CLOSE_MARKER).unwrap_or(trimmed);
    LINE_DECORATION.replace_all(trimmed, "").into_owned()
}

/// Byte offsets of every marker not preceded by a backslash.
fn unescaped_markers(text: &str, marker: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut previous = None;
    for (idx, c) in text.char_indices() {
        if c == marker && previous != Some('\\') {
            positions.push(idx);
        }
        previous = Some(c);
    }
    positions
}
