//! Topic extraction from a source document.
//!
//! The document is free-form text (normally a markdown planning note) that
//! somewhere contains an assignment like:
//!
//! ```text
//! ODAI_LIST = [
//!     "first topic",
//!     "second<br>topic",
//! ]
//! ```
//!
//! Only the quoted strings inside the first such block are returned; the rest
//! of the document is ignored.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

pub const DEFAULT_MARKER: &str = "ODAI_LIST";

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("quoted-string pattern is valid"));

/// Anything that can turn a document's text into an ordered topic list.
pub trait TopicSource {
    fn extract_topics(&self, document: &str) -> Result<Vec<String>, Error>;
}

/// Finds `MARKER = [ ... ]` and returns every double-quoted string inside the
/// brackets, in source order. Duplicates and empty strings are kept as-is.
pub struct MarkerListExtractor {
    marker: String,
    block: Regex,
}

impl MarkerListExtractor {
    pub fn new(marker: &str) -> Self {
        let pattern = format!(r"(?s){}\s*=\s*\[(.*?)\]", regex::escape(marker));
        Self {
            marker: marker.to_string(),
            block: Regex::new(&pattern).expect("escaped marker forms a valid pattern"),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MarkerListExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl TopicSource for MarkerListExtractor {
    fn extract_topics(&self, document: &str) -> Result<Vec<String>, Error> {
        let Some(caps) = self.block.captures(document) else {
            return Err(Error::MissingMarker {
                marker: self.marker.clone(),
            });
        };
        let body = caps.get(1).map_or("", |m| m.as_str());
        Ok(QUOTED
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

/// Read `path` and extract its topics, propagating every failure.
pub fn read_topics(path: &Path, source: &impl TopicSource) -> Result<Vec<String>, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound(path.to_path_buf())
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let topics = source.extract_topics(&content)?;
    log::debug!("Extracted {} topics from {}", topics.len(), path.display());
    Ok(topics)
}

/// Like [`read_topics`], but any failure is logged and yields an empty list.
pub fn extract_topics_from_file(path: &Path, source: &impl TopicSource) -> Vec<String> {
    read_topics(path, source).unwrap_or_else(|e| {
        log::error!("{e}");
        Vec::new()
    })
}
