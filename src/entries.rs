//! Source entry lists.
//!
//! An entry list is UTF-8 text with one `Title::URL` record per line.
//! Blank lines are ignored; malformed lines are logged and skipped.

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Separator between the title and URL fields.
pub const FIELD_SEPARATOR: &str = "::";

/// One page to fetch, with the chapter title it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub title: String,
    pub url: String,
}

impl SourceEntry {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Parse one record. Both fields are trimmed.
    ///
    /// Returns `None` unless the line has exactly two `::`-separated fields.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split(FIELD_SEPARATOR);
        let (Some(title), Some(url), None) = (fields.next(), fields.next(), fields.next()) else {
            return None;
        };
        Some(Self::new(title.trim(), url.trim()))
    }
}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{}", self.title, self.url)
    }
}

/// Parse an entry list, keeping input order.
#[must_use]
pub fn parse_entries(text: &str) -> Vec<SourceEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.trim();
            if line.is_empty() {
                return None;
            }
            let entry = SourceEntry::parse(line);
            if entry.is_none() {
                tracing::warn!(
                    line = index + 1,
                    content = %line,
                    "invalid entry format (expected 'Chapter Name::URL')"
                );
            }
            entry
        })
        .collect()
}

/// Read and parse an entry list file.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be read.
pub fn read_entries(path: &Path) -> Result<Vec<SourceEntry>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_entries(&text))
}
