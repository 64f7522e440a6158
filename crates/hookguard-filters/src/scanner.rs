//! Text scanner
//!
//! Runs every entry of a catalog over the full text, then orders the matches
//! by start offset. Ties keep catalog declaration order. Overlapping matches
//! are merged left to right: a match that starts inside an already kept span
//! extends it, and the merged span keeps the type of the earlier match.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};

/// Marker shown in place of short matches
pub const MASKED_MARKER: &str = "[SECRET]";

/// A located, typed hit of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Name of the catalog entry that matched
    #[serde(rename = "type")]
    pub match_type: String,

    /// Matched substring
    pub text: String,

    /// Byte offset of the first matched byte
    pub start: usize,

    /// Byte offset one past the last matched byte
    pub end: usize,
}

impl Match {
    pub fn new(match_type: impl Into<String>, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            match_type: match_type.into(),
            text: text.into(),
            start,
            end,
        }
    }

    /// Display form showing only the first and last four characters.
    ///
    /// Never used for stored output, which always carries the placeholder.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.len() <= 8 {
            return MASKED_MARKER.to_string();
        }

        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// All raw matches of `catalog` in `text`, sorted by start offset.
///
/// The sort is stable, so matches starting at the same offset stay in
/// catalog declaration order.
pub fn scan_all(catalog: &Catalog, text: &str) -> Vec<Match> {
    let mut matches = Vec::new();

    for entry in catalog.entries() {
        for found in entry.matcher.find_iter(text) {
            if found.start() == found.end() {
                continue;
            }
            matches.push(Match::new(
                entry.name.clone(),
                found.as_str(),
                found.start(),
                found.end(),
            ));
        }
    }

    matches.sort_by_key(|m| m.start);
    matches
}

/// Merge every match that starts before the end of the previously kept one.
///
/// `matches` must be sorted by start and hold offsets into `text`. A merged
/// span covers the union of both matches, so no matched byte escapes
/// redaction.
pub fn resolve_overlaps(text: &str, matches: Vec<Match>) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::with_capacity(matches.len());

    for m in matches {
        match kept.last_mut() {
            Some(last) if m.start < last.end => {
                if m.end > last.end {
                    last.end = m.end;
                    if let Some(merged) = text.get(last.start..last.end) {
                        last.text = merged.to_string();
                    }
                }
            }
            _ => kept.push(m),
        }
    }

    kept
}

/// Ordered, non-overlapping matches of `catalog` in `text`
pub fn scan(catalog: &Catalog, text: &str) -> Vec<Match> {
    resolve_overlaps(text, scan_all(catalog, text))
}
