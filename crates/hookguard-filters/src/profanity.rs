//! Profanity word list and catalog
//!
//! The whole word list compiles into one case-insensitive alternation wrapped
//! in word-boundary anchors. Longer words come first so that a variant that
//! contains a shorter word is preferred at the same start position.

use crate::catalog::{Catalog, PatternKind, PatternSpec};
use crate::scanner::scan;
use hookguard_core::{Outcome, PatternCache, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Word list compiled into the binary
pub const BUILTIN_WORD_LIST: &str = include_str!("../data/profanity_words.txt");

/// Minimal list used when a configured word list cannot be read
pub const FALLBACK_WORDS: &[&str] = &["fuck", "shit", "damn", "ass", "bitch"];

/// Name of the single entry in a profanity catalog
pub const PROFANITY_ENTRY: &str = "profanity";

/// Where the profanity words come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListSource {
    /// The list compiled into the binary
    Builtin,

    /// A word list file, one word per line
    File(PathBuf),

    /// An explicit set of words
    Words(Vec<String>),
}

/// Parse word list text: trimmed, lower-cased, blank and `#` lines skipped
pub fn parse_word_list(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Fallback words as a set
pub fn fallback_words() -> BTreeSet<String> {
    FALLBACK_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Read a word list file.
///
/// An unreadable file yields the fallback list as a degraded outcome; the
/// substitution is logged so a missing list does not go unnoticed.
pub fn load_word_list_file(path: &Path) -> Outcome<BTreeSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Outcome::ok(parse_word_list(&content)),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                fallback = FALLBACK_WORDS.len(),
                "Profanity word list unreadable, using fallback words"
            );
            Outcome::degraded(
                fallback_words(),
                format!("word list {} unreadable: {}", path.display(), e),
            )
        }
    }
}

/// Resolve a word list source into a set of words
pub fn load_words(source: &WordListSource) -> Outcome<BTreeSet<String>> {
    match source {
        WordListSource::Builtin => Outcome::ok(parse_word_list(BUILTIN_WORD_LIST)),
        WordListSource::File(path) => load_word_list_file(path),
        WordListSource::Words(words) => Outcome::ok(
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        ),
    }
}

/// Build the alternation pattern, or `None` for an empty list
pub fn build_alternation(words: &BTreeSet<String>) -> Option<String> {
    if words.is_empty() {
        return None;
    }

    let mut escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    // Stable over the sorted set, so equal lengths stay alphabetical
    escaped.sort_by(|a, b| b.len().cmp(&a.len()));

    Some(format!(r"\b(?:{})\b", escaped.join("|")))
}

/// Compile words into a profanity catalog; an empty set never matches
pub fn profanity_catalog(words: &BTreeSet<String>, cache: &PatternCache) -> Result<Catalog> {
    match build_alternation(words) {
        Some(pattern) => {
            debug!(words = words.len(), "Compiling profanity alternation");
            Catalog::compile(
                PatternKind::Profanity,
                &[PatternSpec::new(PROFANITY_ENTRY, pattern)],
                cache,
                true,
            )
        }
        None => Ok(Catalog::empty(PatternKind::Profanity)),
    }
}

/// Profane words found in `text`, lower-cased, in order of appearance
pub fn detect_profanity(catalog: &Catalog, text: &str) -> Vec<String> {
    scan(catalog, text)
        .into_iter()
        .map(|m| m.text.to_lowercase())
        .collect()
}
