//! Pattern catalogs
//!
//! A catalog is an immutable, ordered set of named matchers that all share
//! one purpose. Entries keep their declaration order, which the scanner uses
//! to break ties between matches starting at the same offset.

use hookguard_core::{PatternCache, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// What a catalog detects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Secret,
    Profanity,
}

impl PatternKind {
    /// Placeholder written in place of a match of type `match_type`
    pub fn placeholder(&self, match_type: &str) -> String {
        match self {
            Self::Secret => format!("[SECRET:{}]", match_type),
            Self::Profanity => "[FILTERED]".to_string(),
        }
    }
}

/// A named, compiled matcher
#[derive(Debug, Clone)]
pub struct PatternEntry {
    /// Identifier, unique within its catalog
    pub name: String,

    /// Compiled matcher, shared with the pattern cache
    pub matcher: Arc<Regex>,

    /// Purpose of the entry
    pub kind: PatternKind,
}

/// Named pattern source text, as declared by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub pattern: String,
}

impl PatternSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Immutable, ordered set of compiled matchers
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: PatternKind,
    entries: Vec<PatternEntry>,
}

impl Catalog {
    /// Compile every pattern, failing on the first invalid one.
    ///
    /// Duplicate names keep the first declaration.
    pub fn compile(
        kind: PatternKind,
        specs: &[PatternSpec],
        cache: &PatternCache,
        case_insensitive: bool,
    ) -> Result<Self> {
        let mut entries: Vec<PatternEntry> = Vec::with_capacity(specs.len());

        for spec in specs {
            let matcher = cache.get_or_compile(&spec.pattern, case_insensitive)?;
            if entries.iter().any(|e| e.name == spec.name) {
                continue;
            }
            entries.push(PatternEntry {
                name: spec.name.clone(),
                matcher,
                kind,
            });
        }

        Ok(Self { kind, entries })
    }

    /// Compile every pattern, dropping invalid ones with a warning
    pub fn compile_lenient(
        kind: PatternKind,
        specs: &[PatternSpec],
        cache: &PatternCache,
        case_insensitive: bool,
    ) -> Self {
        let mut entries: Vec<PatternEntry> = Vec::with_capacity(specs.len());

        for spec in specs {
            if entries.iter().any(|e| e.name == spec.name) {
                continue;
            }
            match cache.get_or_compile(&spec.pattern, case_insensitive) {
                Ok(matcher) => entries.push(PatternEntry {
                    name: spec.name.clone(),
                    matcher,
                    kind,
                }),
                Err(e) => warn!(name = %spec.name, error = %e, "Dropping invalid pattern"),
            }
        }

        Self { kind, entries }
    }

    /// A catalog that never matches
    pub fn empty(kind: PatternKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Purpose of this catalog
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&PatternEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<PatternSpec> {
        vec![
            PatternSpec::new("first", "abc"),
            PatternSpec::new("second", "[0-9]+"),
        ]
    }

    #[test]
    fn test_compile_keeps_declaration_order() {
        let cache = PatternCache::new(8);
        let catalog = Catalog::compile(PatternKind::Secret, &specs(), &cache, false).unwrap();

        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(catalog.kind(), PatternKind::Secret);
    }

    #[test]
    fn test_compile_rejects_invalid_pattern() {
        let cache = PatternCache::new(8);
        let mut specs = specs();
        specs.push(PatternSpec::new("broken", "(open"));

        let err = Catalog::compile(PatternKind::Secret, &specs, &cache, false).unwrap_err();
        assert!(matches!(err, hookguard_core::Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_lenient_drops_invalid_pattern() {
        let cache = PatternCache::new(8);
        let mut specs = specs();
        specs.insert(1, PatternSpec::new("broken", "(open"));

        let catalog = Catalog::compile_lenient(PatternKind::Secret, &specs, &cache, false);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("broken").is_none());
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let cache = PatternCache::new(8);
        let specs = vec![
            PatternSpec::new("dup", "one"),
            PatternSpec::new("dup", "two"),
        ];

        let catalog = Catalog::compile(PatternKind::Secret, &specs, &cache, false).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("dup").unwrap().matcher.as_str(), "one");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(PatternKind::Secret.placeholder("jwt"), "[SECRET:jwt]");
        assert_eq!(PatternKind::Profanity.placeholder("anything"), "[FILTERED]");
    }
}
