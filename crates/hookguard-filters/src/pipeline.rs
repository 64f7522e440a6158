//! Two-stage filter pipeline
//!
//! Stages always run in `STAGE_ORDER`: secrets first, then profanity over the
//! already redacted text. Secret placeholders are written before the
//! profanity pass, so a profane substring inside a credential is never
//! counted twice and never survives the secret rewrite.
//!
//! The pipeline has no error path. A stage whose catalog could not be built
//! runs with an empty catalog and the reason is kept in `diagnostics()`.

use crate::catalog::{Catalog, PatternKind};
use crate::config::FilterConfig;
use crate::profanity::{load_words, profanity_catalog, WordListSource};
use crate::redactor::{redact_with_kind, Redaction};
use crate::scanner::scan;
use crate::secrets::secret_catalog;
use hookguard_core::PatternCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// A pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStage {
    Secrets,
    Profanity,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secrets => write!(f, "secrets"),
            Self::Profanity => write!(f, "profanity"),
        }
    }
}

/// Order in which stages run
pub const STAGE_ORDER: [FilterStage; 2] = [FilterStage::Secrets, FilterStage::Profanity];

/// Why a stage runs degraded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDiagnostic {
    pub stage: FilterStage,
    pub reason: String,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Length of the input in characters
    pub original_length: usize,

    /// Input with every match replaced by its placeholder
    pub filtered_text: String,

    /// Number of profane words replaced
    pub profanity_count: usize,

    /// Number of secrets replaced
    pub secret_count: usize,

    /// Distinct secret types in order of first occurrence
    pub secret_types: Vec<String>,
}

impl FilterResult {
    /// Whether anything was replaced
    pub fn was_filtered(&self) -> bool {
        self.profanity_count > 0 || self.secret_count > 0
    }

    /// The block recorded alongside a log entry
    pub fn to_filter_info(&self) -> FilterInfo {
        FilterInfo {
            profanity_count: self.profanity_count,
            secret_count: self.secret_count,
            secret_types: self.secret_types.clone(),
        }
    }
}

/// Filter statistics as written to the prompt log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInfo {
    pub profanity_count: usize,
    pub secret_count: usize,
    pub secret_types: Vec<String>,
}

/// Secrets-then-profanity redaction over free-form text
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    secrets: Catalog,
    profanity: Catalog,
    diagnostics: Vec<StageDiagnostic>,
}

impl FilterPipeline {
    /// Pipeline over explicit catalogs
    pub fn new(secrets: Catalog, profanity: Catalog) -> Self {
        Self {
            secrets,
            profanity,
            diagnostics: Vec::new(),
        }
    }

    /// Built-in signatures and word list, compiled through `cache`
    pub fn with_cache(cache: &PatternCache) -> Self {
        Self::from_config(&FilterConfig::default(), cache)
    }

    /// Built-in signatures and word list with a private cache
    pub fn builtin() -> Self {
        Self::with_cache(&PatternCache::default())
    }

    /// Build both stages from configuration.
    ///
    /// Never fails: an unusable word list or pattern degrades its stage.
    pub fn from_config(config: &FilterConfig, cache: &PatternCache) -> Self {
        let mut diagnostics = Vec::new();

        let secrets = if config.enable_secrets {
            secret_catalog(cache, &config.extra_secrets)
        } else {
            Catalog::empty(PatternKind::Secret)
        };

        let profanity = if config.enable_profanity {
            Self::build_profanity(&config.word_list_source(), cache, &mut diagnostics)
        } else {
            Catalog::empty(PatternKind::Profanity)
        };

        debug!(
            secrets = secrets.len(),
            profanity = profanity.len(),
            degraded = diagnostics.len(),
            "Filter pipeline ready"
        );

        Self {
            secrets,
            profanity,
            diagnostics,
        }
    }

    fn build_profanity(
        source: &WordListSource,
        cache: &PatternCache,
        diagnostics: &mut Vec<StageDiagnostic>,
    ) -> Catalog {
        let words = load_words(source);
        if let Some(reason) = words.reason() {
            diagnostics.push(StageDiagnostic {
                stage: FilterStage::Profanity,
                reason: reason.to_string(),
            });
        }

        match profanity_catalog(words.value(), cache) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Profanity catalog failed to compile, stage disabled");
                diagnostics.push(StageDiagnostic {
                    stage: FilterStage::Profanity,
                    reason: e.to_string(),
                });
                Catalog::empty(PatternKind::Profanity)
            }
        }
    }

    /// Catalog used by `stage`
    pub fn catalog(&self, stage: FilterStage) -> &Catalog {
        match stage {
            FilterStage::Secrets => &self.secrets,
            FilterStage::Profanity => &self.profanity,
        }
    }

    /// Reasons any stage runs degraded
    pub fn diagnostics(&self) -> &[StageDiagnostic] {
        &self.diagnostics
    }

    /// Scan and redact `text` with a single stage
    pub fn run_stage(&self, stage: FilterStage, text: &str) -> Redaction {
        let catalog = self.catalog(stage);
        let matches = scan(catalog, text);
        redact_with_kind(text, &matches, catalog.kind())
    }

    /// Run every stage in `STAGE_ORDER`
    pub fn run(&self, text: &str) -> FilterResult {
        let mut current = text.to_string();
        let mut secret_types = Vec::new();
        let mut secret_count = 0;
        let mut profanity_count = 0;

        for stage in STAGE_ORDER {
            let redaction = self.run_stage(stage, &current);
            match stage {
                FilterStage::Secrets => {
                    secret_count = redaction.count();
                    for secret_type in &redaction.types {
                        metrics::counter!("hookguard_secrets_redacted_total", "type" => secret_type.clone())
                            .increment(1);
                    }
                    secret_types = redaction.types;
                }
                FilterStage::Profanity => {
                    profanity_count = redaction.count();
                    metrics::counter!("hookguard_profanity_filtered_total")
                        .increment(profanity_count as u64);
                }
            }
            current = redaction.text;
        }

        let mut distinct: Vec<String> = Vec::with_capacity(secret_types.len());
        for secret_type in secret_types {
            if !distinct.contains(&secret_type) {
                distinct.push(secret_type);
            }
        }

        if secret_count > 0 || profanity_count > 0 {
            debug!(
                secret_count,
                profanity_count,
                secret_types = ?distinct,
                "Filtered text"
            );
        }

        FilterResult {
            original_length: text.chars().count(),
            filtered_text: current,
            profanity_count,
            secret_count,
            secret_types: distinct,
        }
    }

    /// Whether `text` contains anything either stage would replace
    pub fn contains_sensitive(&self, text: &str) -> bool {
        self.run(text).was_filtered()
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::builtin()
    }
}
