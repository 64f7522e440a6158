//! hookguard Filters
//!
//! Best-effort redaction of secrets and profanity in free-form text before it
//! is persisted.
//!
//! The pipeline is built from two catalogs:
//! - Secrets: one named pattern per credential signature, so every hit is
//!   labeled `[SECRET:<type>]`
//! - Profanity: a single case-insensitive, word-bounded alternation, every
//!   hit replaced by `[FILTERED]`
//!
//! Secrets always run first. Nothing in this crate returns an error from a
//! filtering call; failures degrade the affected stage instead.

pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod profanity;
pub mod redactor;
pub mod scanner;
pub mod secrets;
pub mod summarizer;

pub use catalog::{Catalog, PatternEntry, PatternKind, PatternSpec};
pub use config::FilterConfig;
pub use pipeline::{
    FilterInfo, FilterPipeline, FilterResult, FilterStage, StageDiagnostic, STAGE_ORDER,
};
pub use profanity::WordListSource;
pub use redactor::{redact, redact_with_kind, Redaction};
pub use scanner::{scan, Match};
pub use summarizer::ResponseSummarizer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::{Catalog, PatternKind, PatternSpec};
    pub use crate::pipeline::{FilterPipeline, FilterResult};
    pub use crate::scanner::Match;
}
