//! hookguard Core
//!
//! Types shared by the redaction pipeline and the rule engine.
//!
//! This crate provides:
//! - The error type and result alias
//! - `Outcome`, the explicit ok/degraded result used on fail-open paths
//! - `PatternCache`, the bounded, thread-safe regex compilation cache

pub mod cache;
pub mod error;
pub mod outcome;

pub use cache::{PatternCache, DEFAULT_CACHE_CAPACITY};
pub use error::{Error, Result};
pub use outcome::Outcome;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::PatternCache;
    pub use crate::error::{Error, Result};
    pub use crate::outcome::Outcome;
}
