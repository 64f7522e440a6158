//! hookguard Telemetry
//!
//! The prompt log: filtered entries written one JSON object per line.
//!
//! Provides:
//! - `LogEntry`, the stable wire shape read by external tooling
//! - Content truncation and session id helpers
//! - NDJSON encode/decode and append-only log files
//! - Per-project enablement through a marker file
//! - Interaction analysis over a whole log

pub mod analysis;
pub mod log_entry;
pub mod ndjson;
pub mod project;

pub use analysis::{analyze_log, LogAnalysis, SessionStats};

pub use log_entry::{
    detect_command, generate_session_id, truncate_content, EntryMetadata, EntryType, LogEntry,
    MAX_LOG_ENTRY_SIZE, MAX_PROMPT_LENGTH,
};
pub use ndjson::{append_to_log, log_path, read_entries, read_log, write_entry, PROMPT_LOG_FILENAME};
pub use project::{
    find_active_project_dir, log_status, LogFileStats, LogStatus, ACTIVE_PROJECTS_DIR,
    LOG_ENABLED_MARKER,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::log_entry::{EntryType, LogEntry};
    pub use crate::analysis::{analyze_log, LogAnalysis};
    pub use crate::ndjson::{append_to_log, read_log, write_entry};
    pub use crate::project::{find_active_project_dir, LogStatus};
}
