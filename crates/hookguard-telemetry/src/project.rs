//! Prompt logging enablement
//!
//! Logging is opt-in per project: a project directory under
//! `docs/architecture/active/` enables it by containing a
//! `.prompt-log-enabled` marker file. The prompt log lives next to the marker.

use crate::ndjson::log_path;
use hookguard_core::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker file that enables prompt logging for a project
pub const LOG_ENABLED_MARKER: &str = ".prompt-log-enabled";

/// Directory, relative to the working directory, holding active projects
pub const ACTIVE_PROJECTS_DIR: &str = "docs/architecture/active";

/// First active project under `cwd` with logging enabled.
///
/// Projects are checked in name order. Unreadable directories count as not
/// enabled.
pub fn find_active_project_dir(cwd: &Path) -> Option<PathBuf> {
    let active = cwd.join(ACTIVE_PROJECTS_DIR);
    let entries = match fs::read_dir(&active) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %active.display(), error = %e, "No active project directory");
            return None;
        }
    };

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    projects.sort();

    projects
        .into_iter()
        .find(|project| project.join(LOG_ENABLED_MARKER).is_file())
}

/// Size of an existing prompt log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFileStats {
    /// Non-empty lines in the log
    pub entries: usize,
    pub size_bytes: u64,
}

/// Whether prompt logging is enabled for a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStatus {
    Disabled,
    Enabled {
        project: String,
        dir: PathBuf,
        /// `None` until the first entry is written
        log: Option<LogFileStats>,
    },
}

impl LogStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(
                f,
                "Logging: DISABLED (no active project with {LOG_ENABLED_MARKER})"
            ),
            Self::Enabled { project, log, .. } => {
                writeln!(f, "Logging: ENABLED")?;
                write!(f, "Project: {project}")?;
                match log {
                    Some(stats) => write!(
                        f,
                        "\nLog entries: {}\nLog size: {} bytes",
                        stats.entries, stats.size_bytes
                    ),
                    None => write!(f, "\nLog file: Not created yet"),
                }
            }
        }
    }
}

/// Logging status for `cwd`
pub fn log_status(cwd: &Path) -> Result<LogStatus> {
    let Some(dir) = find_active_project_dir(cwd) else {
        return Ok(LogStatus::Disabled);
    };

    let project = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let path = log_path(&dir);
    let log = if path.is_file() {
        let size_bytes = fs::metadata(&path)?.len();
        let entries = fs::read_to_string(&path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();
        Some(LogFileStats {
            entries,
            size_bytes,
        })
    } else {
        None
    };

    Ok(LogStatus::Enabled { project, dir, log })
}
