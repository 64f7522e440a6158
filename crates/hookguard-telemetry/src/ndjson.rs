//! Newline-delimited JSON persistence for log entries

use crate::log_entry::LogEntry;
use hookguard_core::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the prompt log inside a project directory
pub const PROMPT_LOG_FILENAME: &str = "PROMPT_LOG.json";

/// Write `entry` as one line
pub fn write_entry<W: Write>(writer: &mut W, entry: &LogEntry) -> Result<()> {
    let line = entry.to_json_line()?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read every parseable entry; malformed lines are skipped
pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match LogEntry::from_json_line(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed log entry"),
        }
    }

    Ok(entries)
}

/// Path of the prompt log in `dir`
pub fn log_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(PROMPT_LOG_FILENAME)
}

/// Append `entry` to the prompt log in `dir`, creating it if needed
pub fn append_to_log(dir: impl AsRef<Path>, entry: &LogEntry) -> Result<PathBuf> {
    let path = log_path(dir);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    write_entry(&mut file, entry)?;

    debug!(path = %path.display(), entry_type = %entry.entry_type, "Appended log entry");
    metrics::counter!("hookguard_log_entries_total", "type" => entry.entry_type.as_str())
        .increment(1);

    Ok(path)
}

/// Entries in the prompt log in `dir`; a missing log reads as empty
pub fn read_log(dir: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
    match File::open(log_path(dir)) {
        Ok(file) => read_entries(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}
