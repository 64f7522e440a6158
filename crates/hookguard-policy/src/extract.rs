//! Field extraction from hook events
//!
//! Conditions name a field; this module resolves it against the event using
//! a fixed dispatch on (field, tool kind). Unknown combinations produce no
//! value, which makes the owning condition fail.

use crate::event::{HookEvent, ToolKind};
use hookguard_core::Outcome;
use serde_json::Value;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::warn;

/// Upper bound on the transcript bytes read for a `transcript` field
pub const TRANSCRIPT_TAIL_BYTES: u64 = 50 * 1024;

/// Field names understood by the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Command,
    Content,
    NewText,
    OldText,
    FilePath,
    Reason,
    Transcript,
    UserPrompt,
    Other(String),
}

impl Field {
    pub fn parse(name: &str) -> Self {
        match name {
            "command" => Self::Command,
            "content" => Self::Content,
            "new_text" | "new_string" => Self::NewText,
            "old_text" | "old_string" => Self::OldText,
            "file_path" => Self::FilePath,
            "reason" => Self::Reason,
            "transcript" => Self::Transcript,
            "user_prompt" => Self::UserPrompt,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Resolve `name` against `event`.
///
/// Returns `None` when the field has no meaning for this event. A transcript
/// that cannot be read yields a degraded empty string.
pub fn extract(name: &str, event: &HookEvent) -> Option<Outcome<String>> {
    if let Some(value) = event.tool_input.get(name) {
        return Some(Outcome::ok(value_to_string(value)));
    }

    let field = Field::parse(name);

    match field {
        Field::Reason => {
            return Some(Outcome::ok(event.reason.clone().unwrap_or_default()));
        }
        Field::UserPrompt => {
            return Some(Outcome::ok(event.user_prompt.clone().unwrap_or_default()));
        }
        Field::Transcript => {
            if let Some(path) = &event.transcript_path {
                return Some(read_transcript_tail(path, TRANSCRIPT_TAIL_BYTES));
            }
        }
        _ => {}
    }

    from_tool_input(&field, event).map(Outcome::ok)
}

fn from_tool_input(field: &Field, event: &HookEvent) -> Option<String> {
    let input = |key: &str| event.input_str(key).unwrap_or_default().to_string();

    match (event.tool_kind(), field) {
        (ToolKind::Bash, Field::Command) => Some(input("command")),
        (ToolKind::Write | ToolKind::Edit, Field::Content) => {
            match event.input_str("content").filter(|s| !s.is_empty()) {
                Some(content) => Some(content.to_string()),
                None => Some(input("new_string")),
            }
        }
        (ToolKind::Write | ToolKind::Edit, Field::NewText) => Some(input("new_string")),
        (ToolKind::Write | ToolKind::Edit, Field::OldText) => Some(input("old_string")),
        (ToolKind::Write | ToolKind::Edit | ToolKind::MultiEdit, Field::FilePath) => {
            Some(input("file_path"))
        }
        (ToolKind::MultiEdit, Field::NewText | Field::Content) => Some(joined_edits(event)),
        _ => None,
    }
}

/// Every edit's `new_string`, joined by a single space
fn joined_edits(event: &HookEvent) -> String {
    event
        .tool_input
        .get("edits")
        .and_then(Value::as_array)
        .map(|edits| {
            edits
                .iter()
                .map(|edit| edit.get("new_string").and_then(Value::as_str).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read at most the last `max_bytes` of a transcript file.
///
/// Single attempt; any failure is logged and degrades to an empty string.
pub fn read_transcript_tail(path: &Path, max_bytes: u64) -> Outcome<String> {
    match read_tail(path, max_bytes) {
        Ok(text) => Outcome::ok(text),
        Err(e) => {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "transcript file not found",
                io::ErrorKind::PermissionDenied => "permission denied reading transcript",
                io::ErrorKind::InvalidData => "encoding error in transcript",
                _ => "error reading transcript",
            };
            warn!(path = %path.display(), error = %e, "{}", reason);
            Outcome::degraded(String::new(), format!("{reason}: {e}"))
        }
    }
}

fn read_tail(path: &Path, max_bytes: u64) -> io::Result<String> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let start = len.saturating_sub(max_bytes);
    file.seek(SeekFrom::Start(start))?;

    let mut bytes = Vec::with_capacity((len - start) as usize);
    file.read_to_end(&mut bytes)?;

    // A tail cut can land inside a multi-byte character
    let skip = if start > 0 {
        bytes.iter().take_while(|b| (**b & 0xC0) == 0x80).count()
    } else {
        0
    };
    bytes.drain(..skip);

    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
