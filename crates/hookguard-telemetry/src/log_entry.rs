//! Prompt log entries
//!
//! One entry is written per captured prompt, expanded command or response
//! summary. The serialized shape is read by external tooling and must stay
//! stable:
//!
//! ```json
//! {"timestamp": "...", "session_id": "...", "type": "user_input",
//!  "content": "...", "command": "/arch:p",
//!  "filter_applied": {"profanity_count": 0, "secret_count": 1, "secret_types": ["github_pat"]},
//!  "metadata": {"content_length": 42, "cwd": "/repo"}}
//! ```

use chrono::{DateTime, Utc};
use hookguard_filters::FilterInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cap on logged content, in characters
pub const MAX_LOG_ENTRY_SIZE: usize = 50_000;

/// Default cap on an incoming prompt, in characters
pub const MAX_PROMPT_LENGTH: usize = 100_000;

/// Kind of content an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// A prompt as typed by the user
    UserInput,
    /// The text a slash command expanded to
    ExpandedPrompt,
    /// A condensed assistant response
    ResponseSummary,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInput => "user_input",
            Self::ExpandedPrompt => "expanded_prompt",
            Self::ResponseSummary => "response_summary",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_input" => Ok(Self::UserInput),
            "expanded_prompt" => Ok(Self::ExpandedPrompt),
            "response_summary" => Ok(Self::ResponseSummary),
            other => Err(format!("unknown entry type: {other}")),
        }
    }
}

/// Context recorded alongside the content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Length of `content` in characters
    pub content_length: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

/// A single prompt log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,

    pub session_id: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Filtered, possibly truncated content
    pub content: String,

    /// Slash command that produced the content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_applied: Option<FilterInfo>,

    #[serde(default)]
    pub metadata: EntryMetadata,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn create(
        session_id: impl Into<String>,
        entry_type: EntryType,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            timestamp: Utc::now(),
            session_id: session_id.into(),
            entry_type,
            metadata: EntryMetadata {
                content_length: content.chars().count(),
                cwd: None,
            },
            content,
            command: None,
            filter_applied: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.metadata.cwd = Some(cwd.into());
        self
    }

    pub fn with_filter_info(mut self, info: FilterInfo) -> Self {
        self.filter_applied = Some(info);
        self
    }

    /// Serialize as a single JSON line without the trailing newline
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Cut `content` to at most `max_length` characters, ending in a notice of
/// how many characters were removed.
pub fn truncate_content(content: &str, max_length: usize) -> String {
    let total = content.chars().count();
    if total <= max_length {
        return content.to_string();
    }

    let mut removed = total - max_length;
    let mut notice = truncation_notice(removed);
    loop {
        let notice_len = notice.chars().count();
        if notice_len >= max_length {
            return content.chars().take(max_length).collect();
        }
        let needed = total - (max_length - notice_len);
        if needed == removed {
            break;
        }
        removed = needed;
        notice = truncation_notice(removed);
    }

    let mut truncated: String = content.chars().take(total - removed).collect();
    truncated.push_str(&notice);
    truncated
}

fn truncation_notice(removed: usize) -> String {
    format!("\n...[TRUNCATED: {removed} chars removed]...")
}

/// Session identifier for events that arrive without one
pub fn generate_session_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("hook-{}", &id[..12])
}

/// Slash command a prompt starts with, such as `/arch:p` in `/arch:p plan it`
pub fn detect_command(prompt: &str) -> Option<String> {
    let trimmed = prompt.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    trimmed.split_whitespace().next().map(str::to_string)
}
