//! Structured hook events
//!
//! An event is the JSON object a host hands to a hook: the event name, the
//! tool being invoked with its input, and event-specific fields such as the
//! stop reason or the submitted prompt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle point an event was raised at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HookEventName {
    PreToolUse,
    PostToolUse,
    Stop,
    SubagentStop,
    UserPromptSubmit,
    SessionStart,
    SessionEnd,
    Notification,
    PreCompact,
    Other(String),
}

impl HookEventName {
    /// Canonical wire name
    pub fn as_str(&self) -> &str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::Stop => "Stop",
            Self::SubagentStop => "SubagentStop",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::SessionStart => "SessionStart",
            Self::SessionEnd => "SessionEnd",
            Self::Notification => "Notification",
            Self::PreCompact => "PreCompact",
            Self::Other(name) => name,
        }
    }

    /// Events whose block shape carries a stop decision and reason
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Events raised around a tool invocation
    pub fn is_tool_event(&self) -> bool {
        matches!(self, Self::PreToolUse | Self::PostToolUse)
    }
}

impl Default for HookEventName {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for HookEventName {
    fn from(name: String) -> Self {
        match name.as_str() {
            "PreToolUse" => Self::PreToolUse,
            "PostToolUse" => Self::PostToolUse,
            "Stop" => Self::Stop,
            "SubagentStop" => Self::SubagentStop,
            "UserPromptSubmit" => Self::UserPromptSubmit,
            "SessionStart" => Self::SessionStart,
            "SessionEnd" => Self::SessionEnd,
            "Notification" => Self::Notification,
            "PreCompact" => Self::PreCompact,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for HookEventName {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<HookEventName> for String {
    fn from(name: HookEventName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for HookEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool shapes with known input fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Bash,
    Write,
    Edit,
    MultiEdit,
    Other(String),
    None,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "" => Self::None,
            "Bash" => Self::Bash,
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "MultiEdit" => Self::MultiEdit,
            other => Self::Other(other.to_string()),
        }
    }

    /// Tools that change file contents
    pub fn is_file_tool(&self) -> bool {
        matches!(self, Self::Write | Self::Edit | Self::MultiEdit)
    }
}

/// Rule scope an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Bash,
    File,
    Prompt,
    Stop,
}

impl EventScope {
    /// Scope keyword as written in rule definitions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::File => "file",
            Self::Prompt => "prompt",
            Self::Stop => "stop",
        }
    }

    /// Scope of `event`, or `None` when every scope applies
    pub fn for_event(event: &HookEvent) -> Option<Self> {
        match event.hook_event_name {
            HookEventName::UserPromptSubmit => Some(Self::Prompt),
            HookEventName::Stop => Some(Self::Stop),
            _ => match event.tool_kind() {
                ToolKind::Bash => Some(Self::Bash),
                kind if kind.is_file_tool() => Some(Self::File),
                _ => None,
            },
        }
    }
}

/// A structured hook event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub hook_event_name: HookEventName,

    #[serde(default)]
    pub tool_name: String,

    #[serde(default)]
    pub tool_input: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// Stop reason, for stop events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Submitted prompt, for prompt events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,

    /// Any other event-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookEvent {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Tool invocation event
    pub fn tool(event: HookEventName, tool_name: impl Into<String>, tool_input: Value) -> Self {
        let tool_input = match tool_input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            hook_event_name: event,
            tool_name: tool_name.into(),
            tool_input,
            ..Default::default()
        }
    }

    /// Shape of the invoked tool
    pub fn tool_kind(&self) -> ToolKind {
        ToolKind::from_name(&self.tool_name)
    }

    /// String value of a `tool_input` key, if present and a string
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.tool_input.get(key).and_then(Value::as_str)
    }
}
