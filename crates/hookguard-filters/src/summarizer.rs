//! Heuristic response summaries
//!
//! Summaries are built from the first paragraph, list items and a few
//! structural notes. No model is involved, so output is deterministic.

use hookguard_core::{Error, Result};
use regex::Regex;

/// Default summary length in characters
pub const MAX_SUMMARY_LENGTH: usize = 500;

const MAX_LIST_ITEMS: usize = 5;
const MAX_ACTIONS_PER_PATTERN: usize = 3;
const MAX_ACTIONS: usize = 10;
const TOOL_CALL_MARKERS: &[&str] = &["function_calls", "antml:invoke", "tool_use"];

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e))
}

/// Summarizer for assistant responses
pub struct ResponseSummarizer {
    bullet: Regex,
    numbered: Regex,
    actions: Vec<Regex>,
    max_length: usize,
}

impl ResponseSummarizer {
    /// Create a summarizer producing at most `MAX_SUMMARY_LENGTH` characters
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullet: compile(r"(?m)^\s*[-*•]\s+(.+)$")?,
            numbered: compile(r"(?m)^\s*\d+[.)]\s+(.+)$")?,
            actions: vec![
                compile(r"(?i)I(?:'ll| will) ([^.!?\n]+)")?,
                compile(r"(?i)Let me ([^.!?\n]+)")?,
                compile(r"(?i)(?:Creating|Updating|Implementing|Adding|Removing|Fixing) ([^.!?\n]+)")?,
            ],
            max_length: MAX_SUMMARY_LENGTH,
        })
    }

    /// Override the summary length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Summarize `text`; text already within the limit is returned as is
    pub fn summarize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        if text.chars().count() <= self.max_length {
            return text.to_string();
        }

        let mut parts = Vec::new();

        if let Some(first) = text.split("\n\n").next() {
            let first = first.trim();
            if !first.is_empty() {
                parts.push(first.to_string());
            }
        }

        let bullets = captures(&self.bullet, text, MAX_LIST_ITEMS);
        let numbers = captures(&self.numbered, text, MAX_LIST_ITEMS);
        let items: Vec<String> = bullets
            .into_iter()
            .chain(numbers)
            .take(MAX_LIST_ITEMS)
            .collect();
        if !items.is_empty() {
            parts.push(format!("Key points: {}", items.join("; ")));
        }

        let fences = text.matches("```").count();
        if fences >= 2 {
            parts.push(format!("[Contains {} code block(s)]", fences / 2));
        }

        let lower = text.to_lowercase();
        if TOOL_CALL_MARKERS.iter().any(|m| lower.contains(m)) {
            parts.push("[Contains tool calls]".to_string());
        }

        truncate_chars(&parts.join(" | "), self.max_length)
    }

    /// Short action phrases such as "I'll ..." or "Let me ..."
    pub fn key_actions(&self, text: &str) -> Vec<String> {
        self.actions
            .iter()
            .flat_map(|re| captures(re, text, MAX_ACTIONS_PER_PATTERN))
            .take(MAX_ACTIONS)
            .collect()
    }
}

fn captures(re: &Regex, text: &str, limit: usize) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .take(limit)
        .collect()
}

fn truncate_chars(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let keep = max_length.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
