//! Prompt log analysis
//!
//! Aggregates a prompt log into interaction statistics and renders them as a
//! markdown section for retrospectives.

use crate::log_entry::{EntryType, LogEntry};
use crate::ndjson::read_log;
use chrono::{DateTime, Utc};
use hookguard_core::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Share of questions above which an interaction counts as question-heavy
pub const QUESTION_HEAVY_RATIO: f64 = 0.5;

/// Minimum user inputs before a session can count as clarification-heavy
pub const CLARIFICATION_MIN_INPUTS: usize = 3;

/// Average prompt length, in characters, below which prompts are short
pub const SHORT_PROMPT_CHARS: f64 = 50.0;

/// Average prompt length, in characters, above which prompts are detailed
pub const DETAILED_PROMPT_CHARS: f64 = 500.0;

/// Per-session counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub entries: usize,
    pub user_inputs: usize,
    pub questions: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl SessionStats {
    fn new(entry: &LogEntry) -> Self {
        Self {
            session_id: entry.session_id.clone(),
            entries: 0,
            user_inputs: 0,
            questions: 0,
            started_at: entry.timestamp,
            ended_at: entry.timestamp,
        }
    }

    /// More than half of at least three user inputs were questions
    pub fn is_clarification_heavy(&self) -> bool {
        self.user_inputs >= CLARIFICATION_MIN_INPUTS
            && self.questions as f64 > self.user_inputs as f64 * QUESTION_HEAVY_RATIO
    }
}

/// Interaction statistics over a whole prompt log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogAnalysis {
    pub total_entries: usize,
    pub user_inputs: usize,
    pub expanded_prompts: usize,
    pub response_summaries: usize,

    pub session_count: usize,
    pub avg_entries_per_session: f64,

    /// User inputs containing a question mark
    pub total_questions: usize,
    pub clarification_heavy_sessions: usize,

    /// Slash command usage counts
    pub commands_used: BTreeMap<String, usize>,

    /// Entries with at least one redaction
    pub total_filtered_content: usize,
    pub profanity_filtered: usize,
    pub secrets_filtered: usize,

    /// User input lengths, in characters
    pub prompt_length_min: usize,
    pub prompt_length_max: usize,
    pub prompt_length_avg: f64,

    pub sessions: Vec<SessionStats>,
}

impl LogAnalysis {
    /// Aggregate `entries`
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut analysis = Self {
            total_entries: entries.len(),
            ..Default::default()
        };
        let mut sessions: BTreeMap<&str, SessionStats> = BTreeMap::new();
        let mut lengths = Vec::new();

        for entry in entries {
            let session = sessions
                .entry(entry.session_id.as_str())
                .or_insert_with(|| SessionStats::new(entry));
            session.entries += 1;
            session.started_at = session.started_at.min(entry.timestamp);
            session.ended_at = session.ended_at.max(entry.timestamp);

            match entry.entry_type {
                EntryType::UserInput => {
                    analysis.user_inputs += 1;
                    session.user_inputs += 1;
                    lengths.push(entry.content.chars().count());
                    if entry.content.contains('?') {
                        analysis.total_questions += 1;
                        session.questions += 1;
                    }
                }
                EntryType::ExpandedPrompt => analysis.expanded_prompts += 1,
                EntryType::ResponseSummary => analysis.response_summaries += 1,
            }

            if let Some(command) = &entry.command {
                *analysis.commands_used.entry(command.clone()).or_default() += 1;
            }

            if let Some(info) = &entry.filter_applied {
                analysis.profanity_filtered += info.profanity_count;
                analysis.secrets_filtered += info.secret_count;
                if info.profanity_count > 0 || info.secret_count > 0 {
                    analysis.total_filtered_content += 1;
                }
            }
        }

        if !lengths.is_empty() {
            analysis.prompt_length_min = lengths.iter().copied().min().unwrap_or_default();
            analysis.prompt_length_max = lengths.iter().copied().max().unwrap_or_default();
            analysis.prompt_length_avg =
                lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        }

        analysis.session_count = sessions.len();
        if analysis.session_count > 0 {
            analysis.avg_entries_per_session =
                analysis.total_entries as f64 / analysis.session_count as f64;
        }
        analysis.sessions = sessions.into_values().collect();
        analysis.clarification_heavy_sessions = analysis
            .sessions
            .iter()
            .filter(|s| s.is_clarification_heavy())
            .count();

        analysis
    }

    /// Observations worth surfacing, one line each
    pub fn insights(&self) -> Vec<String> {
        let mut insights = Vec::new();

        if self.clarification_heavy_sessions > 0 {
            insights.push(format!(
                "**High clarification sessions**: {} session(s) were mostly questions",
                self.clarification_heavy_sessions
            ));
        }

        if self.user_inputs > 0 {
            let ratio = self.total_questions as f64 / self.user_inputs as f64;
            if ratio > QUESTION_HEAVY_RATIO {
                insights.push(format!(
                    "**Question-heavy interaction**: {:.0}% of prompts were questions",
                    ratio * 100.0
                ));
            }
        }

        if self.prompt_length_avg > 0.0 && self.prompt_length_avg < SHORT_PROMPT_CHARS {
            insights.push(format!(
                "**Short prompts**: average prompt is {:.0} characters",
                self.prompt_length_avg
            ));
        } else if self.prompt_length_avg > DETAILED_PROMPT_CHARS {
            insights.push(format!(
                "**Detailed prompts**: average prompt is {:.0} characters",
                self.prompt_length_avg
            ));
        }

        insights
    }

    /// Render the analysis as a markdown section
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "## Interaction Analysis\n");
        let _ = writeln!(out, "| Metric | Value |");
        let _ = writeln!(out, "|--------|-------|");
        let _ = writeln!(out, "| Total Prompts | {} |", self.total_entries);
        let _ = writeln!(out, "| User Inputs | {} |", self.user_inputs);
        let _ = writeln!(out, "| Expanded Prompts | {} |", self.expanded_prompts);
        let _ = writeln!(out, "| Response Summaries | {} |", self.response_summaries);
        let _ = writeln!(out, "| Sessions | {} |", self.session_count);
        let _ = writeln!(
            out,
            "| Avg Entries per Session | {:.1} |",
            self.avg_entries_per_session
        );
        let _ = writeln!(out, "| Questions Asked | {} |", self.total_questions);
        let _ = writeln!(
            out,
            "| Avg Prompt Length | {:.0} chars |",
            self.prompt_length_avg
        );

        if !self.commands_used.is_empty() {
            let mut commands: Vec<_> = self.commands_used.iter().collect();
            commands.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            let _ = writeln!(out, "\n### Commands Used\n");
            for (command, count) in commands {
                let _ = writeln!(out, "- `{command}`: {count} times");
            }
        }

        if self.total_filtered_content > 0 {
            let _ = writeln!(out, "\n### Content Filtering\n");
            let _ = writeln!(out, "- Entries filtered: {}", self.total_filtered_content);
            let _ = writeln!(out, "- Profanity filtered: {}", self.profanity_filtered);
            let _ = writeln!(out, "- Secrets filtered: {}", self.secrets_filtered);
        }

        let insights = self.insights();
        if !insights.is_empty() {
            let _ = writeln!(out, "\n### Insights\n");
            for insight in insights {
                let _ = writeln!(out, "- {insight}");
            }
        }

        out
    }
}

/// Analyze the prompt log in `dir`; `None` when it has no entries
pub fn analyze_log(dir: impl AsRef<Path>) -> Result<Option<LogAnalysis>> {
    let entries = read_log(dir)?;
    if entries.is_empty() {
        return Ok(None);
    }
    Ok(Some(LogAnalysis::from_entries(&entries)))
}
