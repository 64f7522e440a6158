//! hookguard Policy Engine
//!
//! Declarative rules evaluated against structured hook events.
//!
//! Rules are defined in YAML and specify:
//! - A scope (bash, file, prompt, stop or all) and an optional tool matcher
//! - Conditions over event fields (regex, substring, equality, prefix, suffix)
//! - An action (block or warn) and a message
//!
//! Evaluation yields a `PolicyDecision` that renders to the hook response JSON.

pub mod condition;
pub mod decision;
pub mod engine;
pub mod event;
pub mod extract;
pub mod rule;

pub use condition::ConditionEvaluator;
pub use decision::{format_message, PolicyDecision};
pub use engine::{matches_tool, RuleEngine, ANY_TOOL};
pub use event::{EventScope, HookEvent, HookEventName, ToolKind};
pub use extract::{extract, read_transcript_tail, Field, TRANSCRIPT_TAIL_BYTES};
pub use rule::{Condition, Operator, Rule, RuleAction, RuleSet, ALL_SCOPES};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::decision::PolicyDecision;
    pub use crate::engine::RuleEngine;
    pub use crate::event::{HookEvent, HookEventName};
    pub use crate::rule::{Condition, Operator, Rule, RuleAction, RuleSet};
}
