//! Rule and condition definitions

use crate::event::EventScope;
use hookguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;
use tracing::warn;

/// Scope keyword matching every event
pub const ALL_SCOPES: &str = "all";

/// Comparison applied between a field value and a condition pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    RegexMatch,
    Contains,
    Equals,
    NotContains,
    StartsWith,
    EndsWith,
    /// Unrecognized operator; never matches
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::RegexMatch => "regex_match",
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "regex_match" => Self::RegexMatch,
            "contains" => Self::Contains,
            "equals" => Self::Equals,
            "not_contains" => Self::NotContains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            _ => Self::Unknown(name),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// What happens when a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleAction {
    /// Deny the operation
    Block,
    /// Surface the message and let the operation proceed
    #[default]
    Warn,
}

impl From<String> for RuleAction {
    /// Anything other than `block` warns
    fn from(name: String) -> Self {
        if name == "block" {
            Self::Block
        } else {
            Self::Warn
        }
    }
}

impl From<RuleAction> for String {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Block => "block".to_string(),
            RuleAction::Warn => "warn".to_string(),
        }
    }
}

/// One field test within a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Field extracted from the event
    pub field: String,

    /// Comparison to apply
    pub operator: Operator,

    /// Right-hand side of the comparison
    pub pattern: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            pattern: pattern.into(),
        }
    }
}

/// A user-authored rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier, shown in decision messages
    pub name: String,

    /// Whether this rule is evaluated at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Scope keyword: bash, file, prompt, stop or all
    #[serde(default = "default_scope")]
    pub event: String,

    /// Tool filter: `*`, a tool name, or `A|B`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_matcher: Option<String>,

    /// Conditions, all of which must hold; a rule without any never matches
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub action: RuleAction,

    #[serde(default)]
    pub message: String,
}

impl Rule {
    /// Enabled warn rule in every scope, without conditions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            event: default_scope(),
            tool_matcher: None,
            conditions: Vec::new(),
            action: RuleAction::Warn,
            message: String::new(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.event = scope.into();
        self
    }

    pub fn with_tool_matcher(mut self, matcher: impl Into<String>) -> Self {
        self.tool_matcher = Some(matcher.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this rule applies in `scope`
    pub fn applies_to(&self, scope: EventScope) -> bool {
        self.event == ALL_SCOPES || self.event == scope.as_str()
    }
}

fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    ALL_SCOPES.to_string()
}

/// An ordered collection of rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Load rules from YAML.
    ///
    /// Accepts a sequence of rules or a mapping with a `rules` sequence.
    /// Entries that fail to parse are skipped with a warning; only a document
    /// that is not a rule list at all is an error.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(yaml)?;

        let entries = match document {
            Value::Null => return Ok(Self::default()),
            Value::Sequence(entries) => entries,
            Value::Mapping(mut map) => match map.remove("rules") {
                Some(Value::Sequence(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => return Err(Error::policy("`rules` must be a list")),
            },
            _ => return Err(Error::policy("rule file must be a list of rules")),
        };

        let mut rules = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_yaml::from_value::<Rule>(entry) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!(index, error = %e, "Skipping unparseable rule"),
            }
        }

        Ok(Self { rules })
    }

    /// Load rules from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Enabled rules applying in `scope`, or every enabled rule for `None`
    pub fn for_scope(&self, scope: Option<EventScope>) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled)
            .filter(|rule| scope.map_or(true, |scope| rule.applies_to(scope)))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
