//! Policy decisions and their hook response shapes

use crate::event::HookEventName;
use crate::rule::Rule;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Verdict of the rule engine for one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PolicyDecision {
    /// No rule matched
    #[default]
    Allow,

    /// Only warning rules matched; the operation proceeds
    Warn { message: String, rules: Vec<String> },

    /// At least one blocking rule matched
    Block {
        message: String,
        rules: Vec<String>,
        event: HookEventName,
    },
}

impl PolicyDecision {
    /// Warning decision over `rules`, in the given order
    pub fn warn(rules: &[&Rule]) -> Self {
        Self::Warn {
            message: format_message(rules),
            rules: rules.iter().map(|r| r.name.clone()).collect(),
        }
    }

    /// Blocking decision over `rules`, shaped for `event`
    pub fn block(rules: &[&Rule], event: HookEventName) -> Self {
        Self::Block {
            message: format_message(rules),
            rules: rules.iter().map(|r| r.name.clone()).collect(),
            event,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Combined user-facing message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Warn { message, .. } | Self::Block { message, .. } => Some(message),
        }
    }

    /// Names of the rules that produced this decision
    pub fn rule_names(&self) -> &[String] {
        match self {
            Self::Allow => &[],
            Self::Warn { rules, .. } | Self::Block { rules, .. } => rules,
        }
    }

    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn { .. } => "warn",
            Self::Block { .. } => "block",
        }
    }

    /// Hook response JSON
    pub fn to_json(&self) -> Value {
        match self {
            Self::Allow => json!({}),
            Self::Warn { message, .. } => json!({ "systemMessage": message }),
            Self::Block { message, event, .. } => {
                if event.is_terminal() {
                    json!({
                        "decision": "block",
                        "reason": message,
                        "systemMessage": message,
                    })
                } else if event.is_tool_event() {
                    json!({
                        "hookSpecificOutput": {
                            "hookEventName": event.as_str(),
                            "permissionDecision": "deny",
                        },
                        "systemMessage": message,
                    })
                } else {
                    json!({ "systemMessage": message })
                }
            }
        }
    }
}

impl Serialize for PolicyDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// `**[name]**\nmessage` per rule, separated by blank lines
pub fn format_message(rules: &[&Rule]) -> String {
    rules
        .iter()
        .map(|rule| format!("**[{}]**\n{}", rule.name, rule.message))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, message: &str) -> Rule {
        Rule::new(name).with_message(message)
    }

    #[test]
    fn test_format_message() {
        let a = rule("a", "first");
        let b = rule("b", "second");
        assert_eq!(format_message(&[&a, &b]), "**[a]**\nfirst\n\n**[b]**\nsecond");
    }

    #[test]
    fn test_allow_shape() {
        assert_eq!(PolicyDecision::Allow.to_json(), json!({}));
        assert_eq!(serde_json::to_string(&PolicyDecision::Allow).unwrap(), "{}");
    }

    #[test]
    fn test_warn_shape() {
        let r = rule("env", "careful");
        let decision = PolicyDecision::warn(&[&r]);
        assert_eq!(decision.to_json(), json!({"systemMessage": "**[env]**\ncareful"}));
    }

    #[test]
    fn test_stop_block_shape() {
        let r = rule("tests", "run the tests first");
        let decision = PolicyDecision::block(&[&r], HookEventName::Stop);
        let msg = "**[tests]**\nrun the tests first";

        assert_eq!(
            decision.to_json(),
            json!({"decision": "block", "reason": msg, "systemMessage": msg})
        );
    }

    #[test]
    fn test_tool_block_shape() {
        let r = rule("rm", "no");
        for event in [HookEventName::PreToolUse, HookEventName::PostToolUse] {
            let decision = PolicyDecision::block(&[&r], event.clone());
            assert_eq!(
                decision.to_json(),
                json!({
                    "hookSpecificOutput": {"hookEventName": event.as_str(), "permissionDecision": "deny"},
                    "systemMessage": "**[rm]**\nno"
                })
            );
        }
    }

    #[test]
    fn test_other_block_shape() {
        let r = rule("prompt", "nope");
        let decision = PolicyDecision::block(&[&r], HookEventName::UserPromptSubmit);
        assert_eq!(decision.to_json(), json!({"systemMessage": "**[prompt]**\nnope"}));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let r = rule("rm", "no");
        let decision = PolicyDecision::block(&[&r], HookEventName::PreToolUse);
        let encoded: Value = serde_json::from_str(&serde_json::to_string(&decision).unwrap()).unwrap();
        assert_eq!(encoded, decision.to_json());
    }
}
