//! Rule evaluation engine

use crate::condition::ConditionEvaluator;
use crate::decision::PolicyDecision;
use crate::event::{EventScope, HookEvent};
use crate::rule::{Rule, RuleAction, RuleSet};
use hookguard_core::PatternCache;
use std::sync::Arc;
use tracing::{debug, info};

/// Matcher value accepting every tool
pub const ANY_TOOL: &str = "*";

/// Evaluates rules against hook events
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    conditions: ConditionEvaluator,
}

impl RuleEngine {
    /// Create an engine with its own pattern cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine compiling through a shared pattern cache
    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self {
            conditions: ConditionEvaluator::new(cache),
        }
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        self.conditions.cache()
    }

    /// Evaluate `rules` in order against `event`.
    ///
    /// Any matching block rule produces a block naming every matching block
    /// rule; otherwise matching warn rules produce a warning; otherwise the
    /// decision is allow.
    pub fn evaluate(&self, rules: &[Rule], event: &HookEvent) -> PolicyDecision {
        let mut blocking = Vec::new();
        let mut warning = Vec::new();

        for rule in rules {
            if self.rule_matches(rule, event) {
                debug!(rule = %rule.name, action = ?rule.action, "Rule matched");
                match rule.action {
                    RuleAction::Block => blocking.push(rule),
                    RuleAction::Warn => warning.push(rule),
                }
            }
        }

        let decision = if !blocking.is_empty() {
            PolicyDecision::block(&blocking, event.hook_event_name.clone())
        } else if !warning.is_empty() {
            PolicyDecision::warn(&warning)
        } else {
            PolicyDecision::Allow
        };

        if !decision.is_allow() {
            info!(
                event = %event.hook_event_name,
                tool = %event.tool_name,
                decision = decision.label(),
                rules = ?decision.rule_names(),
                "Policy decision"
            );
        }
        metrics::counter!("hookguard_decisions_total", "decision" => decision.label()).increment(1);

        decision
    }

    /// Evaluate the enabled rules of `rule_set` that apply to the event's scope
    pub fn evaluate_set(&self, rule_set: &RuleSet, event: &HookEvent) -> PolicyDecision {
        let rules = rule_set.for_scope(EventScope::for_event(event));
        self.evaluate(&rules, event)
    }

    /// Whether `rule` matches `event`.
    ///
    /// A non-empty tool matcher must accept the event's tool, and the rule
    /// must have at least one condition with every condition holding.
    pub fn rule_matches(&self, rule: &Rule, event: &HookEvent) -> bool {
        if let Some(matcher) = rule.tool_matcher.as_deref().filter(|m| !m.is_empty()) {
            if !matches_tool(matcher, &event.tool_name) {
                return false;
            }
        }

        if rule.conditions.is_empty() {
            return false;
        }

        rule.conditions
            .iter()
            .all(|condition| self.conditions.matches(condition, event))
    }
}

/// `*` accepts any tool; otherwise exact membership in a `|`-separated list
pub fn matches_tool(matcher: &str, tool_name: &str) -> bool {
    matcher == ANY_TOOL || matcher.split('|').any(|name| name == tool_name)
}
