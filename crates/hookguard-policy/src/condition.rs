//! Condition evaluation

use crate::event::HookEvent;
use crate::extract::extract;
use crate::rule::{Condition, Operator};
use hookguard_core::PatternCache;
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies condition operators, compiling regex patterns through a shared cache
#[derive(Debug, Clone, Default)]
pub struct ConditionEvaluator {
    cache: Arc<PatternCache>,
}

impl ConditionEvaluator {
    pub fn new(cache: Arc<PatternCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }

    /// Whether `condition` holds for `event`.
    ///
    /// A field without a value never matches.
    pub fn matches(&self, condition: &Condition, event: &HookEvent) -> bool {
        match extract(&condition.field, event) {
            Some(value) => self.apply(&condition.operator, &condition.pattern, value.value()),
            None => {
                debug!(field = %condition.field, tool = %event.tool_name, "Field has no value for event");
                false
            }
        }
    }

    /// Apply `operator` with `pattern` to `value`
    pub fn apply(&self, operator: &Operator, pattern: &str, value: &str) -> bool {
        match operator {
            Operator::RegexMatch => match self.cache.get_or_compile(pattern, true) {
                Ok(regex) => regex.is_match(value),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "Invalid regex in condition");
                    false
                }
            },
            Operator::Contains => value.contains(pattern),
            Operator::NotContains => !value.contains(pattern),
            Operator::Equals => value == pattern,
            Operator::StartsWith => value.starts_with(pattern),
            Operator::EndsWith => value.ends_with(pattern),
            Operator::Unknown(name) => {
                debug!(operator = %name, "Unknown operator never matches");
                false
            }
        }
    }
}
