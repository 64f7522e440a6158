//! Explicit ok/degraded results for fail-open code paths

/// A value that is always usable, tagged with whether it was produced
/// normally or substituted after a failure.
///
/// Callers that must never fail (the filter pipeline, field extraction)
/// return `Outcome` instead of `Result` so the degraded branch stays visible
/// in the type rather than disappearing into a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Produced normally
    Ok(T),

    /// Substituted fallback value, with the reason it was needed
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    /// Wrap a normally produced value
    pub fn ok(value: T) -> Self {
        Self::Ok(value)
    }

    /// Wrap a fallback value
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    /// Whether the value is a fallback
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The degradation reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Borrow the value
    pub fn value(&self) -> &T {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => value,
        }
    }

    /// Take the value, discarding the tag
    pub fn into_value(self) -> T {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_outcome() {
        let outcome = Outcome::ok(3);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.reason(), None);
        assert_eq!(outcome.into_value(), 3);
    }

    #[test]
    fn test_degraded_outcome() {
        let outcome = Outcome::degraded(String::new(), "permission denied");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.reason(), Some("permission denied"));
        assert_eq!(outcome.value(), "");
    }
}
