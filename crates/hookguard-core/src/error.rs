//! Error types for hookguard

/// Result type alias using hookguard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hookguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pattern failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Rule definition or evaluation errors
    #[error("policy error: {0}")]
    Policy(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new policy error
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }
}
