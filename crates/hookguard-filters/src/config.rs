//! Filter pipeline configuration

use crate::catalog::PatternSpec;
use crate::profanity::WordListSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which stages run and where their patterns come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Run the secrets stage
    #[serde(default = "default_true")]
    pub enable_secrets: bool,

    /// Run the profanity stage
    #[serde(default = "default_true")]
    pub enable_profanity: bool,

    /// Profanity word list file; the built-in list when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_list: Option<PathBuf>,

    /// Signatures appended after the built-in ones
    #[serde(default)]
    pub extra_secrets: Vec<PatternSpec>,
}

impl FilterConfig {
    /// Source of the profanity words
    pub fn word_list_source(&self) -> WordListSource {
        match &self.word_list {
            Some(path) => WordListSource::File(path.clone()),
            None => WordListSource::Builtin,
        }
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable_secrets: true,
            enable_profanity: true,
            word_list: None,
            extra_secrets: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
