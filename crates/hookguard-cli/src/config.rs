//! Configuration management

use hookguard_core::DEFAULT_CACHE_CAPACITY;
use hookguard_filters::FilterConfig;
use hookguard_telemetry::{MAX_LOG_ENTRY_SIZE, MAX_PROMPT_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// hookguard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookguardConfig {
    /// Redaction stages and their pattern sources
    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HookguardConfig {
    /// Load configuration from file and CLI args
    pub fn load(config_path: &Path, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(rules) = cli.rules_override() {
            config.rules.path = Some(rules.to_path_buf());
        }

        if let Some(word_list) = &cli.word_list {
            config.filters.word_list = Some(word_list.clone());
        }

        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        // An empty file is an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Rule file location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// YAML rule file; no rules are evaluated when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Pattern cache sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// Prompt log limits, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_max_entry_size")]
    pub max_entry_size: usize,

    #[serde(default = "default_max_prompt_length")]
    pub max_prompt_length: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_entry_size: default_max_entry_size(),
            max_prompt_length: default_max_prompt_length(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_max_entry_size() -> usize {
    MAX_LOG_ENTRY_SIZE
}

fn default_max_prompt_length() -> usize {
    MAX_PROMPT_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HookguardConfig::from_yaml("").unwrap();
        assert!(config.filters.enable_secrets);
        assert!(config.rules.path.is_none());
        assert_eq!(config.cache.capacity, 128);
        assert_eq!(config.logging.max_entry_size, 50_000);
        assert_eq!(config.logging.max_prompt_length, 100_000);
    }

    #[test]
    fn test_partial_file() {
        let yaml = r#"
filters:
  enable_profanity: false
  extra_secrets:
    - name: internal_token
      pattern: "itk_[0-9a-f]{16}"
rules:
  path: .hookguard/rules.yaml
cache:
  capacity: 16
"#;
        let config = HookguardConfig::from_yaml(yaml).unwrap();
        assert!(!config.filters.enable_profanity);
        assert_eq!(config.filters.extra_secrets.len(), 1);
        assert_eq!(config.rules.path, Some(PathBuf::from(".hookguard/rules.yaml")));
        assert_eq!(config.cache.capacity, 16);
        assert_eq!(config.logging.max_entry_size, 50_000);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(HookguardConfig::from_yaml("cache: [unclosed").is_err());
    }
}
