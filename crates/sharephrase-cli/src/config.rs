//! CLI configuration: TOML file + environment variable overrides.
//!
//! Priority: command-line flags > environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sharephrase_vss::VssConfig;
use std::path::Path;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub cli: CliSection,

    /// Defaults for `split`
    #[serde(default)]
    pub split: SplitSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSection {
    /// Log level (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CliSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSection {
    /// Shares needed to reconstruct
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Shares to generate
    #[serde(default = "default_total_shares")]
    pub total_shares: usize,
}

impl Default for SplitSection {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            total_shares: default_total_shares(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_threshold() -> usize {
    VssConfig::two_of_three().threshold
}

fn default_total_shares() -> usize {
    VssConfig::two_of_three().total_shares
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SHAREPHRASE_LOG_LEVEL`
    /// - `SHAREPHRASE_THRESHOLD`
    /// - `SHAREPHRASE_TOTAL_SHARES`
    ///
    /// Numeric values that fail to parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SHAREPHRASE_LOG_LEVEL") {
            self.cli.log_level = v;
        }
        if let Ok(v) = std::env::var("SHAREPHRASE_THRESHOLD") {
            if let Ok(threshold) = v.parse::<usize>() {
                self.split.threshold = threshold;
            }
        }
        if let Ok(v) = std::env::var("SHAREPHRASE_TOTAL_SHARES") {
            if let Ok(total) = v.parse::<usize>() {
                self.split.total_shares = total;
            }
        }
    }

    pub fn vss_config(&self) -> VssConfig {
        VssConfig {
            threshold: self.split.threshold,
            total_shares: self.split.total_shares,
        }
    }

    /// Validate the settings every command uses.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.cli.log_level.to_ascii_lowercase().as_str()),
            "cli.log_level must be one of {}",
            LOG_LEVELS.join(", ")
        );
        Ok(())
    }

    /// Validate the `[split]` defaults. Only `split` reads them.
    pub fn validate_split(&self) -> Result<()> {
        self.vss_config()
            .validate()
            .context("Invalid [split] settings")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(toml: &str) -> CliConfig {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml).unwrap();
        CliConfig::from_file(file.path()).unwrap()
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = load("");
        assert_eq!(config.cli.log_level, "warn");
        assert_eq!(config.split.threshold, 2);
        assert_eq!(config.split.total_shares, 3);
        assert!(config.validate().is_ok());
        assert!(config.validate_split().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = load(
            r#"
[cli]
log_level = "debug"

[split]
threshold = 3
total_shares = 5
"#,
        );
        assert_eq!(config.cli.log_level, "debug");
        assert_eq!(config.vss_config(), VssConfig::three_of_five());
        assert!(config.validate().is_ok());
        assert!(config.validate_split().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = load(
            r#"
[split]
total_shares = 7
"#,
        );
        assert_eq!(config.split.threshold, 2);
        assert_eq!(config.split.total_shares, 7);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CliConfig::from_file(&dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[split\nthreshold = ").unwrap();
        assert!(CliConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = load("");

        std::env::set_var("SHAREPHRASE_LOG_LEVEL", "trace");
        std::env::set_var("SHAREPHRASE_THRESHOLD", "4");
        std::env::set_var("SHAREPHRASE_TOTAL_SHARES", "not-a-number");

        config.apply_env_overrides();

        assert_eq!(config.cli.log_level, "trace");
        assert_eq!(config.split.threshold, 4);
        // Unparseable value leaves the file/default value alone
        assert_eq!(config.split.total_shares, 3);

        std::env::remove_var("SHAREPHRASE_LOG_LEVEL");
        std::env::remove_var("SHAREPHRASE_THRESHOLD");
        std::env::remove_var("SHAREPHRASE_TOTAL_SHARES");
    }

    #[test]
    fn test_validation_rejects_bad_split() {
        let config = load(
            r#"
[split]
threshold = 4
total_shares = 3
"#,
        );
        assert!(config.validate_split().is_err());

        let config = load(
            r#"
[split]
threshold = 2
total_shares = 300
"#,
        );
        assert!(config.validate_split().is_err());
    }

    #[test]
    fn test_bad_split_section_does_not_block_other_commands() {
        let config = load(
            r#"
[cli]
log_level = "info"

[split]
threshold = 300
total_shares = 300
"#,
        );
        assert!(config.validate().is_ok());
        assert!(config.validate_split().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let config = load(
            r#"
[cli]
log_level = "loud"
"#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = load(
            r#"
[cli]
log_level = "info"

[split]
threshold = 3
total_shares = 4
"#,
        );
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed: CliConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.cli.log_level, "info");
        assert_eq!(reparsed.vss_config(), config.vss_config());
    }
}
