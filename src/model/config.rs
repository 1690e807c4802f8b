use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "RFP_AGENT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DATA_DIR: &str = "RFP_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

const ENV_OUTPUT_DIR: &str = "RFP_OUTPUT_DIR";

const ENV_RUN_TIMEOUT_SECS: &str = "RFP_RUN_TIMEOUT_SECS";
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;

/// Keywords that mark a requirement as critical when the RFP does not flag it explicitly
pub const DEFAULT_CRITICAL_KEYWORDS: &[&str] = &[
    "compliance",
    "compliant",
    "regulatory",
    "regulation",
    "security",
    "secure",
    "encryption",
    "authentication",
    "mandatory",
    "required",
    "must have",
    "critical",
    "certification",
    "certified",
    "audit",
    "sox",
    "hipaa",
    "gdpr",
    "pci",
    "iso",
    "soc 2",
    "soc2",
];

/// Evaluation and pricing parameters handed read-only to every run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum score the best product needs to be considered at all
    pub matching_threshold: f64,
    /// Markup applied on top of base price and tests, in percent
    pub markup_percentage: f64,
    /// Tests priced for products that do not list their own
    pub default_tests: Vec<String>,
    pub threshold_strong: f64,
    pub threshold_moderate: f64,
    pub critical_keywords: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            matching_threshold: 0.3,
            markup_percentage: 25.0,
            default_tests: vec!["security_audit".to_string(), "integration_test".to_string()],
            threshold_strong: 0.8,
            threshold_moderate: 0.6,
            critical_keywords: DEFAULT_CRITICAL_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl EvaluationConfig {
    /// Range checks on the loaded values; empty when the config is usable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("matching_threshold", self.matching_threshold),
            ("threshold_strong", self.threshold_strong),
            ("threshold_moderate", self.threshold_moderate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{} must be within [0, 1], got {}", name, value));
            }
        }

        if self.threshold_moderate > self.threshold_strong {
            errors.push(format!(
                "threshold_moderate ({}) exceeds threshold_strong ({})",
                self.threshold_moderate, self.threshold_strong
            ));
        }

        if !self.markup_percentage.is_finite() || self.markup_percentage < 0.0 {
            errors.push(format!(
                "markup_percentage must be a non-negative number, got {}",
                self.markup_percentage
            ));
        }

        errors
    }

    /// Check whether a requirement text mentions any critical keyword
    pub fn is_critical_text(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.critical_keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub evaluation: EvaluationConfig,
    pub data_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub run_timeout: Duration,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let data_dir = std::env::var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let output_dir = std::env::var(ENV_OUTPUT_DIR).ok().map(PathBuf::from);

        let run_timeout = std::env::var(ENV_RUN_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS));

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let evaluation = Self::load_config_file(&config_path)
            .map(|cf| cf.evaluation)
            .unwrap_or_default();

        Self {
            evaluation,
            data_dir,
            output_dir,
            run_timeout,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str, path: &Path) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str::<ConfigFile>(contents) {
            Ok(config) => {
                let errors = config.evaluation.validate();
                if !errors.is_empty() {
                    tracing::warn!(
                        path = %path.display(),
                        errors = %errors.join("; "),
                        "Invalid evaluation settings in config file, using defaults"
                    );
                    return None;
                }
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = EvaluationConfig::default();
        assert_eq!(config.matching_threshold, 0.3);
        assert_eq!(config.markup_percentage, 25.0);
        assert_eq!(config.threshold_strong, 0.8);
        assert_eq!(config.threshold_moderate, 0.6);
        assert_eq!(config.default_tests, vec!["security_audit", "integration_test"]);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "evaluation:\n  markup_percentage: 10\n  default_tests: [load_test]\n";
        let parsed = Config::parse_config(yaml, Path::new("config.yaml")).unwrap();

        assert_eq!(parsed.evaluation.markup_percentage, 10.0);
        assert_eq!(parsed.evaluation.default_tests, vec!["load_test"]);
        assert_eq!(parsed.evaluation.matching_threshold, 0.3);
        assert!(!parsed.evaluation.critical_keywords.is_empty());
    }

    #[test]
    fn test_empty_and_invalid_yaml() {
        let empty = Config::parse_config("   \n", Path::new("config.yaml"));
        assert!(empty.is_some());

        let invalid = Config::parse_config("evaluation: [not, a, map", Path::new("config.yaml"));
        assert!(invalid.is_none());
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        for yaml in [
            "evaluation:\n  markup_percentage: -5\n",
            "evaluation:\n  threshold_strong: 0.5\n  threshold_moderate: 0.7\n",
            "evaluation:\n  threshold_strong: .nan\n",
            "evaluation:\n  matching_threshold: 1.5\n",
        ] {
            assert!(Config::parse_config(yaml, Path::new("config.yaml")).is_none(), "{}", yaml);
        }

        assert!(EvaluationConfig::default().validate().is_empty());
    }

    #[test]
    fn test_critical_keyword_detection() {
        let config = EvaluationConfig::default();
        assert!(config.is_critical_text("End-to-end ENCRYPTION at rest"));
        assert!(config.is_critical_text("SOC 2 Type II report"));
        assert!(!config.is_critical_text("24x7 support"));
    }
}
