use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::AllowList;

/// Config file looked up in the current directory when none is given.
pub const CONFIG_FILE: &str = ".pr-stats.toml";

/// Comma-separated reviewer allow-list, used when the config names none.
pub const REVIEWERS_ENV: &str = "PR_STATS_REVIEWERS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-stats.toml.
///
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the exported GraphQL search results
    pub data_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV statistics report
    pub analysis: PathBuf,
    /// Raw dump of every ingested PR edge
    pub pr_data: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            analysis: PathBuf::from("analysis.csv"),
            pr_data: PathBuf::from("pr-data.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Reviewer logins to report on. Empty means everyone.
    #[serde(default)]
    pub reviewers: Vec<String>,
}

impl Config {
    /// Load configuration from `path`, or from .pr-stats.toml in the current
    /// directory when no path is given. A missing default file yields
    /// `Config::default()`; a missing explicit file is an error.
    ///
    /// Falls back to the PR_STATS_REVIEWERS env var when the file names no
    /// reviewers.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.filter.reviewers.is_empty() {
            if let Ok(list) = std::env::var(REVIEWERS_ENV) {
                config.filter.reviewers = parse_reviewer_list(&list);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn allow_list(&self) -> AllowList {
        self.filter.reviewers.iter().cloned().collect()
    }
}

/// Split a comma-separated list, dropping blanks around separators.
pub fn parse_reviewer_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.data_dir, PathBuf::from("data"));
        assert_eq!(config.output.analysis, PathBuf::from("analysis.csv"));
        assert_eq!(config.output.pr_data, PathBuf::from("pr-data.json"));
        assert!(config.filter.reviewers.is_empty());
        assert!(config.allow_list().is_empty());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[input]
data_dir = "exports/2022"

[filter]
reviewers = ["alice", "bob"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input.data_dir, PathBuf::from("exports/2022"));
        assert_eq!(config.output.analysis, PathBuf::from("analysis.csv"));
        assert_eq!(config.filter.reviewers.len(), 2);
        assert!(config.allow_list().allows("bob"));
        assert!(!config.allow_list().allows("carol"));
    }

    #[test]
    fn test_partial_output_section_keeps_defaults() {
        let config: Config = toml::from_str("[output]\nanalysis = \"out/stats.csv\"\n").unwrap();
        assert_eq!(config.output.analysis, PathBuf::from("out/stats.csv"));
        assert_eq!(config.output.pr_data, PathBuf::from("pr-data.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.toml");
        fs::write(&path, "[filter]\nreviewers = [\"carol\"]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.filter.reviewers, vec!["carol".to_string()]);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[filter]\nreviewers = \"not a list\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_reviewers_env_fallback() {
        let dir = TempDir::new().unwrap();
        let without_reviewers = dir.path().join("plain.toml");
        fs::write(&without_reviewers, "[output]\nanalysis = \"stats.csv\"\n").unwrap();
        let with_reviewers = dir.path().join("filtered.toml");
        fs::write(&with_reviewers, "[filter]\nreviewers = [\"carol\"]\n").unwrap();

        std::env::set_var(REVIEWERS_ENV, "alice, bob");
        let from_env = Config::load(Some(&without_reviewers));
        let from_file = Config::load(Some(&with_reviewers));
        std::env::remove_var(REVIEWERS_ENV);

        assert_eq!(from_env.unwrap().filter.reviewers, vec!["alice", "bob"]);
        assert_eq!(from_file.unwrap().filter.reviewers, vec!["carol"]);
    }

    #[test]
    fn test_parse_reviewer_list() {
        assert_eq!(parse_reviewer_list("alice, bob,,Carol "), vec!["alice", "bob", "Carol"]);
        assert!(parse_reviewer_list("").is_empty());
    }
}
