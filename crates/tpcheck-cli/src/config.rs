//! Configuration management for the CLI
//!
//! Settings come from, in increasing precedence:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file written by `tpcheck config init`
pub const DEFAULT_CONFIG_FILE: &str = ".tpcheck.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where configuration files live inside a project directory
    pub files: FilesConfig,

    /// Validation behaviour
    pub validation: ValidationSettings,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSettings,
}

/// File layout of a project directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Project configuration file name
    pub project: String,

    /// Task presenter configuration file name
    pub task_presenter: String,

    /// Tutorial configuration file name (optional in a project)
    pub tutorial: String,

    /// Directory holding `<question-key>.html` help files
    pub help_dir: String,
}

/// Validation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// Stop at the first invalid project
    pub fail_fast: bool,

    /// Stop after this many invalid projects
    pub max_errors: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            project: "project.json".to_string(),
            task_presenter: "task_presenter.json".to_string(),
            tutorial: "tutorial.json".to_string(),
            help_dir: "help".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;

        let config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        };

        config.check()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(".tpcheck.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let tpcheck_dir = config_dir.join("tpcheck");
            paths.push(tpcheck_dir.join("config.yaml"));
            paths.push(tpcheck_dir.join("config.json"));
        }

        paths
    }

    /// Reject settings that can never work
    pub fn check(&self) -> Result<()> {
        let files = [
            ("files.project", &self.files.project),
            ("files.task_presenter", &self.files.task_presenter),
            ("files.tutorial", &self.files.tutorial),
            ("files.help_dir", &self.files.help_dir),
        ];
        for (name, value) in files {
            if value.trim().is_empty() {
                return Err(Error::config(format!("'{}' must not be empty", name)));
            }
        }

        if self.validation.max_errors == Some(0) {
            return Err(Error::config("'validation.max_errors' must be at least 1"));
        }

        Ok(())
    }

    /// Render the configuration as YAML or JSON
    pub fn render(&self, yaml: bool) -> Result<String> {
        if yaml {
            Ok(serde_yaml::to_string(self)?)
        } else {
            Ok(serde_json::to_string_pretty(self)?)
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(is_yaml(path))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
