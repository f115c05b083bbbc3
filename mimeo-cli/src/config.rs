//! Run configuration: CLI flags merged with the optional config file and
//! the per-side API key environment variables.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::endpoint::Side;
use crate::output::OutputFormat;
use mimeo_common::ObjectType;

/// Project stamped into replicated objects when none is configured.
pub const DEFAULT_PROJECT: &str = "system-catalog";

/// Everything one replication run needs to know. Flags win over the config
/// file; API keys come from the environment only.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: String,
    pub target: String,
    pub object_type: ObjectType,
    pub project: String,
    pub verify_ssl: bool,
    pub debug: bool,
    pub output: OutputFormat,
    pub source_api_key: Option<String>,
    pub target_api_key: Option<String>,
}

/// What the command line contributed, before the config file and the
/// built-in defaults fill the gaps.
#[derive(Debug, Clone)]
pub struct Flags {
    pub source: String,
    pub target: String,
    pub object_type: ObjectType,
    pub project: Option<String>,
    pub verify_ssl: bool,
    pub debug: bool,
    pub output: OutputFormat,
}

impl RunConfig {
    /// Merge the command line with the config file. Flags win, the file
    /// fills gaps, and the built-in project default covers both being
    /// silent. Certificate verification can be switched on from either
    /// side. API keys are read from the environment.
    pub fn assemble(flags: Flags, file: FileConfig) -> Self {
        Self {
            source: flags.source,
            target: flags.target,
            object_type: flags.object_type,
            project: flags
                .project
                .or(file.project)
                .unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            verify_ssl: flags.verify_ssl || file.verify_ssl.unwrap_or(false),
            debug: flags.debug,
            output: flags.output,
            source_api_key: api_key_from_env(Side::Source.key_var()),
            target_api_key: api_key_from_env(Side::Target.key_var()),
        }
    }
}

/// Operator defaults read from `~/.config/mimeo/cli.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub project: Option<String>,
    pub verify_ssl: Option<bool>,
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        let config: FileConfig = toml::from_str(&contents)?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/mimeo/cli.toml"))
    }
}

/// Read one API key variable, treating empty values as unset.
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(project: Option<&str>, verify_ssl: bool) -> Flags {
        Flags {
            source: "./snapshots".to_string(),
            target: "https://console.example.com".to_string(),
            object_type: ObjectType::ConfigContexts,
            project: project.map(str::to_string),
            verify_ssl,
            debug: false,
            output: OutputFormat::Table,
        }
    }

    #[test]
    fn test_file_config_parses_known_keys() {
        let config: FileConfig =
            toml::from_str("project = \"staging-catalog\"\nverify_ssl = true\n").unwrap();
        assert_eq!(config.project.as_deref(), Some("staging-catalog"));
        assert_eq!(config.verify_ssl, Some(true));
    }

    #[test]
    fn test_file_config_defaults_when_empty() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.project.is_none());
        assert!(config.verify_ssl.is_none());
    }

    #[test]
    fn test_assemble_prefers_the_project_flag() {
        let file = FileConfig {
            project: Some("from-file".to_string()),
            verify_ssl: None,
        };
        let config = RunConfig::assemble(flags(Some("from-flag"), false), file);
        assert_eq!(config.project, "from-flag");
    }

    #[test]
    fn test_assemble_project_falls_back_to_file_then_default() {
        let file = FileConfig {
            project: Some("from-file".to_string()),
            verify_ssl: None,
        };
        let config = RunConfig::assemble(flags(None, false), file);
        assert_eq!(config.project, "from-file");

        let config = RunConfig::assemble(flags(None, false), FileConfig::default());
        assert_eq!(config.project, DEFAULT_PROJECT);
    }

    #[test]
    fn test_assemble_verify_ssl_on_from_either_side() {
        let file = FileConfig {
            project: None,
            verify_ssl: Some(true),
        };
        assert!(RunConfig::assemble(flags(None, false), file).verify_ssl);
        assert!(RunConfig::assemble(flags(None, true), FileConfig::default()).verify_ssl);
        assert!(!RunConfig::assemble(flags(None, false), FileConfig::default()).verify_ssl);
    }

    #[test]
    fn test_assemble_passes_the_rest_through() {
        let config = RunConfig::assemble(flags(None, false), FileConfig::default());
        assert_eq!(config.source, "./snapshots");
        assert_eq!(config.target, "https://console.example.com");
        assert_eq!(config.object_type, ObjectType::ConfigContexts);
        assert_eq!(config.output, OutputFormat::Table);
        assert!(!config.debug);
    }
}
