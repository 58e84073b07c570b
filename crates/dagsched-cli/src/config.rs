use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dagsched.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagschedConfig {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// `pretty`, `text` or `json`; unknown values are ignored.
    #[serde(default)]
    pub format: Option<String>,
    /// Append the metrics table to every analysis.
    #[serde(default)]
    pub metrics: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Source vertex overriding the one named by the input document.
    #[serde(default)]
    pub source: Option<usize>,
}

/// Load the config named by `--config`, else `./dagsched.toml` if present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<DagschedConfig> {
    let path: PathBuf = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = working_dir.join(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(DagschedConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<DagschedConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(None, dir.path()).expect("defaults");
        assert_eq!(config, DagschedConfig::default());
        assert!(!config.report.metrics);
    }

    #[test]
    fn default_file_in_working_dir_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[report]\nformat = \"json\"\nmetrics = true\n\n[analysis]\nsource = 3\n",
        )
        .expect("write");

        let config = load_config(None, dir.path()).expect("parse");
        assert_eq!(config.report.format.as_deref(), Some("json"));
        assert!(config.report.metrics);
        assert_eq!(config.analysis.source, Some(3));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[analysis]\nsource = 1\n").expect("write");

        let config = load_config(Some(&path), dir.path()).expect("parse");
        assert_eq!(config.report, ReportConfig::default());
        assert_eq!(config.analysis.source, Some(1));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("nope.toml")), dir.path())
            .expect_err("must fail");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[report\n").expect("write");
        let err = load_config(None, dir.path()).expect_err("must fail");
        assert!(format!("{err:#}").contains("Failed to parse"));
    }
}
