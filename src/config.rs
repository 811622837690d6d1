use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub(crate) const CONFIG_FILE_NAME: &str = "phpwrap.json";
pub(crate) const DEFAULT_PORT: &str = "8000";

/// Flat option map read from `phpwrap.json`. Keys other than `port` are kept
/// but not interpreted.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProjectConfig {
    values: Map<String, Value>,
}

#[derive(Debug)]
pub(crate) struct ConfigLoad {
    pub(crate) config: ProjectConfig,
    pub(crate) diagnostic: Option<String>,
}

impl ProjectConfig {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Configured dev-server port. Strings are taken as-is and numbers are
    /// rendered in decimal; other JSON types are ignored.
    pub fn port(&self) -> Option<String> {
        match self.values.get("port")? {
            Value::String(port) => Some(port.clone()),
            Value::Number(port) => Some(port.to_string()),
            other => {
                warn!("ignoring `port` in {CONFIG_FILE_NAME}: expected string or number, got {other}");
                None
            }
        }
    }
}

/// Loads the project config, falling back to defaults when the file is missing
/// or malformed. A malformed file yields exactly one diagnostic for the caller
/// to report.
pub(crate) fn load_project_config(dir: &Path) -> ConfigLoad {
    match read_project_config(dir) {
        Ok(config) => ConfigLoad {
            config,
            diagnostic: None,
        },
        Err(err) => ConfigLoad {
            config: ProjectConfig::default(),
            diagnostic: Some(format!("{err:#}; continuing with defaults")),
        },
    }
}

fn read_project_config(dir: &Path) -> Result<ProjectConfig> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no {CONFIG_FILE_NAME} in {}", dir.display());
            return Ok(ProjectConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config: {}", config_path.display()));
        }
    };

    let config: ProjectConfig = serde_json::from_str(&config_text)
        .with_context(|| format!("invalid JSON config: {}", config_path.display()))?;
    debug!(keys = config.values.len(), "loaded {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_empty_config_without_diagnostic() -> Result<()> {
        let temp = TempDir::new()?;
        let load = load_project_config(temp.path());
        assert!(load.config.is_empty());
        assert!(load.diagnostic.is_none());
        Ok(())
    }

    #[test]
    fn malformed_file_yields_empty_config_and_one_diagnostic() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join(CONFIG_FILE_NAME), "{ port: 9000")?;
        let load = load_project_config(temp.path());
        assert!(load.config.is_empty());
        let diagnostic = load
            .diagnostic
            .ok_or_else(|| anyhow::anyhow!("expected a diagnostic"))?;
        assert!(diagnostic.contains("invalid JSON config"));
        Ok(())
    }

    #[test]
    fn non_object_json_is_treated_as_malformed() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[8000]")?;
        let load = load_project_config(temp.path());
        assert!(load.config.is_empty());
        assert!(load.diagnostic.is_some());
        Ok(())
    }

    #[test]
    fn valid_file_is_kept_verbatim_including_unknown_keys() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{"port": "9000", "docroot": "web"}"#,
        )?;
        let load = load_project_config(temp.path());
        assert!(load.diagnostic.is_none());
        assert_eq!(load.config.port().as_deref(), Some("9000"));
        assert_eq!(
            load.config.get("docroot"),
            Some(&Value::String("web".to_owned()))
        );
        Ok(())
    }

    #[test]
    fn numeric_port_is_rendered_as_decimal() -> Result<()> {
        let config: ProjectConfig = serde_json::from_str(r#"{"port": 9001}"#)?;
        assert_eq!(config.port().as_deref(), Some("9001"));
        Ok(())
    }

    #[test]
    fn non_scalar_port_is_ignored() -> Result<()> {
        let config: ProjectConfig = serde_json::from_str(r#"{"port": true}"#)?;
        assert_eq!(config.port(), None);
        Ok(())
    }
}
