//! User settings (`config.toml` in the config directory)
//!
//! ```toml
//! [connect]
//! host = "localhost"
//! user = "admin"
//!
//! [setup]
//! confirm = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Settings shared by every project of the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Connection defaults, overridden by the environment's `connect`.
    #[serde(default)]
    pub connect: ConnectDefaults,
    /// `setup` command behaviour.
    #[serde(default)]
    pub setup: SetupSettings,
}

/// Connection defaults; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
}

impl ConnectDefaults {
    /// The defaults as a `connect` object, to merge an environment over.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupSettings {
    /// Ask before executing the plan.
    #[serde(default = "default_confirm")]
    pub confirm: bool,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self { confirm: true }
    }
}

fn default_confirm() -> bool {
    true
}

impl Settings {
    /// Load the settings file; a missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Load the settings from the user config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&crate::paths::settings_file()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.setup.confirm);
    }

    #[test]
    fn test_load_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[connect]\nhost = \"ml.local\"\nmanage-port = 18002\n\n[setup]\nconfirm = false\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.connect.host.as_deref(), Some("ml.local"));
        assert_eq!(settings.connect.manage_port, Some(18002));
        assert!(!settings.setup.confirm);

        let map = settings.connect.to_map();
        assert_eq!(map["host"], Value::from("ml.local"));
        assert!(!map.contains_key("user"));
    }

    #[test]
    fn test_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[setup]\nconfirm = \"maybe\"\n").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
