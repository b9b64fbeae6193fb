//! Centralized path resolution for mlproj
//!
//! # Environment Variables
//!
//! - `MLPROJ_CONFIG_DIR` - Override the user config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `MLPROJ_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/mlproj` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\mlproj`
//!    - macOS/Linux: `~/.config/mlproj`
//!
//! Inside a project, environment files live in `xproject/mlenvs/`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "MLPROJ_CONFIG_DIR";

/// Project directory holding the environment files.
pub const ENVIRONS_DIR: &str = "xproject/mlenvs";

/// Get the mlproj config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("mlproj");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("mlproj");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("mlproj");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Path of the user settings file.
pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory of the environment files of a project.
pub fn environs_dir(project: &Path) -> PathBuf {
    project.join(ENVIRONS_DIR)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: Tests run in isolation
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/mlproj/config", || {
            let result = config_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/mlproj/config"));
            assert_eq!(
                settings_file().unwrap(),
                PathBuf::from("/custom/mlproj/config/config.toml")
            );
        });
    }

    #[test]
    fn test_xdg_config_home() {
        without_env_var(ENV_CONFIG_DIR, || {
            with_env_var("XDG_CONFIG_HOME", "/tmp/xdg-mlproj-test", || {
                let result = config_dir().unwrap();
                assert_eq!(result, PathBuf::from("/tmp/xdg-mlproj-test/mlproj"));
            });
        });
    }

    #[test]
    fn test_environs_dir() {
        assert_eq!(
            environs_dir(Path::new("/work/app")),
            PathBuf::from("/work/app/xproject/mlenvs")
        );
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_MLPROJ_VAR/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_MLPROJ_VAR/file"));
    }
}
