//! Local path resolution for provisor
//!
//! # Environment Variables
//!
//! - `PROVISOR_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/provisor`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `PROVISOR_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/provisor` (if set)
//! 3. `~/.config/provisor`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "PROVISOR_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Name of the default template directory inside the config directory
pub const TEMPLATES_DIR: &str = "templates";

/// Get the provisor config directory path
pub fn config_dir() -> Result<PathBuf> {
    resolve_config_dir(
        std::env::var(ENV_CONFIG_DIR).ok(),
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
    )
}

fn resolve_config_dir(
    env_override: Option<String>,
    xdg_config_home: Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = env_override {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Some(xdg_config) = xdg_config_home.filter(|s| !s.is_empty()) {
        let path = PathBuf::from(xdg_config).join("provisor");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = home.context("Could not determine home directory")?;
    let path = home.join(".config").join("provisor");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Config file path, either given explicitly or inside [`config_dir`]
pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config_dir()?.join(CONFIG_FILE)),
    }
}

/// Expand ~ and environment variables in a local path string.
///
/// All local paths coming from config or flags go through this; remote
/// paths never do, their `~` belongs to the remote shell.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_env_override_wins() {
        let result = resolve_config_dir(
            Some("/custom/config/path".into()),
            Some("/xdg".into()),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(result, PathBuf::from("/custom/config/path"));
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let home = dirs::home_dir().unwrap();
        let result = resolve_config_dir(Some("~/dotfiles/provisor".into()), None, None).unwrap();
        assert_eq!(result, home.join("dotfiles").join("provisor"));
    }

    #[test]
    fn test_config_dir_xdg() {
        let result =
            resolve_config_dir(None, Some("/tmp/xdg".into()), Some(PathBuf::from("/home/me")))
                .unwrap();
        assert_eq!(result, PathBuf::from("/tmp/xdg/provisor"));
    }

    #[test]
    fn test_config_dir_default() {
        let result =
            resolve_config_dir(None, Some(String::new()), Some(PathBuf::from("/home/me"))).unwrap();
        assert_eq!(result, PathBuf::from("/home/me/.config/provisor"));
    }

    #[test]
    fn test_config_dir_without_home_fails() {
        assert!(resolve_config_dir(None, None, None).is_err());
    }

    #[test]
    fn test_config_file_explicit() {
        let path = config_file(Some(Path::new("/etc/provisor.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/provisor.toml"));
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$PROVISOR_NONEXISTENT_VAR_12345/file");
        assert_eq!(
            result,
            PathBuf::from("/path/$PROVISOR_NONEXISTENT_VAR_12345/file")
        );
    }
}
