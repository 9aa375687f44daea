use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::paths;

// ============================================================================
// Main Config Schema
// ============================================================================

/// The provisor configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProvisorConfig {
    /// Host to provision
    #[serde(default)]
    pub host: HostSettings,

    /// Where templates are read from
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Values substituted into templates
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Settings for the rxvt tasks
    #[serde(default)]
    pub rxvt: RxvtConfig,
}

impl ProvisorConfig {
    /// Load config from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML format")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.host.validate()?;
        debkit::Package::new(self.rxvt.package.as_str())
            .context("Invalid [rxvt] package")?;
        Ok(())
    }

    /// Template directory: explicit override, then `[templates] dir`, then
    /// `templates/` next to the config file
    pub fn template_dir(&self, config_dir: &Path, explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        match &self.templates.dir {
            Some(dir) => paths::expand(dir),
            None => config_dir.join(paths::TEMPLATES_DIR),
        }
    }
}

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSettings {
    /// Host name or address; may carry `user@` and `:port`
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Passed to ssh as `-i`
    #[serde(default)]
    pub identity_file: Option<String>,

    /// Extra `-o` options for ssh
    #[serde(default)]
    pub ssh_options: Vec<String>,

    /// Run sudo over a pseudo-terminal so it can prompt for a password
    #[serde(default = "default_true")]
    pub interactive_sudo: bool,
}

fn default_true() -> bool {
    true
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            address: None,
            user: None,
            port: None,
            identity_file: None,
            ssh_options: Vec::new(),
            interactive_sudo: true,
        }
    }
}

impl HostSettings {
    pub fn validate(&self) -> Result<()> {
        if let Some(address) = &self.address
            && address.trim().is_empty()
        {
            bail!("[host] address must not be empty");
        }
        if self.port == Some(0) {
            bail!("[host] port must be between 1 and 65535");
        }
        if let Some(user) = &self.user
            && user.trim().is_empty()
        {
            bail!("[host] user must not be empty");
        }
        for option in &self.ssh_options {
            if !option.contains('=') {
                bail!("[host] ssh option '{}' must have the form Key=Value", option);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

// ============================================================================
// rxvt
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RxvtConfig {
    #[serde(default = "default_rxvt_package")]
    pub package: String,

    /// Run `apt-get install --only-upgrade` after the install check
    #[serde(default)]
    pub upgrade: bool,
}

fn default_rxvt_package() -> String {
    "rxvt-unicode-256color".to_string()
}

impl Default for RxvtConfig {
    fn default() -> Self {
        Self {
            package: default_rxvt_package(),
            upgrade: false,
        }
    }
}
