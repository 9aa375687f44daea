//! Core types for Debian package management.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Debian package, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Package {
    name: String,
}

impl Package {
    /// Create a package, validating the name against Debian policy.
    ///
    /// Names must be at least two characters long, start with a lowercase
    /// letter or digit, and contain only lowercase letters, digits, `+`,
    /// `-` and `.`. The name is later interpolated into shell commands,
    /// so nothing else is accepted.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(Error::InvalidName { name });
        }
        Ok(Self { name })
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() >= 2
        && (first.is_ascii_lowercase() || first.is_ascii_digit())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
}

/// A request to make sure a package is installed.
///
/// Constructed per call and consumed by [`Client::install`](crate::Client::install).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Package to install
    pub package: Package,
    /// Also run an upgrade for the package, whether or not it was just installed
    pub upgrade: bool,
}

impl InstallRequest {
    /// Install only, no upgrade.
    pub fn new(package: Package) -> Self {
        Self {
            package,
            upgrade: false,
        }
    }

    /// Set the upgrade flag.
    pub fn with_upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }
}

/// What an install call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The package was absent and has been installed
    pub installed: bool,
    /// An upgrade command was run
    pub upgraded: bool,
}

impl InstallOutcome {
    /// Whether any command changed the package database.
    pub fn changed(&self) -> bool {
        self.installed || self.upgraded
    }
}

/// Parsed `Status:` field from `dpkg -s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpkgStatus {
    /// Selection state, e.g. `install`, `deinstall`, `hold`
    pub want: String,
    /// Error flag, normally `ok`
    pub flag: String,
    /// Package state, e.g. `installed`, `config-files`
    pub state: String,
}

impl DpkgStatus {
    /// Find and parse the `Status:` line in `dpkg -s` output.
    pub fn parse(output: &str) -> Option<Self> {
        let line = output
            .lines()
            .find_map(|line| line.strip_prefix("Status:"))?;
        let mut parts = line.split_whitespace();
        Some(Self {
            want: parts.next()?.to_string(),
            flag: parts.next()?.to_string(),
            state: parts.next()?.to_string(),
        })
    }

    /// Whether the package files are on disk.
    ///
    /// Only the state field matters: a held package (`hold ok installed`)
    /// or one selected for removal (`deinstall ok installed`) is still
    /// installed until dpkg actually removes it.
    pub fn is_installed(&self) -> bool {
        self.state == "installed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        for name in ["rxvt-unicode-256color", "g++", "libc6", "python3.11", "0ad"] {
            assert!(Package::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_single_character_name_rejected() {
        let err = Package::new("x").unwrap_err();
        assert!(err.to_string().contains("x"));
        assert!(Package::new("xz").is_ok());
    }

    #[test]
    fn test_invalid_package_names() {
        for name in ["", "a", "Vim", "-vim", "vim; rm -rf /", "vim tmux", "$(id)"] {
            assert!(
                matches!(Package::new(name), Err(Error::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_install_request_defaults_to_no_upgrade() {
        let request = InstallRequest::new(Package::new("vim").unwrap());
        assert!(!request.upgrade);
        assert!(request.with_upgrade(true).upgrade);
    }

    #[test]
    fn test_dpkg_status_installed() {
        let output = "Package: rxvt-unicode\n\
                      Status: install ok installed\n\
                      Priority: optional\n";
        let status = DpkgStatus::parse(output).unwrap();
        assert!(status.is_installed());
    }

    #[test]
    fn test_dpkg_status_removed_with_config() {
        let output = "Package: rxvt-unicode\nStatus: deinstall ok config-files\n";
        let status = DpkgStatus::parse(output).unwrap();
        assert_eq!(status.state, "config-files");
        assert!(!status.is_installed());
    }

    #[test]
    fn test_dpkg_status_held_package() {
        let output = "Package: rxvt-unicode-256color\nStatus: hold ok installed\n";
        let status = DpkgStatus::parse(output).unwrap();
        assert_eq!(status.want, "hold");
        assert!(status.is_installed());
    }

    #[test]
    fn test_dpkg_status_selected_for_removal() {
        let output = "Package: rxvt-unicode-256color\nStatus: deinstall ok installed\n";
        assert!(DpkgStatus::parse(output).unwrap().is_installed());
    }

    #[test]
    fn test_dpkg_status_half_installed() {
        let output = "Status: install reinstreq half-installed\n";
        assert!(!DpkgStatus::parse(output).unwrap().is_installed());
    }

    #[test]
    fn test_dpkg_status_missing_line() {
        assert!(DpkgStatus::parse("Package: vim\n").is_none());
        assert!(DpkgStatus::parse("Status: install\n").is_none());
    }
}
