//! # debkit
//!
//! Debian package management over any command shell.
//!
//! This crate provides:
//! - An idempotent install: skip packages that are already installed
//! - An optional upgrade of a single package
//! - Categorized installer errors
//!
//! Commands run through a [`backend::Shell`], so the same code manages
//! packages on the local machine or on a remote host.
//!
//! ## Example
//!
//! ```ignore
//! use debkit::backend::apt::AptBackend;
//! use debkit::{Client, InstallRequest, Package};
//!
//! let client = Client::with_backend(Box::new(AptBackend::new(ssh_shell)));
//! let request = InstallRequest::new(Package::new("tmux")?).with_upgrade(true);
//! let outcome = client.install(&request)?;
//! println!("installed: {}, upgraded: {}", outcome.installed, outcome.upgraded);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{DpkgStatus, InstallOutcome, InstallRequest, Package};

use backend::Backend;

/// High-level client for package operations.
pub struct Client<'a> {
    backend: Box<dyn Backend + 'a>,
}

impl<'a> Client<'a> {
    /// Create a client over a backend.
    pub fn with_backend(backend: Box<dyn Backend + 'a>) -> Self {
        Self { backend }
    }

    /// Check if a package is installed.
    pub fn is_installed(&self, package: &Package) -> Result<bool> {
        self.backend.is_installed(package)
    }

    /// Make sure a package is installed, optionally upgrading it.
    ///
    /// The install step is skipped when the package is already present.
    /// When `request.upgrade` is set the upgrade runs unconditionally,
    /// including right after a fresh install.
    pub fn install(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        let package = &request.package;
        let mut outcome = InstallOutcome::default();

        if self.backend.is_installed(package)? {
            log::info!("{package} is already installed");
        } else {
            log::info!("Installing {package}");
            self.backend.install(package)?;
            outcome.installed = true;
        }

        if request.upgrade {
            log::info!("Upgrading {package}");
            self.backend.upgrade(package)?;
            outcome.upgraded = true;
        }

        Ok(outcome)
    }
}
