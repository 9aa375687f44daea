//! apt/dpkg backend that runs commands through a [`Shell`].

use crate::backend::{Backend, Shell, ShellOutput};
use crate::error::{Error, Result};
use crate::types::{DpkgStatus, Package};

/// State query command.
pub fn status_command(package: &Package) -> String {
    format!("dpkg -s {package}")
}

/// Non-interactive install command.
pub fn install_command(package: &Package) -> String {
    format!("DEBIAN_FRONTEND=noninteractive apt-get install --quiet --assume-yes {package}")
}

/// Upgrade command, only touches an already installed package.
pub fn upgrade_command(package: &Package) -> String {
    format!("apt-get install --only-upgrade {package}")
}

/// Backend that drives `dpkg` and `apt-get` on the shell's machine.
pub struct AptBackend<S> {
    shell: S,
}

impl<S: Shell> AptBackend<S> {
    /// Create a backend over a shell.
    pub fn new(shell: S) -> Self {
        Self { shell }
    }

    fn sudo_checked(&self, command: &str, package: &Package, action: &str) -> Result<ShellOutput> {
        log::debug!("sudo {command}");
        let output = self.shell.sudo(command)?;
        if !output.success {
            return Err(Error::from_apt_output(&output.stderr, package.name(), action));
        }
        Ok(output)
    }
}

impl<S: Shell> Backend for AptBackend<S> {
    fn is_installed(&self, package: &Package) -> Result<bool> {
        let output = self.shell.run(&status_command(package))?;

        // dpkg -s exits 1 for packages it has never heard of
        if !output.success {
            return Ok(false);
        }

        Ok(DpkgStatus::parse(&output.stdout).is_some_and(|s| s.is_installed()))
    }

    fn install(&self, package: &Package) -> Result<()> {
        self.sudo_checked(&install_command(package), package, "install")?;
        Ok(())
    }

    fn upgrade(&self, package: &Package) -> Result<()> {
        self.sudo_checked(&upgrade_command(package), package, "upgrade")?;
        Ok(())
    }
}
