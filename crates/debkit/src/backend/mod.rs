//! Backend abstraction for package operations.
//!
//! The [`Backend`] trait is the package-state oracle plus installer,
//! allowing for different implementations (apt over a [`Shell`], mocks
//! for testing).

pub mod apt;

use crate::error::Result;
use crate::types::Package;

/// Output of a command run through a [`Shell`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Whether the command exited zero
    pub success: bool,
}

/// A command channel to the machine whose packages are managed.
///
/// Errors from these methods mean the command could not be run at all;
/// a command that ran and exited non-zero is reported through
/// [`ShellOutput::success`].
pub trait Shell {
    /// Run a command as the connecting user.
    fn run(&self, command: &str) -> Result<ShellOutput>;

    /// Run a command with elevated privileges.
    fn sudo(&self, command: &str) -> Result<ShellOutput>;
}

impl<S: Shell + ?Sized> Shell for &S {
    fn run(&self, command: &str) -> Result<ShellOutput> {
        (**self).run(command)
    }

    fn sudo(&self, command: &str) -> Result<ShellOutput> {
        (**self).sudo(command)
    }
}

/// Backend trait for package operations.
pub trait Backend {
    /// Check if a package is installed.
    fn is_installed(&self, package: &Package) -> Result<bool>;

    /// Install a package.
    fn install(&self, package: &Package) -> Result<()>;

    /// Upgrade an installed package if a newer version is available.
    fn upgrade(&self, package: &Package) -> Result<()>;
}
