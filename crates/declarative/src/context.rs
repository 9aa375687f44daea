//! Host and progress traits
//!
//! These traits let the declarative crate drive a machine without
//! depending on a specific transport (ssh, local shell) or UI.

use crate::types::{ApplyResult, CommandOutput};
use anyhow::Result;

/// A machine that resources are applied to
///
/// Paths are host paths as the user writes them: `~/` is the remote
/// home, relative paths are relative to the home directory.
pub trait Host: Send + Sync {
    /// Display name, e.g. `me@desk.example.org`
    fn name(&self) -> String;

    /// Run a shell command as the connecting user
    fn run(&self, command: &str) -> Result<CommandOutput>;

    /// Run a shell command with elevated privileges
    fn sudo(&self, command: &str) -> Result<CommandOutput>;

    /// Write `contents` to `path`, replacing whatever is there
    fn upload(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// Create a directory and its parents
    fn mkdir(&self, dir: &str) -> Result<()>;

    /// Read a file, `None` if it does not exist
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Run a command and return stdout, failing on non-zero exit
    fn run_checked(&self, command: &str) -> Result<String> {
        let output = self.run(command)?;
        if !output.success {
            anyhow::bail!(
                "`{}` failed on {}: {}",
                command,
                self.name(),
                output.stderr_str().trim()
            );
        }
        Ok(output.stdout_str())
    }
}

/// Progress callback for execution operations
pub trait ProgressCallback {
    /// Called once before the first resource
    fn on_plan_start(&mut self, count: usize, host: &str);

    /// Called when starting to apply a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource application completes, including failures
    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_plan_start(&mut self, _count: usize, _host: &str) {}
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _result: &ApplyResult) {}
}

/// Context passed to resource apply operations
pub struct ApplyContext<'a> {
    /// Whether this is a dry run (no mutating commands)
    pub dry_run: bool,
    /// Whether to output verbose information
    pub verbose: bool,
    /// The machine being provisioned
    pub host: &'a dyn Host,
}

impl<'a> ApplyContext<'a> {
    pub fn new(host: &'a dyn Host, dry_run: bool, verbose: bool) -> Self {
        Self {
            dry_run,
            verbose,
            host,
        }
    }
}
