//! One-off shell command on the host

use anyhow::{Result, bail};

use super::{ApplyContext, ApplyResult, Host, Resource, ResourceState, SudoRequirement};
use crate::host::shell_path;

/// A command run on the host, with an optional read-only check that
/// tells whether it has already taken effect
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    pub command: String,
    /// Exits zero when the command's effect is already in place
    pub check: Option<String>,
    pub sudo: bool,
}

impl RemoteCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            check: None,
            sudo: false,
        }
    }

    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// `chmod +x <path>`, checked with `test -x`
    pub fn make_executable(path: &str) -> Self {
        let path = shell_path(path);
        Self::new(format!("chmod +x {path}")).with_check(format!("test -x {path}"))
    }
}

impl Resource for RemoteCommand {
    fn id(&self) -> String {
        self.command.clone()
    }

    fn description(&self) -> String {
        format!("Running {}", self.command)
    }

    fn resource_type(&self) -> &'static str {
        "remote_command"
    }

    fn sudo_requirement(&self) -> SudoRequirement {
        if self.sudo {
            SudoRequirement::Required {
                reason: format!("{} runs as root", self.command),
            }
        } else {
            SudoRequirement::None
        }
    }

    fn current_state(&self, host: &dyn Host) -> Result<ResourceState> {
        let Some(check) = &self.check else {
            return Ok(ResourceState::Unknown);
        };
        if host.run(check)?.success {
            Ok(ResourceState::present())
        } else {
            Ok(ResourceState::Absent)
        }
    }

    fn desired_state(&self) -> ResourceState {
        ResourceState::present()
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "Dry run".to_string(),
            });
        }

        // Always runs; the check only feeds status
        let output = if self.sudo {
            ctx.host.sudo(&self.command)?
        } else {
            ctx.host.run(&self.command)?
        };

        if !output.success {
            bail!(
                "`{}` failed on {}: {}",
                self.command,
                ctx.host.name(),
                output.stderr_str().trim()
            );
        }

        Ok(ApplyResult::Modified)
    }
}
