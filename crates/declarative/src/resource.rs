//! Resource trait for declarative state management
//!
//! A Resource represents something on a host that can be in a certain
//! state, and can be changed to reach a desired state.

use crate::context::{ApplyContext, Host};
use crate::types::{ApplyResult, ResourceState, SudoRequirement};
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Every resource provides:
/// - Identity (id, description, type)
/// - State detection against a host (current vs desired)
/// - State convergence (apply)
/// - Privilege requirements
///
/// # Example
///
/// ```ignore
/// use declarative::{ApplyContext, ApplyResult, Host, Resource, ResourceState};
///
/// #[derive(Debug)]
/// struct Motd {
///     text: String,
/// }
///
/// impl Resource for Motd {
///     fn id(&self) -> String {
///         "/etc/motd".into()
///     }
///
///     fn description(&self) -> String {
///         "Write the message of the day".into()
///     }
///
///     fn resource_type(&self) -> &'static str {
///         "file"
///     }
///
///     fn current_state(&self, host: &dyn Host) -> anyhow::Result<ResourceState> {
///         match host.read("/etc/motd")? {
///             Some(bytes) if bytes == self.text.as_bytes() => Ok(ResourceState::present()),
///             Some(_) => Ok(ResourceState::Modified { from: "old".into(), to: "new".into() }),
///             None => Ok(ResourceState::Absent),
///         }
///     }
///
///     fn desired_state(&self) -> ResourceState {
///         ResourceState::present()
///     }
///
///     fn apply(&self, ctx: &mut ApplyContext) -> anyhow::Result<ApplyResult> {
///         if ctx.dry_run {
///             return Ok(ApplyResult::Skipped { reason: "Dry run".into() });
///         }
///         ctx.host.upload("/etc/motd", self.text.as_bytes())?;
///         Ok(ApplyResult::Modified)
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Unique identifier for this resource within a plan
    ///
    /// Examples:
    /// - "rxvt-unicode-256color" for a deb package
    /// - "~/.Xresources" for an uploaded template
    fn id(&self) -> String;

    /// Human-readable description, shown when the resource starts applying
    fn description(&self) -> String;

    /// Resource type category
    ///
    /// Used for grouping in status output. Examples:
    /// - "deb_package"
    /// - "template_file"
    /// - "remote_command"
    fn resource_type(&self) -> &'static str;

    /// Whether applying runs privileged commands
    fn sudo_requirement(&self) -> SudoRequirement {
        SudoRequirement::None
    }

    /// Detect the current state of this resource on `host`
    ///
    /// Must only run read-only commands.
    fn current_state(&self, host: &dyn Host) -> Result<ResourceState>;

    /// Get the desired state for this resource
    fn desired_state(&self) -> ResourceState;

    /// Check if the resource needs changes to reach desired state
    fn needs_apply(&self, host: &dyn Host) -> Result<bool> {
        let current = self.current_state(host)?;
        Ok(current != self.desired_state())
    }

    /// Apply changes to reach the desired state
    ///
    /// Implementations respect `ctx.dry_run` by returning `Skipped`
    /// without running mutating commands. Whether an already converged
    /// resource is re-applied is up to the resource: packages are
    /// skipped, uploads always overwrite.
    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;

/// Extension trait for working with boxed resources
pub trait ResourceExt {
    /// Check if the resource requires sudo based on its requirement
    fn requires_sudo(&self) -> bool;
}

impl<R: Resource + ?Sized> ResourceExt for R {
    fn requires_sudo(&self) -> bool {
        matches!(self.sudo_requirement(), SudoRequirement::Required { .. })
    }
}
