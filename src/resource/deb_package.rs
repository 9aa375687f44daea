//! Debian package resource

use anyhow::Result;
use debkit::backend::apt::AptBackend;
use debkit::{Client, InstallRequest, Package};

use super::{ApplyContext, ApplyResult, Host, Resource, ResourceState, SudoRequirement};
use crate::host::HostShell;

/// A Debian package that must be installed, optionally upgraded
#[derive(Debug, Clone)]
pub struct DebPackage {
    pub package: Package,
    pub upgrade: bool,
}

impl DebPackage {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            package: Package::new(name)?,
            upgrade: false,
        })
    }

    pub fn with_upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }

    fn client(host: &dyn Host) -> Client<'_> {
        Client::with_backend(Box::new(AptBackend::new(HostShell(host))))
    }
}

impl Resource for DebPackage {
    fn id(&self) -> String {
        self.package.name().to_string()
    }

    fn description(&self) -> String {
        if self.upgrade {
            format!("Install and upgrade {} via apt", self.package)
        } else {
            format!("Install {} via apt", self.package)
        }
    }

    fn resource_type(&self) -> &'static str {
        "deb_package"
    }

    fn sudo_requirement(&self) -> SudoRequirement {
        SudoRequirement::Required {
            reason: format!("apt-get needs root to install {}", self.package),
        }
    }

    fn current_state(&self, host: &dyn Host) -> Result<ResourceState> {
        if Self::client(host).is_installed(&self.package)? {
            Ok(ResourceState::present())
        } else {
            Ok(ResourceState::Absent)
        }
    }

    fn desired_state(&self) -> ResourceState {
        // The upgrade always runs, so an installed package still differs
        if self.upgrade {
            ResourceState::Present {
                details: Some("upgraded".to_string()),
            }
        } else {
            ResourceState::present()
        }
    }

    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "Dry run".to_string(),
            });
        }

        let request = InstallRequest::new(self.package.clone()).with_upgrade(self.upgrade);
        let outcome = Self::client(ctx.host).install(&request)?;

        Ok(if outcome.installed {
            ApplyResult::Created
        } else if outcome.upgraded {
            ApplyResult::Modified
        } else {
            ApplyResult::NoChange
        })
    }
}
