//! Diff computation for resources

use crate::context::Host;
use crate::resource::{BoxedResource, Resource, ResourceExt};
use crate::types::ResourceState;
use serde::{Deserialize, Serialize};

/// A diff between current and desired state of a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Unique identifier of the resource
    pub resource_id: String,
    /// Type of the resource
    pub resource_type: String,
    /// Human-readable description
    pub description: String,
    /// Current state
    pub current: ResourceState,
    /// Desired state
    pub desired: ResourceState,
    /// Whether this resource requires sudo
    pub requires_sudo: bool,
}

impl ResourceDiff {
    /// Create a diff from a resource, returning None if no changes needed
    ///
    /// A state probe that fails is reported as [`ResourceState::Unknown`]
    /// rather than aborting the whole diff.
    pub fn from_resource(resource: &dyn Resource, host: &dyn Host) -> Option<Self> {
        let current = match resource.current_state(host) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Could not read state of {}: {e:#}", resource.id());
                ResourceState::Unknown
            }
        };
        let desired = resource.desired_state();

        if current == desired {
            return None;
        }

        Some(Self {
            resource_id: resource.id(),
            resource_type: resource.resource_type().to_string(),
            description: resource.description(),
            current,
            desired,
            requires_sudo: resource.requires_sudo(),
        })
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        matches!(
            (&self.current, &self.desired),
            (ResourceState::Absent, ResourceState::Present { .. })
        )
    }

    /// Check if this diff represents a modification
    pub fn is_modification(&self) -> bool {
        matches!(self.current, ResourceState::Modified { .. })
    }

    /// Check if the current state could not be determined
    pub fn is_unknown(&self) -> bool {
        matches!(self.current, ResourceState::Unknown)
    }
}

/// Compute diffs for a list of resources, in plan order
///
/// Returns only resources that have differences between current and desired state.
pub fn compute_diffs(resources: &[BoxedResource], host: &dyn Host) -> Vec<ResourceDiff> {
    resources
        .iter()
        .filter_map(|r| ResourceDiff::from_resource(r.as_ref(), host))
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub additions: usize,
    pub modifications: usize,
    pub unknown: usize,
    pub sudo_required: usize,
}

impl DiffSummary {
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_unknown() {
                summary.unknown += 1;
            } else {
                summary.modifications += 1;
            }
            if diff.requires_sudo {
                summary.sudo_required += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.modifications + self.unknown
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
