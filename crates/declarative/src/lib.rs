//! # Declarative
//!
//! A framework for declarative resource management on a host.
//!
//! This crate provides the core abstractions for declaring desired state,
//! detecting current state on a machine, and converging it to match.
//!
//! ## Core Concepts
//!
//! - **Host**: A machine reachable through some command channel
//! - **Resource**: Something on the host with state (files, packages, modes)
//! - **ResourceState**: The current or desired state of a resource
//! - **ExecutionPlan**: An ordered list of resources
//! - **Executor**: Applies a plan in order, stopping at the first failure
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, ExecutionPlan, execute_simple};
//!
//! let plan = ExecutionPlan::new()
//!     .with(PackageResource::new("git"))
//!     .with(FileResource::new("~/.gitconfig", contents));
//!
//! let summary = execute_simple(plan, &host, &ExecuteOptions::default())?;
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`Host`]: Runs commands and moves files on the target machine
//! - [`ProgressCallback`]: Receives progress updates
//!
//! This keeps the crate free of a specific transport or UI.

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, Host, NoProgress, ProgressCallback};
pub use diff::{DiffSummary, ResourceDiff, compute_diffs};
pub use executor::{execute, execute_simple};
pub use planner::ExecutionPlan;
pub use resource::{BoxedResource, Resource, ResourceExt};
pub use types::{
    ApplyResult, CommandOutput, ExecuteOptions, ExecuteSummary, ResourceState, SudoRequirement,
};
