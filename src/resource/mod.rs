//! Resources provisor knows how to converge
//!
//! The trait and state vocabulary live in the `declarative` crate; this
//! module holds the concrete resources tasks are built from.

mod deb_package;
mod remote_command;
mod template_file;

pub use declarative::{
    ApplyContext, ApplyResult, Host, Resource, ResourceState, SudoRequirement,
};

pub use deb_package::DebPackage;
pub use remote_command::RemoteCommand;
pub use template_file::TemplateFile;
