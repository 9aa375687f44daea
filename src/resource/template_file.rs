//! Rendered template uploaded to a host path

use anyhow::{Context, Result};
use std::sync::Arc;

use super::{ApplyContext, ApplyResult, Host, Resource, ResourceState};
use crate::host::{parent_dir, shell_path};
use crate::template::Templates;

/// A local template rendered and written to `destination` on the host
///
/// Rendering happens at apply time, so a broken template fails only when
/// its turn comes. The upload always overwrites, after copying any
/// existing file to `<destination>.bak` unless backups are turned off.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    templates: Arc<Templates>,
    pub template: String,
    pub destination: String,
    /// Create the destination's directory first
    pub mkdir: bool,
    /// Keep the previous file as `<destination>.bak`
    pub backup: bool,
}

impl TemplateFile {
    pub fn new(templates: Arc<Templates>, template: &str, destination: &str) -> Self {
        Self {
            templates,
            template: template.to_string(),
            destination: destination.to_string(),
            mkdir: false,
            backup: true,
        }
    }

    pub fn with_mkdir(mut self) -> Self {
        self.mkdir = true;
        self
    }

    /// `.Xresources` for `~/.Xresources`
    pub fn file_name(&self) -> &str {
        self.destination
            .rsplit('/')
            .next()
            .unwrap_or(&self.destination)
    }
}

/// Copies `path` to `path.bak` when it exists, succeeds when it does not
pub fn backup_command(path: &str) -> String {
    let backup = format!("{path}.bak");
    format!(
        "test ! -e {} || cp {} {}",
        shell_path(path),
        shell_path(path),
        shell_path(&backup)
    )
}

impl Resource for TemplateFile {
    fn id(&self) -> String {
        self.destination.clone()
    }

    fn description(&self) -> String {
        format!("Uploading {}...", self.file_name())
    }

    fn resource_type(&self) -> &'static str {
        "template_file"
    }

    fn current_state(&self, host: &dyn Host) -> Result<ResourceState> {
        let Some(remote) = host.read(&self.destination)? else {
            return Ok(ResourceState::Absent);
        };
        let rendered = self.templates.render(&self.template)?;
        if remote == rendered {
            Ok(ResourceState::present())
        } else {
            Ok(ResourceState::Modified {
                from: format!("{} bytes", remote.len()),
                to: format!("{} bytes", rendered.len()),
            })
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

        let contents = self.templates.render(&self.template)?;

        if self.mkdir
            && let Some(dir) = parent_dir(&self.destination)
        {
            ctx.host
                .mkdir(dir)
                .with_context(|| format!("Failed to create {} on {}", dir, ctx.host.name()))?;
        }

        if self.backup {
            ctx.host
                .run_checked(&backup_command(&self.destination))
                .with_context(|| format!("Failed to back up {}", self.destination))?;
        }

        ctx.host
            .upload(&self.destination, &contents)
            .with_context(|| format!("Failed to upload {}", self.template))?;
        log::info!(
            "Uploaded {} to {} ({} bytes)",
            self.template,
            self.destination,
            contents.len()
        );

        Ok(ApplyResult::Modified)
    }
}
