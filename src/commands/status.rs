use anyhow::Result;
use declarative::{DiffSummary, compute_diffs};

use super::Session;
use crate::Context;
use crate::engine::display_diff;
use crate::progress;
use crate::tasks;
use crate::ui;

/// Show what a task would change, without changing anything
pub fn run(ctx: &Context, task_name: &str) -> Result<()> {
    let task = tasks::resolve(task_name)?;
    let session = Session::open(ctx)?;
    let plan = (task.build)(&session.task_env())?;

    ui::header(&format!(
        "{} on {}",
        task.qualified_name(),
        session.host.name()
    ));
    ui::kv("Templates", &session.templates.dir().display().to_string());

    let pb = if ctx.quiet {
        progress::hidden()
    } else {
        progress::spinner("Reading host state...")
    };
    let diffs = compute_diffs(plan.steps(), session.host.as_ref());
    pb.finish_and_clear();

    display_diff(&diffs);

    let summary = DiffSummary::from_diffs(&diffs);
    if summary.unknown > 0 {
        ui::warn(&format!(
            "{} could not be checked; `provisor -v status` shows why",
            ui::plural(summary.unknown, "resource")
        ));
    }
    Ok(())
}
