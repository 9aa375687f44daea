use anyhow::Result;
use declarative::ExecuteOptions;

use super::Session;
use crate::Context;
use crate::engine::{ProgressMode, UiProgress, print_summary};
use crate::tasks;
use crate::ui;

/// Run a registered task against the configured host
pub fn run(ctx: &Context, task_name: &str, dry_run: bool) -> Result<()> {
    let task = tasks::resolve(task_name)?;
    let session = Session::open(ctx)?;
    let plan = (task.build)(&session.task_env())?;

    if !ctx.quiet {
        ui::header(&format!(
            "{} on {}",
            task.qualified_name(),
            session.host.name()
        ));
        ui::dim(task.about);
        if dry_run {
            ui::warn("Dry run - nothing will be changed");
        }
    }

    let mode = if ctx.quiet {
        ProgressMode::Quiet
    } else if session.interactive_sudo && plan.privileged_count() > 0 && !dry_run {
        ProgressMode::Plain
    } else {
        ProgressMode::Spinner
    };

    let opts = ExecuteOptions {
        dry_run,
        verbose: ctx.verbose > 0,
    };
    let mut progress = UiProgress::new(mode);

    match declarative::execute(plan, session.host.as_ref(), &opts, &mut progress) {
        Ok(summary) => {
            if !ctx.quiet {
                print_summary(&summary, dry_run);
            }
            Ok(())
        }
        Err(err) => {
            report_failure(&err);
            Err(err)
        }
    }
}

/// Explain package manager failures before the error chain is printed
fn report_failure(err: &anyhow::Error) {
    if let Some((headline, advice)) = failure_report(err) {
        ui::error(&headline);
        ui::dim(advice);
    }
}

/// Headline and advice for a debkit error anywhere in the chain
fn failure_report(err: &anyhow::Error) -> Option<(String, &'static str)> {
    let apt = err.chain().find_map(|e| e.downcast_ref::<debkit::Error>())?;
    let category = apt.category();
    let headline = if apt.is_installation_error() {
        format!("apt-get failed - {}: {apt}", category.description())
    } else {
        format!("{}: {apt}", category.description())
    };
    Some((headline, category.advice()))
}
