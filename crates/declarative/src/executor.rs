//! Execution engine - applies a plan in order, stopping at the first failure

use crate::context::{ApplyContext, Host, NoProgress, ProgressCallback};
use crate::planner::ExecutionPlan;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;

/// Execute a plan against a host
///
/// Resources are applied one at a time in plan order. The first resource
/// that fails is reported to `progress` as [`ApplyResult::Failed`] and its
/// error is returned; later resources are never applied and earlier ones
/// are not rolled back.
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `host` - The machine to apply it to
/// * `opts` - Execution options (dry_run, verbose)
/// * `progress` - Progress callback
pub fn execute<P>(
    plan: ExecutionPlan,
    host: &dyn Host,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
{
    let mut summary = ExecuteSummary::default();
    if plan.is_empty() {
        return Ok(summary);
    }

    progress.on_plan_start(plan.len(), &host.name());

    let mut ctx = ApplyContext::new(host, opts.dry_run, opts.verbose);
    for resource in plan {
        let id = resource.id();
        progress.on_resource_start(&id, &resource.description());
        log::debug!("Applying {} ({})", id, resource.resource_type());

        match resource.apply(&mut ctx) {
            Ok(result) => {
                log::debug!("{id}: {result:?}");
                progress.on_resource_complete(&id, &result);
                summary.add_result(&result);
            }
            Err(e) => {
                let failed = ApplyResult::Failed {
                    error: format!("{e:#}"),
                };
                progress.on_resource_complete(&id, &failed);
                return Err(e.context(format!("Failed to apply {id}")));
            }
        }
    }

    Ok(summary)
}

/// Simple execution without progress reporting
pub fn execute_simple(
    plan: ExecutionPlan,
    host: &dyn Host,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    execute(plan, host, opts, &mut NoProgress)
}
