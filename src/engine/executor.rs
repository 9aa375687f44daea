//! Execution UI - renders declarative progress events for the terminal

use colored::Colorize;
use declarative::{ApplyResult, ExecuteSummary, ProgressCallback};
use indicatif::ProgressBar;

use crate::progress;
use crate::ui;

/// How resource progress is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Animated spinner per resource
    Spinner,
    /// One static line per resource; leaves the terminal free for sudo prompts
    Plain,
    /// Failures only
    Quiet,
}

/// Progress callback that prints one line per resource
pub struct UiProgress {
    mode: ProgressMode,
    /// Spinner and label of the resource being applied
    current: Option<(ProgressBar, String)>,
    step: usize,
    total: usize,
}

impl UiProgress {
    pub fn new(mode: ProgressMode) -> Self {
        Self {
            mode,
            current: None,
            step: 0,
            total: 0,
        }
    }

    fn label(&self, text: &str) -> String {
        format!("[{}/{}] {}", self.step, self.total, text)
    }
}

impl ProgressCallback for UiProgress {
    fn on_plan_start(&mut self, count: usize, host: &str) {
        self.total = count;
        if self.mode != ProgressMode::Quiet {
            println!();
            println!(
                "  {} Applying {} to {}",
                "→".cyan(),
                ui::plural(count, "resource"),
                host.bold()
            );
        }
    }

    fn on_resource_start(&mut self, _id: &str, description: &str) {
        self.step += 1;
        let label = self.label(description);
        let pb = match self.mode {
            ProgressMode::Spinner => progress::spinner(&label),
            ProgressMode::Plain => {
                println!("  {} {}", "→".cyan(), label);
                progress::hidden()
            }
            ProgressMode::Quiet => progress::hidden(),
        };
        self.current = Some((pb, label));
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        let (pb, label) = self
            .current
            .take()
            .unwrap_or_else(|| (progress::hidden(), self.label(id)));
        if self.mode == ProgressMode::Quiet && !matches!(result, ApplyResult::Failed { .. }) {
            pb.finish_and_clear();
            return;
        }
        match result {
            ApplyResult::Created | ApplyResult::Modified => progress::finish_success(&pb, &label),
            ApplyResult::NoChange => {
                progress::finish_clear(&pb, &format!("{label} (already up to date)"));
            }
            ApplyResult::Skipped { reason } => {
                progress::finish_warn(&pb, &format!("{label} ({reason})"));
            }
            ApplyResult::Failed { error } => {
                progress::finish_error(&pb, &format!("{label}: {error}"));
            }
        }
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary, dry_run: bool) {
    println!();
    if dry_run {
        ui::info(&format!(
            "Dry run - {} would be applied, no changes made",
            ui::plural(summary.total(), "resource")
        ));
        return;
    }

    // Only reached after a clean pass
    println!("  {} Provisioning complete", "✓".green().bold());
    for line in summary_lines(summary) {
        println!("    • {line}");
    }
}

fn summary_lines(summary: &ExecuteSummary) -> Vec<String> {
    [
        (summary.created, "created"),
        (summary.modified, "updated"),
        (summary.no_change, "already up to date"),
        (summary.skipped, "skipped"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, what)| format!("{} {what}", ui::plural(count, "resource")))
    .collect()
}
