//! Diff display - provisor-specific UI

use colored::Colorize;
use declarative::{DiffSummary, ResourceDiff, ResourceState};

use crate::ui;

/// Section title for a resource type
fn type_name(resource_type: &str) -> &str {
    match resource_type {
        "deb_package" => "Packages (apt)",
        "template_file" => "Files",
        "remote_command" => "Commands",
        other => other,
    }
}

fn symbol(diff: &ResourceDiff) -> colored::ColoredString {
    match (&diff.current, &diff.desired) {
        (ResourceState::Absent, ResourceState::Present { .. }) => "+".green(),
        (ResourceState::Present { .. }, ResourceState::Absent) => "-".red(),
        (ResourceState::Unknown, _) => "?".dimmed(),
        _ => "~".yellow(),
    }
}

fn state_desc(diff: &ResourceDiff) -> String {
    match (&diff.current, &diff.desired) {
        (ResourceState::Absent, ResourceState::Present { details }) => format!(
            "(missing){}",
            details
                .as_ref()
                .map(|d| format!(" → {d}"))
                .unwrap_or_default()
        ),
        (ResourceState::Present { details: from }, ResourceState::Present { details: to }) => {
            format!(
                "{} → {}",
                from.as_deref().unwrap_or("current"),
                to.as_deref().unwrap_or("desired")
            )
        }
        (ResourceState::Modified { from, to }, _) => format!("{from} → {to}"),
        (ResourceState::Unknown, _) => "(will run)".to_string(),
        _ => String::new(),
    }
}

/// Display a list of diffs grouped by resource type, in plan order
pub fn display_diff(diffs: &[ResourceDiff]) {
    if diffs.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    let mut groups: Vec<(&str, Vec<&ResourceDiff>)> = Vec::new();
    for diff in diffs {
        match groups.iter().position(|(t, _)| *t == diff.resource_type) {
            Some(i) => groups[i].1.push(diff),
            None => groups.push((diff.resource_type.as_str(), vec![diff])),
        }
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Provisioning Diff".bold()
    );
    println!("│");

    for (resource_type, members) in &groups {
        println!("│ {}", type_name(resource_type).bold());
        for diff in members {
            let sudo_indicator = if diff.requires_sudo {
                " [sudo]".red().to_string()
            } else {
                String::new()
            };
            println!(
                "│   {} {:<30} {}{}",
                symbol(diff),
                ui::truncate(&diff.resource_id, 30),
                state_desc(diff).dimmed(),
                sudo_indicator
            );
        }
        println!("│");
    }

    let summary = DiffSummary::from_diffs(diffs);
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} new, {} changed, {} unknown, {} require sudo)",
        summary.total().to_string().bold(),
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.unknown,
        summary.sudo_required.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}
