//! Progress indicators for the provisor CLI.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a single resource is applied
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Bar that never draws, for plain and quiet output
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "✓".green(), msg);
}

pub fn finish_warn(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "⚠".yellow(), msg);
}

pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    eprintln!("  {} {}", "✗".red(), msg);
}

pub fn finish_clear(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "○".dimmed(), msg.dimmed());
}
