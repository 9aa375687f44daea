use anyhow::Result;
use colored::Colorize;

use crate::tasks;
use crate::ui;

/// List registered tasks
pub fn list() -> Result<()> {
    ui::header("Tasks");
    for task in tasks::all() {
        let name = format!("{:<20}", task.qualified_name());
        println!("  {} {}", name.bold(), task.about.dimmed());
    }
    println!();
    ui::info("Run one with `provisor run <task>`; a bare name works when unambiguous");
    Ok(())
}
