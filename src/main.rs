mod cli;
mod commands;
mod config;
mod engine;
mod host;
mod paths;
mod progress;
mod resource;
mod tasks;
mod template;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Host override, `[user@]host[:port]`
    pub host: Option<String>,
    pub local: bool,
    pub templates: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        host: cli.host,
        local: cli.local,
        templates: cli.templates,
    };

    match cli.command {
        Command::Install(args) => commands::run::run(&ctx, "rxvt.install", args.dry_run),
        Command::Run { task, apply } => commands::run::run(&ctx, &task, apply.dry_run),
        Command::Status { task } => commands::status::run(&ctx, &task),
        Command::Tasks => commands::tasks::list(),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "provisor", &mut io::stdout());
            Ok(())
        }
    }
}
