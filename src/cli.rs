use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "provisor")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Provision a host over ssh: packages, dotfiles, permissions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/provisor/config.toml)
    #[arg(long, global = true, env = "PROVISOR_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to provision, as [user@]host[:port]
    #[arg(short = 'H', long, global = true, env = "PROVISOR_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Provision this machine; any configured host is ignored
    #[arg(long, global = true)]
    pub local: bool,

    /// Template directory (default: templates/ next to the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install rxvt-unicode and upload its config (same as `run rxvt.install`)
    Install(ApplyArgs),

    /// Run a registered task
    Run {
        /// Task name, e.g. rxvt.install
        task: String,

        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Show what a task would change on the host
    Status {
        /// Task name, e.g. rxvt.install
        task: String,
    },

    /// List registered tasks
    Tasks,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ApplyArgs {
    /// Show the steps without running anything on the host
    #[arg(long)]
    pub dry_run: bool,
}
