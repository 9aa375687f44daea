//! Command channels to the machine being provisioned
//!
//! [`SshHost`] drives the system `ssh` client; [`LocalHost`] runs the same
//! operations on this machine. Both implement [`declarative::Host`].

pub mod local;
#[cfg(test)]
pub mod mock;
pub mod ssh;

use anyhow::{Context, Result, bail};
use declarative::{CommandOutput, Host};
use debkit::backend::{Shell, ShellOutput};
use std::fmt;
use std::str::FromStr;

use crate::config::HostSettings;
use crate::paths;

pub use local::LocalHost;
pub use ssh::SshHost;

/// Exit status the remote `read` helper uses for a missing file
pub(crate) const MISSING_FILE_CODE: i32 = 100;

// ============================================================================
// Target
// ============================================================================

/// `[user@]address[:port]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub address: String,
    pub user: Option<String>,
    pub port: Option<u16>,
}

impl HostTarget {
    /// Destination argument for ssh, `user@address` or `address`
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.address),
            None => self.address.clone(),
        }
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.destination())?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl FromStr for HostTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (user, rest) = match s.rsplit_once('@') {
            Some((user, rest)) => {
                if user.is_empty() {
                    bail!("Empty user in host '{}'", s);
                }
                (Some(user.to_string()), rest)
            }
            None => (None, s),
        };

        let (address, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            // [::1]:2222
            let (address, after) = bracketed
                .split_once(']')
                .with_context(|| format!("Unclosed '[' in host '{}'", s))?;
            let port = match after {
                "" => None,
                p => Some(parse_port(p.strip_prefix(':').unwrap_or(p), s)?),
            };
            (address, port)
        } else if rest.matches(':').count() == 1 {
            let (address, port) = rest.split_once(':').unwrap_or((rest, ""));
            (address, Some(parse_port(port, s)?))
        } else {
            (rest, None)
        };

        if address.is_empty() {
            bail!("Empty address in host '{}'", s);
        }

        Ok(Self {
            address: address.to_string(),
            user,
            port,
        })
    }
}

fn parse_port(port: &str, host: &str) -> Result<u16> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => bail!("Invalid port '{}' in host '{}'", port, host),
        Ok(port) => Ok(port),
    }
}

// ============================================================================
// Remote shell quoting
// ============================================================================

fn is_safe_word(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c))
}

/// Single-quote a word for a POSIX shell
pub fn quote(s: &str) -> String {
    if is_safe_word(s) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Path as a shell word, keeping a leading `~/` unquoted so the remote
/// shell expands it
pub fn shell_path(path: &str) -> String {
    if path == "~" {
        return path.to_string();
    }
    match path.strip_prefix("~/") {
        Some("") => "~/".to_string(),
        Some(rest) => format!("~/{}", quote(rest)),
        None => quote(path),
    }
}

/// Directory part of a host path, `None` for a bare file name
pub fn parent_dir(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some(("", _)) => Some("/"),
        Some((dir, _)) => Some(dir),
        None => None,
    }
}

/// Wrap a command for sudo; `-n` fails instead of prompting
pub fn sudo_wrap(command: &str, interactive: bool) -> String {
    let flags = if interactive { "" } else { "-n " };
    format!("sudo {}-- sh -c {}", flags, quote(command))
}

// ============================================================================
// Shell adapter for debkit
// ============================================================================

/// Lets debkit drive packages through any [`Host`]
pub struct HostShell<'a>(pub &'a dyn Host);

fn shell_output(output: CommandOutput) -> ShellOutput {
    ShellOutput {
        stdout: output.stdout_str(),
        stderr: output.stderr_str(),
        success: output.success,
    }
}

impl Shell for HostShell<'_> {
    fn run(&self, command: &str) -> debkit::Result<ShellOutput> {
        self.0
            .run(command)
            .map(shell_output)
            .map_err(|e| debkit::Error::Transport(format!("{e:#}")))
    }

    fn sudo(&self, command: &str) -> debkit::Result<ShellOutput> {
        self.0
            .sudo(command)
            .map(shell_output)
            .map_err(|e| debkit::Error::Transport(format!("{e:#}")))
    }
}

// ============================================================================
// Connect
// ============================================================================

/// Open the host named by the settings, or this machine when `local`
pub fn connect(settings: &HostSettings, local: bool) -> Result<Box<dyn Host>> {
    if local {
        let host = LocalHost::new()?;
        log::debug!("Provisioning local machine as {}", host.name());
        return Ok(Box::new(host));
    }

    let address = settings
        .address
        .as_deref()
        .context("No host given. Use --host, PROVISOR_HOST or [host] address, or --local")?;
    let mut target: HostTarget = address.parse()?;
    if target.user.is_none() {
        target.user.clone_from(&settings.user);
    }
    if target.port.is_none() {
        target.port = settings.port;
    }

    let mut host = SshHost::new(target).with_interactive_sudo(settings.interactive_sudo);
    if let Some(identity) = &settings.identity_file {
        host = host.with_identity_file(paths::expand(identity));
    }
    for option in &settings.ssh_options {
        host = host.with_option(option);
    }
    log::debug!("Provisioning {} over ssh", host.name());
    Ok(Box::new(host))
}
