use anyhow::{Context, Result};
use declarative::{CommandOutput, Host};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// This machine, driven through `sh -c`
///
/// Host paths resolve against `home`: `~/x` and `x` both mean `home/x`.
#[derive(Debug, Clone)]
pub struct LocalHost {
    home: PathBuf,
}

impl LocalHost {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::with_home(home))
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Local filesystem path for a host path
    pub fn resolve(&self, path: &str) -> PathBuf {
        if path == "~" {
            return self.home.clone();
        }
        match path.strip_prefix("~/") {
            Some(rest) => self.home.join(rest),
            None if Path::new(path).is_absolute() => PathBuf::from(path),
            None => self.home.join(path),
        }
    }

    fn shell(&self, program: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).env("HOME", &self.home).current_dir(&self.home);
        cmd
    }
}

impl Host for LocalHost {
    fn name(&self) -> String {
        "localhost".to_string()
    }

    fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("[localhost] {}", command);
        let output = self
            .shell("sh", &["-c", command])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute: sh -c {command}"))?;
        Ok(output.into())
    }

    fn sudo(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("[localhost] sudo {}", command);
        // sudo prompts on the terminal, output is still captured
        let output = self
            .shell("sudo", &["--", "sh", "-c", command])
            .stdin(Stdio::inherit())
            .output()
            .with_context(|| format!("Failed to execute: sudo sh -c {command}"))?;
        Ok(output.into())
    }

    fn upload(&self, path: &str, contents: &[u8]) -> Result<()> {
        let local = self.resolve(path);
        log::debug!("[localhost] write {} ({} bytes)", local.display(), contents.len());
        std::fs::write(&local, contents)
            .with_context(|| format!("Failed to write {}", local.display()))
    }

    fn mkdir(&self, dir: &str) -> Result<()> {
        let local = self.resolve(dir);
        log::debug!("[localhost] mkdir -p {}", local.display());
        std::fs::create_dir_all(&local)
            .with_context(|| format!("Failed to create {}", local.display()))
    }

    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let local = self.resolve(path);
        match std::fs::read(&local) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", local.display())),
        }
    }
}
