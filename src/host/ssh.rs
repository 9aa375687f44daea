use anyhow::{Context, Result, bail};
use declarative::{CommandOutput, Host};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::{HostTarget, MISSING_FILE_CODE, shell_path, sudo_wrap};

/// ssh exits 255 when the connection itself failed
const SSH_ERROR_CODE: i32 = 255;

/// Remote side of an upload, file contents arrive on stdin
fn upload_command(path: &str) -> String {
    format!("cat > {}", shell_path(path))
}

fn mkdir_command(dir: &str) -> String {
    format!("mkdir -p {}", shell_path(dir))
}

/// Exits `MISSING_FILE_CODE` when the file is absent
fn read_command(path: &str) -> String {
    let path = shell_path(path);
    format!("test -e {path} || exit {MISSING_FILE_CODE}; cat {path}")
}

/// A remote machine reached through the system `ssh` client
#[derive(Debug, Clone)]
pub struct SshHost {
    target: HostTarget,
    identity_file: Option<PathBuf>,
    options: Vec<String>,
    interactive_sudo: bool,
}

impl SshHost {
    pub fn new(target: HostTarget) -> Self {
        Self {
            target,
            identity_file: None,
            options: Vec::new(),
            interactive_sudo: true,
        }
    }

    pub fn with_identity_file(mut self, path: PathBuf) -> Self {
        self.identity_file = Some(path);
        self
    }

    /// Extra `-o Key=Value` option
    pub fn with_option(mut self, option: &str) -> Self {
        self.options.push(option.to_string());
        self
    }

    pub fn with_interactive_sudo(mut self, interactive: bool) -> Self {
        self.interactive_sudo = interactive;
        self
    }

    /// Arguments before the remote command
    fn ssh_args(&self, tty: bool) -> Vec<String> {
        let mut args = Vec::new();
        args.push(if tty { "-t" } else { "-T" }.to_string());
        if let Some(port) = self.target.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        for option in &self.options {
            args.push("-o".to_string());
            args.push(option.clone());
        }
        args.push("--".to_string());
        args.push(self.target.destination());
        args
    }

    fn command(&self, tty: bool, remote: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(self.ssh_args(tty)).arg(remote);
        cmd
    }

    fn check_connection(&self, output: &CommandOutput) -> Result<()> {
        if output.code == Some(SSH_ERROR_CODE) {
            bail!(
                "ssh connection to {} failed: {}",
                self.target,
                output.stderr_str().trim()
            );
        }
        Ok(())
    }

    fn read_output(&self, path: &str, output: CommandOutput) -> Result<Option<Vec<u8>>> {
        match output.code {
            Some(MISSING_FILE_CODE) => Ok(None),
            _ if output.success => Ok(Some(output.stdout)),
            _ => bail!(
                "Could not read {} on {}: {}",
                path,
                self.target,
                output.stderr_str().trim()
            ),
        }
    }

    fn capture(&self, remote: &str) -> Result<CommandOutput> {
        log::debug!("[{}] {}", self.target, remote);
        let output = self
            .command(false, remote)
            .stdin(Stdio::null())
            .output()
            .context("Failed to execute ssh")?;
        let output = CommandOutput::from(output);
        self.check_connection(&output)?;
        Ok(output)
    }
}

impl Host for SshHost {
    fn name(&self) -> String {
        self.target.to_string()
    }

    fn run(&self, command: &str) -> Result<CommandOutput> {
        self.capture(command)
    }

    fn sudo(&self, command: &str) -> Result<CommandOutput> {
        if !self.interactive_sudo {
            return self.capture(&sudo_wrap(command, false));
        }

        // A terminal lets sudo prompt; output goes straight to the user
        let remote = sudo_wrap(command, true);
        log::debug!("[{}] {}", self.target, remote);
        let status = self
            .command(true, &remote)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .context("Failed to execute ssh")?;

        let output = CommandOutput {
            stdout: Vec::new(),
            stderr: Vec::new(),
            success: status.success(),
            code: status.code(),
        };
        self.check_connection(&output)?;
        Ok(output)
    }

    fn upload(&self, path: &str, contents: &[u8]) -> Result<()> {
        let remote = upload_command(path);
        log::debug!("[{}] {} ({} bytes)", self.target, remote, contents.len());

        let mut child = self
            .command(false, &remote)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to execute ssh")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(contents)
                .with_context(|| format!("Failed to send {} to {}", path, self.target))?;
        }

        let output = CommandOutput::from(child.wait_with_output()?);
        self.check_connection(&output)?;
        if !output.success {
            bail!(
                "Upload of {} to {} failed: {}",
                path,
                self.target,
                output.stderr_str().trim()
            );
        }
        Ok(())
    }

    fn mkdir(&self, dir: &str) -> Result<()> {
        self.run_checked(&mkdir_command(dir))?;
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let output = self.capture(&read_command(path))?;
        self.read_output(path, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> HostTarget {
        "me@desk:2222".parse().unwrap()
    }

    #[test]
    fn test_ssh_args_minimal() {
        let host = SshHost::new("desk".parse().unwrap());
        assert_eq!(host.ssh_args(false), ["-T", "--", "desk"]);
        assert_eq!(host.ssh_args(true), ["-t", "--", "desk"]);
    }

    #[test]
    fn test_ssh_args_full() {
        let host = SshHost::new(target())
            .with_identity_file(PathBuf::from("/keys/id_ed25519"))
            .with_option("StrictHostKeyChecking=accept-new")
            .with_option("ConnectTimeout=10");

        assert_eq!(
            host.ssh_args(false),
            [
                "-T",
                "-p",
                "2222",
                "-i",
                "/keys/id_ed25519",
                "-o",
                "StrictHostKeyChecking=accept-new",
                "-o",
                "ConnectTimeout=10",
                "--",
                "me@desk",
            ]
        );
    }

    #[test]
    fn test_name_includes_port() {
        assert_eq!(SshHost::new(target()).name(), "me@desk:2222");
    }

    #[test]
    fn test_remote_file_commands() {
        assert_eq!(upload_command("~/.Xresources"), "cat > ~/.Xresources");
        assert_eq!(upload_command("~/my bin/urxvtc"), "cat > ~/'my bin/urxvtc'");
        assert_eq!(mkdir_command("~/bin"), "mkdir -p ~/bin");
        assert_eq!(
            read_command("~/bin/urxvtc"),
            "test -e ~/bin/urxvtc || exit 100; cat ~/bin/urxvtc"
        );
    }

    #[test]
    fn test_read_output_mapping() {
        let host = SshHost::new(target());

        let missing = CommandOutput::failed(MISSING_FILE_CODE, "");
        assert_eq!(host.read_output("~/.Xresources", missing).unwrap(), None);

        let found = CommandOutput::ok("URxvt.font: fixed\n");
        assert_eq!(
            host.read_output("~/.Xresources", found).unwrap().as_deref(),
            Some(&b"URxvt.font: fixed\n"[..])
        );

        let denied = CommandOutput::failed(1, "cat: ~/.Xresources: Permission denied");
        let err = host.read_output("~/.Xresources", denied).unwrap_err();
        assert!(err.to_string().contains("Permission denied"));
    }

    #[test]
    fn test_connection_failure_detected() {
        let host = SshHost::new(target());
        let refused = CommandOutput::failed(255, "ssh: connect to host desk port 2222: Connection refused");
        let err = host.check_connection(&refused).unwrap_err();
        assert!(err.to_string().contains("Connection refused"));

        assert!(host.check_connection(&CommandOutput::failed(1, "")).is_ok());
    }
}
