//! In-memory host for tests

use anyhow::{Result, bail};
use declarative::{CommandOutput, Host};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Run(String),
    Sudo(String),
    Upload { path: String, contents: Vec<u8> },
    Mkdir(String),
    Read(String),
}

impl HostEvent {
    /// Probes only look at the host
    pub fn is_probe(&self) -> bool {
        match self {
            Self::Read(_) => true,
            Self::Run(cmd) => {
                cmd.starts_with("dpkg -s ") || (cmd.starts_with("test ") && !cmd.contains(" || "))
            }
            _ => false,
        }
    }
}

/// Records every operation and fakes just enough of dpkg, apt-get, cp and
/// chmod to drive the rxvt task
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
    installed: Mutex<BTreeSet<String>>,
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    executables: Mutex<BTreeSet<String>>,
    fail_on: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installed(self, package: &str) -> Self {
        lock(&self.installed).insert(package.to_string());
        self
    }

    pub fn with_file(self, path: &str, contents: &[u8]) -> Self {
        lock(&self.files).insert(path.to_string(), contents.to_vec());
        self
    }

    /// Fail any command or upload whose text contains `pattern`
    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.fail_on = Some(pattern.to_string());
        self
    }

    pub fn events(&self) -> Vec<HostEvent> {
        lock(&self.events).clone()
    }

    /// Events that change the host
    pub fn mutations(&self) -> Vec<HostEvent> {
        self.events().into_iter().filter(|e| !e.is_probe()).collect()
    }

    pub fn sudo_commands(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Sudo(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        lock(&self.files).get(path).cloned()
    }

    pub fn is_executable(&self, path: &str) -> bool {
        lock(&self.executables).contains(path)
    }

    fn record(&self, event: HostEvent) {
        lock(&self.events).push(event);
    }

    fn should_fail(&self, text: &str) -> bool {
        self.fail_on.as_deref().is_some_and(|p| text.contains(p))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Host for RecordingHost {
    fn name(&self) -> String {
        "mock".to_string()
    }

    fn run(&self, command: &str) -> Result<CommandOutput> {
        self.record(HostEvent::Run(command.to_string()));
        if self.should_fail(command) {
            return Ok(CommandOutput::failed(1, "simulated failure"));
        }

        if let Some(package) = command.strip_prefix("dpkg -s ") {
            return Ok(if lock(&self.installed).contains(package) {
                CommandOutput::ok(format!(
                    "Package: {package}\nStatus: install ok installed\n"
                ))
            } else {
                CommandOutput::failed(
                    1,
                    format!("dpkg-query: package '{package}' is not installed"),
                )
            });
        }
        if let Some(path) = command.strip_prefix("test -x ") {
            return Ok(if self.is_executable(path) {
                CommandOutput::ok("")
            } else {
                CommandOutput::failed(1, "")
            });
        }
        // test ! -e P || cp P P.bak
        if let Some(rest) = command.strip_prefix("test ! -e ")
            && let Some((path, copy)) = rest.split_once(" || cp ")
            && let Some(backup) = copy.split_whitespace().last()
        {
            if let Some(contents) = self.file(path) {
                lock(&self.files).insert(backup.to_string(), contents);
            }
            return Ok(CommandOutput::ok(""));
        }
        if let Some(path) = command.strip_prefix("chmod +x ") {
            if self.file(path).is_none() {
                return Ok(CommandOutput::failed(
                    1,
                    format!("chmod: cannot access '{path}': No such file or directory"),
                ));
            }
            lock(&self.executables).insert(path.to_string());
        }
        Ok(CommandOutput::ok(""))
    }

    fn sudo(&self, command: &str) -> Result<CommandOutput> {
        self.record(HostEvent::Sudo(command.to_string()));
        if self.should_fail(command) {
            return Ok(CommandOutput::failed(
                100,
                "E: Unable to locate package rxvt-unicode-256color",
            ));
        }
        if command.contains("apt-get install --quiet --assume-yes ")
            && let Some(package) = command.split_whitespace().last()
        {
            lock(&self.installed).insert(package.to_string());
        }
        Ok(CommandOutput::ok(""))
    }

    fn upload(&self, path: &str, contents: &[u8]) -> Result<()> {
        self.record(HostEvent::Upload {
            path: path.to_string(),
            contents: contents.to_vec(),
        });
        if self.should_fail(path) {
            bail!("simulated upload failure for {}", path);
        }
        lock(&self.files).insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn mkdir(&self, dir: &str) -> Result<()> {
        self.record(HostEvent::Mkdir(dir.to_string()));
        if self.should_fail(dir) {
            bail!("simulated mkdir failure for {}", dir);
        }
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.record(HostEvent::Read(path.to_string()));
        Ok(self.file(path))
    }
}
