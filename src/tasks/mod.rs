//! Task registry
//!
//! A task is a named routine that builds an [`ExecutionPlan`] for one host.
//! Tasks are addressed as `module.name` (`rxvt.install`); the bare name
//! works when only one module defines it.

pub mod rxvt;

use anyhow::{Result, bail};
use declarative::ExecutionPlan;
use std::sync::Arc;

use crate::config::ProvisorConfig;
use crate::template::Templates;

/// What a task needs to build its plan
pub struct TaskEnv {
    pub config: ProvisorConfig,
    pub templates: Arc<Templates>,
}

/// A registered task
pub struct Task {
    pub module: &'static str,
    pub name: &'static str,
    pub about: &'static str,
    pub build: fn(&TaskEnv) -> Result<ExecutionPlan>,
}

impl Task {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.qualified_name())
            .finish_non_exhaustive()
    }
}

static TASKS: &[Task] = &[rxvt::INSTALL];

/// Every task provisor knows
pub fn all() -> &'static [Task] {
    TASKS
}

/// Find a task by qualified or bare name
pub fn resolve(name: &str) -> Result<&'static Task> {
    resolve_in(all(), name)
}

fn resolve_in<'a>(tasks: &'a [Task], name: &str) -> Result<&'a Task> {
    if let Some((module, task)) = name.split_once('.') {
        if let Some(found) = tasks.iter().find(|t| t.module == module && t.name == task) {
            return Ok(found);
        }
    } else {
        let matches: Vec<&Task> = tasks.iter().filter(|t| t.name == name).collect();
        match matches.as_slice() {
            [only] => return Ok(*only),
            [] => {}
            several => {
                let names: Vec<String> = several.iter().map(|t| t.qualified_name()).collect();
                bail!(
                    "Task '{}' is ambiguous, use one of: {}",
                    name,
                    names.join(", ")
                );
            }
        }
    }

    let known: Vec<String> = tasks.iter().map(Task::qualified_name).collect();
    bail!("Unknown task '{}'. Known tasks: {}", name, known.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(_env: &TaskEnv) -> Result<ExecutionPlan> {
        Ok(ExecutionPlan::new())
    }

    const fn task(module: &'static str, name: &'static str) -> Task {
        Task {
            module,
            name,
            about: "",
            build: empty,
        }
    }

    #[test]
    fn test_registry_has_rxvt_install() {
        let task = resolve("rxvt.install").unwrap();
        assert_eq!(task.qualified_name(), "rxvt.install");
        assert_eq!(resolve("install").unwrap().qualified_name(), "rxvt.install");
    }

    #[test]
    fn test_unknown_task_lists_known() {
        let err = resolve("deploy").unwrap_err();
        assert!(err.to_string().contains("rxvt.install"));
        assert!(resolve("rxvt.deploy").is_err());
        assert!(resolve("zsh.install").is_err());
    }

    #[test]
    fn test_ambiguous_bare_name() {
        let tasks = [task("rxvt", "install"), task("zsh", "install"), task("zsh", "theme")];

        let err = resolve_in(&tasks, "install").unwrap_err();
        assert!(err.to_string().contains("rxvt.install, zsh.install"));

        assert_eq!(resolve_in(&tasks, "zsh.install").unwrap().module, "zsh");
        assert_eq!(resolve_in(&tasks, "theme").unwrap().module, "zsh");
    }
}
