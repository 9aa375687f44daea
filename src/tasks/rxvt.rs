//! rxvt-unicode terminal: package, X resources and the client wrapper

use anyhow::Result;
use declarative::ExecutionPlan;

use super::{Task, TaskEnv};
use crate::resource::{DebPackage, RemoteCommand, TemplateFile};

pub const XRESOURCES_TEMPLATE: &str = "rxvt/Xresources";
pub const XRESOURCES_PATH: &str = "~/.Xresources";
pub const URXVTC_TEMPLATE: &str = "rxvt/urxvtc";
pub const URXVTC_PATH: &str = "~/bin/urxvtc";

pub const INSTALL: Task = Task {
    module: "rxvt",
    name: "install",
    about: "Install rxvt-unicode, upload ~/.Xresources and ~/bin/urxvtc",
    build: install,
};

/// Package first, then the two uploads, then the permission bit
pub fn install(env: &TaskEnv) -> Result<ExecutionPlan> {
    let rxvt = &env.config.rxvt;
    let package = DebPackage::new(&rxvt.package)?.with_upgrade(rxvt.upgrade);

    Ok(ExecutionPlan::new()
        .with(package)
        .with(TemplateFile::new(
            env.templates.clone(),
            XRESOURCES_TEMPLATE,
            XRESOURCES_PATH,
        ))
        .with(TemplateFile::new(env.templates.clone(), URXVTC_TEMPLATE, URXVTC_PATH).with_mkdir())
        .with(RemoteCommand::make_executable(URXVTC_PATH)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisorConfig;
    use crate::host::mock::{HostEvent, RecordingHost};
    use crate::template::Templates;
    use declarative::{ApplyResult, ExecuteOptions, Resource, execute_simple};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    const URXVT: &str = "rxvt-unicode-256color";
    const INSTALL_CMD: &str =
        "DEBIAN_FRONTEND=noninteractive apt-get install --quiet --assume-yes rxvt-unicode-256color";
    const UPGRADE_CMD: &str = "apt-get install --only-upgrade rxvt-unicode-256color";
    const XRESOURCES: &[u8] = b"URxvt.scrollBar: false\nURxvt.font: xft:mono\n";
    const URXVTC: &[u8] = b"#!/bin/sh\nurxvtc \"$@\"\nif [ $? -eq 2 ]; then\n  urxvtd -q -o -f\n  urxvtc \"$@\"\nfi\n";

    fn env(upgrade: bool) -> (TempDir, TaskEnv) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("rxvt")).unwrap();
        std::fs::write(dir.path().join(XRESOURCES_TEMPLATE), XRESOURCES).unwrap();
        std::fs::write(dir.path().join(URXVTC_TEMPLATE), URXVTC).unwrap();

        let mut config = ProvisorConfig::default();
        config.rxvt.upgrade = upgrade;
        let templates = Arc::new(Templates::new(dir.path(), BTreeMap::new()));
        (dir, TaskEnv { config, templates })
    }

    fn run(env: &TaskEnv, host: &RecordingHost, dry_run: bool) -> Result<declarative::ExecuteSummary> {
        let opts = ExecuteOptions {
            dry_run,
            verbose: false,
        };
        execute_simple(install(env)?, host, &opts)
    }

    fn backup(path: &str) -> HostEvent {
        HostEvent::Run(format!("test ! -e {path} || cp {path} {path}.bak"))
    }

    fn upload(path: &str, contents: &[u8]) -> HostEvent {
        HostEvent::Upload {
            path: path.to_string(),
            contents: contents.to_vec(),
        }
    }

    #[test]
    fn test_plan_order() {
        let (_dir, env) = env(false);
        let plan = install(&env).unwrap();
        let ids: Vec<String> = plan.steps().iter().map(|r| r.id()).collect();

        assert_eq!(
            ids,
            [URXVT, "~/.Xresources", "~/bin/urxvtc", "chmod +x ~/bin/urxvtc"]
        );
        assert_eq!(plan.privileged_count(), 1);
    }

    #[test]
    fn test_fresh_host_full_sequence() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new();

        let summary = run(&env, &host, false).unwrap();

        assert_eq!(
            host.events(),
            [
                HostEvent::Run(format!("dpkg -s {URXVT}")),
                HostEvent::Sudo(INSTALL_CMD.into()),
                backup("~/.Xresources"),
                upload("~/.Xresources", XRESOURCES),
                HostEvent::Mkdir("~/bin".into()),
                backup("~/bin/urxvtc"),
                upload("~/bin/urxvtc", URXVTC),
                HostEvent::Run("chmod +x ~/bin/urxvtc".into()),
            ]
        );
        assert_eq!(summary.created, 1);
        assert_eq!(summary.modified, 3);
        assert!(host.is_executable("~/bin/urxvtc"));
    }

    #[test]
    fn test_installed_host_no_upgrade() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new().with_installed(URXVT);

        let summary = run(&env, &host, false).unwrap();

        assert!(host.sudo_commands().is_empty());
        assert_eq!(summary.no_change, 1);
        // Uploads and chmod happen on every run
        assert_eq!(host.file("~/.Xresources").as_deref(), Some(XRESOURCES));
        assert_eq!(host.file("~/bin/urxvtc").as_deref(), Some(URXVTC));
        assert!(host.is_executable("~/bin/urxvtc"));
    }

    #[test]
    fn test_installed_host_with_upgrade() {
        let (_dir, env) = env(true);
        let host = RecordingHost::new().with_installed(URXVT);

        run(&env, &host, false).unwrap();

        assert_eq!(host.sudo_commands(), [UPGRADE_CMD]);
    }

    #[test]
    fn test_fresh_host_with_upgrade_upgrades_after_install() {
        let (_dir, env) = env(true);
        let host = RecordingHost::new();

        run(&env, &host, false).unwrap();

        assert_eq!(host.sudo_commands(), [INSTALL_CMD, UPGRADE_CMD]);
    }

    #[test]
    fn test_exactly_two_uploads_then_one_chmod() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new().with_installed(URXVT);

        run(&env, &host, false).unwrap();

        let tail: Vec<HostEvent> = host
            .mutations()
            .into_iter()
            .filter(|e| {
                !matches!(e, HostEvent::Mkdir(_))
                    && *e != backup("~/.Xresources")
                    && *e != backup("~/bin/urxvtc")
            })
            .collect();
        assert_eq!(
            tail,
            [
                upload("~/.Xresources", XRESOURCES),
                upload("~/bin/urxvtc", URXVTC),
                HostEvent::Run("chmod +x ~/bin/urxvtc".into()),
            ]
        );
    }

    #[test]
    fn test_install_failure_stops_everything() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new().failing_on("apt-get");

        let err = run(&env, &host, false).unwrap_err();

        assert!(err.to_string().contains(URXVT));
        assert!(err.chain().any(|e| e.downcast_ref::<debkit::Error>().is_some()));
        assert!(
            !host
                .events()
                .iter()
                .any(|e| matches!(e, HostEvent::Upload { .. }))
        );
    }

    #[test]
    fn test_urxvtc_failure_skips_chmod() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new()
            .with_installed(URXVT)
            .failing_on("urxvtc");

        assert!(run(&env, &host, false).is_err());

        let events = host.events();
        assert_eq!(events.last(), Some(&backup("~/bin/urxvtc")));
        assert!(!events.iter().any(|e| matches!(e, HostEvent::Run(c) if c.starts_with("chmod"))));
        assert!(host.file("~/bin/urxvtc").is_none());
        // The first upload is not rolled back
        assert_eq!(host.file("~/.Xresources").as_deref(), Some(XRESOURCES));
    }

    #[test]
    fn test_rerun_keeps_previous_files_as_backups() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new()
            .with_installed(URXVT)
            .with_file("~/.Xresources", b"URxvt.font: old\n")
            .with_file("~/bin/urxvtc", b"#!/bin/sh\n");

        run(&env, &host, false).unwrap();

        assert_eq!(host.file("~/.Xresources.bak").as_deref(), Some(&b"URxvt.font: old\n"[..]));
        assert_eq!(host.file("~/bin/urxvtc.bak").as_deref(), Some(&b"#!/bin/sh\n"[..]));
        assert_eq!(host.file("~/.Xresources").as_deref(), Some(XRESOURCES));
        assert_eq!(host.file("~/bin/urxvtc").as_deref(), Some(URXVTC));
    }

    #[test]
    fn test_missing_template_fails_after_package() {
        let (dir, env) = env(false);
        std::fs::remove_file(dir.path().join(XRESOURCES_TEMPLATE)).unwrap();
        let host = RecordingHost::new();

        let err = run(&env, &host, false).unwrap_err();

        assert!(format!("{err:#}").contains("Xresources"));
        assert_eq!(host.sudo_commands(), [INSTALL_CMD]);
        assert!(host.file("~/bin/urxvtc").is_none());
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let (_dir, env) = env(true);
        let host = RecordingHost::new();

        let summary = run(&env, &host, true).unwrap();

        assert!(host.events().is_empty());
        assert_eq!(summary.skipped, 4);
    }

    #[test]
    fn test_package_name_from_config() {
        let (_dir, mut env) = env(false);
        env.config.rxvt.package = "rxvt-unicode".into();
        let plan = install(&env).unwrap();
        assert_eq!(plan.steps()[0].id(), "rxvt-unicode");

        env.config.rxvt.package = "bad name".into();
        assert!(install(&env).is_err());
    }

    #[test]
    fn test_apply_results_are_reported() {
        let (_dir, env) = env(false);
        let host = RecordingHost::new().with_installed(URXVT);
        let plan = install(&env).unwrap();

        let mut ctx = declarative::ApplyContext::new(&host, false, false);
        let results: Vec<ApplyResult> = plan
            .steps()
            .iter()
            .map(|r| r.apply(&mut ctx).unwrap())
            .collect();

        assert_eq!(
            results,
            [
                ApplyResult::NoChange,
                ApplyResult::Modified,
                ApplyResult::Modified,
                ApplyResult::Modified,
            ]
        );
    }
}
