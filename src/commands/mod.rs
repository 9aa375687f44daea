pub mod run;
pub mod status;
pub mod tasks;

use anyhow::Result;
use declarative::Host;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::Context;
use crate::config::{HostSettings, ProvisorConfig};
use crate::host::{self, HostTarget};
use crate::paths;
use crate::tasks::TaskEnv;
use crate::template::Templates;

/// Everything a command needs to work on one host
pub struct Session {
    pub config: ProvisorConfig,
    pub host: Box<dyn Host>,
    pub templates: Arc<Templates>,
    /// Privileged commands may prompt on the terminal
    pub interactive_sudo: bool,
}

impl Session {
    /// Load config, apply command-line overrides and connect
    pub fn open(ctx: &Context) -> Result<Self> {
        let config_file = paths::config_file(ctx.config.as_deref())?;
        let mut config = ProvisorConfig::load(&config_file)?;

        if let Some(address) = &ctx.host {
            config.host.address = Some(address.clone());
        }
        config.host.validate()?;

        let host = host::connect(&config.host, ctx.local)?;

        let config_dir = config_file.parent().unwrap_or(Path::new("."));
        let template_dir = config.template_dir(config_dir, ctx.templates.as_deref());
        log::debug!("Templates from {}", template_dir.display());

        let vars = template_vars(&config, ctx.local)?;
        let templates = Arc::new(Templates::new(template_dir, vars));

        Ok(Self {
            interactive_sudo: ctx.local || config.host.interactive_sudo,
            config,
            host,
            templates,
        })
    }

    pub fn task_env(&self) -> TaskEnv {
        TaskEnv {
            config: self.config.clone(),
            templates: Arc::clone(&self.templates),
        }
    }
}

/// `[vars]` plus the built-in `host` and `user`; `[vars]` wins on conflict
fn template_vars(config: &ProvisorConfig, local: bool) -> Result<BTreeMap<String, String>> {
    let mut vars = config.vars.clone();
    let (host, user) = builtin_identity(&config.host, local)?;
    vars.entry("host".to_string()).or_insert(host);
    if let Some(user) = user {
        vars.entry("user".to_string()).or_insert(user);
    }
    Ok(vars)
}

fn builtin_identity(settings: &HostSettings, local: bool) -> Result<(String, Option<String>)> {
    let local_user = std::env::var("USER").ok();
    if local {
        return Ok(("localhost".to_string(), local_user));
    }
    match settings.address.as_deref() {
        Some(address) => {
            let target: HostTarget = address.parse()?;
            let user = target.user.or_else(|| settings.user.clone()).or(local_user);
            Ok((target.address, user))
        }
        None => Ok(("localhost".to_string(), local_user)),
    }
}
