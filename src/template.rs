//! Local template rendering
//!
//! Templates are plain files under the template directory. `{{ name }}`
//! placeholders are replaced with configured values; everything else is
//! copied through byte-for-byte.

use anyhow::{Context, Result, bail};
use regex::bytes::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

/// A template directory plus the variables rendered into it
#[derive(Debug, Clone)]
pub struct Templates {
    dir: PathBuf,
    vars: BTreeMap<String, String>,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>, vars: BTreeMap<String, String>) -> Self {
        Self {
            dir: dir.into(),
            vars,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Local path of a template, e.g. `rxvt/Xresources`
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read and render a template
    pub fn render(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name);
        let source = std::fs::read(&path)
            .with_context(|| format!("Could not read template {}", path.display()))?;
        self.render_bytes(name, &source)
    }

    fn render_bytes(&self, name: &str, source: &[u8]) -> Result<Vec<u8>> {
        let mut missing = Vec::new();
        let rendered = PLACEHOLDER.replace_all(source, |caps: &Captures| {
            let key = String::from_utf8_lossy(&caps[1]).into_owned();
            match self.vars.get(&key) {
                Some(value) => value.clone().into_bytes(),
                None => {
                    missing.push(key);
                    caps[0].to_vec()
                }
            }
        });

        if !missing.is_empty() {
            bail!(
                "Template {} uses undefined variable(s): {}",
                name,
                missing.join(", ")
            );
        }
        Ok(rendered.into_owned())
    }
}
