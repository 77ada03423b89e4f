use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod app;
pub mod commands;

/// Turn the `--root` argument into an absolute project root.
///
/// `.` is the working directory. An existing path is canonicalized; a missing
/// one is anchored at the working directory so later "not found" findings
/// still show a full path.
pub fn resolve_project_root(root: &str) -> Result<PathBuf> {
    let working_dir = || env::current_dir().context("Cannot determine the working directory");
    let root = Path::new(root);
    if root == Path::new(".") {
        return working_dir();
    }
    match root.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) => {
            log::debug!("{} not canonicalized ({err}), anchoring at cwd", root.display());
            Ok(working_dir()?.join(root))
        }
    }
}
