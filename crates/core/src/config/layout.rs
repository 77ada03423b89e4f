use std::path::{Path, PathBuf};

use crate::config::AuditConfig;

/// Logical layout of an audited project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct AuditLayout {
    /// Root directory of the audited project.
    pub root: PathBuf,
    /// Directory for audit metadata (.release-audit).
    pub meta_dir: PathBuf,
    /// Candidate config files, in lookup order.
    pub config_candidates: Vec<PathBuf>,
}

impl AuditLayout {
    /// Compute the default layout for a project rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".release-audit");
        let config_candidates = ["config.json", "config.yaml", "config.yml"]
            .iter()
            .map(|name| meta_dir.join(name))
            .collect();

        Self { root, meta_dir, config_candidates }
    }

    /// First existing config candidate, if any.
    pub fn existing_config(&self) -> Option<&Path> {
        self.config_candidates.iter().map(PathBuf::as_path).find(|p| p.is_file())
    }

    /// Resolve a config-relative path against the root (absolute paths pass through).
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    pub fn manifest_path(&self, config: &AuditConfig) -> PathBuf {
        self.resolve(&config.toolchain.manifest)
    }

    pub fn production_dir(&self, config: &AuditConfig) -> PathBuf {
        self.resolve(&config.binaries.production_dir)
    }

    /// Release binaries checked by `all`, resolved against the root.
    pub fn release_binaries(&self, config: &AuditConfig) -> Vec<PathBuf> {
        config.binaries.release_binaries.iter().map(|b| self.resolve(b)).collect()
    }

    /// Express `path` relative to the root when possible, using `/` separators.
    /// Paths outside the root are shown as given.
    pub fn relative_display(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => slash_joined(rel),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Join the components of a relative path with `/`.
pub(crate) fn slash_joined(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
