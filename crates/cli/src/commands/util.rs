use std::path::Path;

use anyhow::Result;
use release_audit_core::config::{load_audit_config, AuditConfig, AuditLayout};

use crate::resolve_project_root;

/// Resolve `--root` and load the audit config that applies to it.
pub fn load_context(root: &str, config: Option<&Path>) -> Result<(AuditLayout, AuditConfig)> {
    let root_path = resolve_project_root(root)?;
    let layout = AuditLayout::new(&root_path);
    let config = load_audit_config(&layout, config)?;
    Ok((layout, config))
}
