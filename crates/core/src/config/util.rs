use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{AuditConfig, AuditLayout};

/// Serialization format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse config text in the given format.
pub fn parse_audit_config(body: &str, format: ConfigFormat) -> Result<AuditConfig> {
    let config = match format {
        ConfigFormat::Json => {
            serde_json::from_str(body).context("Failed to parse audit config JSON")?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(body).context("Failed to parse audit config YAML")?
        }
    };
    Ok(config)
}

/// Load the audit config.
///
/// An explicit path must exist. Without one, the layout's candidates are
/// tried in order and the defaults are used when none exists.
pub fn load_audit_config(layout: &AuditLayout, explicit: Option<&Path>) -> Result<AuditConfig> {
    let path = match explicit {
        Some(p) => layout.resolve(p),
        None => match layout.existing_config() {
            Some(p) => p.to_path_buf(),
            None => {
                log::debug!("no audit config under {}, using defaults", layout.meta_dir.display());
                return Ok(AuditConfig::default());
            }
        },
    };

    let body = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read audit config at {}", path.display()))?;
    let config = parse_audit_config(&body, ConfigFormat::from_path(&path))
        .with_context(|| format!("Invalid audit config at {}", path.display()))?;
    log::debug!("loaded audit config from {}", path.display());
    Ok(config)
}
