use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Root configuration structure for packsmith.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PacksmithConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via packsmith.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Defaults {
    /// Template used by `new` when no `--template` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_template_name: Option<String>,

    /// Where installed templates live. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<String>,

    #[serde(default)]
    pub encoding: EncodingConfig,
}

/// Which generated files are written with a UTF-8 byte-order mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Glob patterns matched against the file name.
    #[serde(default = "default_bom_patterns")]
    pub bom_patterns: Vec<String>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            bom_patterns: default_bom_patterns(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_bom_patterns() -> Vec<String> {
    vec!["*.ps1".to_string(), "*.psm1".to_string()]
}

impl Defaults {
    /// Resolve the templates root, honoring a configured override.
    pub fn templates_root(&self) -> crate::Result<PathBuf> {
        match self.templates_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => {
                Ok(PathBuf::from(shellexpand::tilde(dir).into_owned()))
            }
            _ => paths::templates(),
        }
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If packsmith.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full packsmith.json config, falling back to defaults on any error.
pub fn load_config() -> PacksmithConfig {
    match load_config_from_file() {
        Ok(Some(config)) => config,
        Ok(None) => PacksmithConfig::default(),
        Err(err) => {
            tracing::debug!("Ignoring packsmith.json: {}", err.message);
            PacksmithConfig::default()
        }
    }
}

/// Attempt to load config from packsmith.json file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_config_from_file() -> crate::Result<Option<PacksmithConfig>> {
    let path = paths::packsmith_json()?;

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    parse_config(&content, &path.display().to_string()).map(Some)
}

pub fn parse_config(content: &str, origin: &str) -> crate::Result<PacksmithConfig> {
    serde_json::from_str(content).map_err(|e| crate::Error::config_invalid_json(origin, e))
}

/// Get the path to packsmith.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::packsmith_json()?.display().to_string())
}

/// Check if packsmith.json exists
pub fn config_exists() -> bool {
    paths::packsmith_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}
