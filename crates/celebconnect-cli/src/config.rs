//! Config file loading.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use celebconnect_core::{BaseUrl, GatewayConfig};

use crate::cli::GlobalArgs;
use crate::session::project_dirs;

/// Default config location: `<config dir>/config.json`.
fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// Load the gateway config, then apply `--api-url` on top.
///
/// A missing default config file is fine; a missing explicit `--config`
/// file is an error.
pub fn load(global: &GlobalArgs) -> Result<GatewayConfig> {
    let (path, explicit) = match &global.config {
        Some(path) => (path.clone(), true),
        None => (default_config_path()?, false),
    };

    let mut config = if explicit || path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        GatewayConfig::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?
    } else {
        GatewayConfig::default()
    };

    if let Some(url) = &global.api_url {
        config.base_url = Some(BaseUrl::new(url).context("Invalid API URL")?);
    }

    Ok(config)
}
