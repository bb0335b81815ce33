use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use charity_dao_core::config::{validate_config, DaoConfig};

use crate::args::Cli;

/// Load the config file (defaults when absent), apply flag overrides, validate.
pub fn load(cli: &Cli) -> Result<DaoConfig> {
    let mut cfg = read_or_default(&cli.config)?;
    if let Some(url) = &cli.rpc_url {
        cfg.rpc_url = url.clone();
    }
    validate_config(&cfg).with_context(|| format!("invalid configuration ({})", cli.config.display()))?;
    Ok(cfg)
}

fn read_or_default(path: &Path) -> Result<DaoConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(DaoConfig::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DaoConfig::from_json_str(&raw).map_err(|e| anyhow!("{}: {e}", path.display()))
}

pub fn write(path: &Path, cfg: &DaoConfig) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(cfg)?;
    bytes.push(b'\n');
    crate::io::export::write_file(path, &bytes)
}
