use anyhow::Result;
use serde::Serialize;

use charity_dao_core::config::DaoConfig;

use crate::args::Cli;
use crate::io::config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ConfigOut {
    pub path: String,
    pub exists: bool,
    pub written: bool,
    pub config: DaoConfig,
}

pub async fn run(cli: &Cli, write: bool) -> Result<()> {
    let cfg = config::load(cli)?;
    let exists = cli.config.exists();
    if write {
        config::write(&cli.config, &cfg)?;
    }

    output::print(&ConfigOut {
        path: cli.config.display().to_string(),
        exists,
        written: write,
        config: cfg,
    })
}
