use anyhow::Result;
use alloy_primitives::Address;
use serde::Serialize;

use crate::args::Cli;
use crate::chain::client::Deployment;
use crate::io::config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct AccountOut {
    pub account: Address,
    pub index: usize,
    pub treasury_index: usize,
}

pub async fn run(cli: &Cli) -> Result<()> {
    let deployment = Deployment::open(config::load(cli)?)?;
    let session = deployment.session(cli.account).await?;

    output::print(&AccountOut {
        account: session.account,
        index: cli.account,
        treasury_index: deployment.cfg.treasury_account_index,
    })
}
