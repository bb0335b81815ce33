use anyhow::Result;
use serde::Serialize;

use charity_dao_core::config::{ContentStoreConfig, DaoConfig};
use charity_dao_eth_client::EthClient;

use crate::args::Cli;
use crate::io::config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &str, result: Result<String, String>) -> Self {
        let (ok, detail) = match result {
            Ok(d) => (true, d),
            Err(d) => (false, d),
        };
        Self {
            name: name.to_string(),
            ok,
            detail,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run(cli: &Cli) -> Result<()> {
    let mut checks = Vec::new();

    let cfg = match config::load(cli) {
        Ok(cfg) => {
            checks.push(Check::new("config", Ok(cli.config.display().to_string())));
            cfg
        }
        Err(e) => {
            checks.push(Check::new("config", Err(format!("{e:#}"))));
            return finish(checks);
        }
    };

    checks.push(Check::new("content_store", store_check(&cfg)));

    match EthClient::connect_http(&cfg) {
        Ok(eth) => {
            let rpc = eth.rpc();
            checks.push(Check::new(
                "rpc",
                rpc.client_version()
                    .await
                    .map(|v| format!("{} ({v})", cfg.rpc_url))
                    .map_err(|e| format!("{}: {e}", cfg.rpc_url)),
            ));
            checks.push(Check::new(
                "chain_id",
                rpc.chain_id().await.map(|id| id.to_string()).map_err(|e| e.to_string()),
            ));
            checks.push(Check::new(
                "accounts",
                match rpc.accounts().await {
                    Ok(a) if a.len() > cfg.treasury_account_index.max(cli.account) => {
                        Ok(format!("{} available", a.len()))
                    }
                    Ok(a) => Err(format!(
                        "{} available; account {} and treasury {} need more",
                        a.len(),
                        cli.account,
                        cfg.treasury_account_index
                    )),
                    Err(e) => Err(e.to_string()),
                },
            ));
        }
        Err(e) => checks.push(Check::new("rpc", Err(e.to_string()))),
    }

    finish(checks)
}

fn store_check(cfg: &DaoConfig) -> Result<String, String> {
    match &cfg.content_store {
        ContentStoreConfig::Local { root } => {
            std::fs::create_dir_all(root).map_err(|e| format!("{}: {e}", root.display()))?;
            Ok(format!("local ({})", root.display()))
        }
        ContentStoreConfig::Skynet { portal_url, .. } => Ok(format!("skynet ({portal_url})")),
    }
}

fn finish(checks: Vec<Check>) -> Result<()> {
    let ok = checks.iter().all(|c| c.ok);
    output::print(&DoctorOut { ok, checks })
}
