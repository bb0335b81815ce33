use anyhow::{Context as _, Result};

use charity_dao_core::chain::{Session, Wallet};
use charity_dao_core::config::DaoConfig;
use charity_dao_core::content::ContentStore;
use charity_dao_eth_client::EthClient;

/// Everything one command needs to talk to the deployment.
pub struct Deployment {
    pub cfg: DaoConfig,
    pub eth: EthClient,
    pub store: Box<dyn ContentStore>,
}

impl Deployment {
    pub fn open(cfg: DaoConfig) -> Result<Self> {
        let eth = EthClient::connect_http(&cfg)?;
        let store = charity_dao_store::open(&cfg.content_store, cfg.chain.request_timeout_secs)?;
        Ok(Self { cfg, eth, store })
    }

    /// Ask the provider for the signing account at `index`.
    pub async fn session(&self, index: usize) -> Result<Session> {
        Ok(self
            .eth
            .wallet(index)
            .connect()
            .await
            .with_context(|| format!("connecting account {index}"))?)
    }

    pub async fn treasury(&self) -> Result<Session> {
        Ok(self
            .eth
            .treasury_wallet()
            .connect()
            .await
            .context("connecting treasury account")?)
    }
}

/// Store only; no provider is contacted.
pub fn open_store(cfg: &DaoConfig) -> Result<Box<dyn ContentStore>> {
    Ok(charity_dao_store::open(&cfg.content_store, cfg.chain.request_timeout_secs)?)
}
