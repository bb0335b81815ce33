//! charity-dao-eth-client
//!
//! Ethereum JSON-RPC client for the charity DAO.
//!
//! It includes:
//! - a JSON-RPC transport and typed `eth_*` methods
//! - a node-managed wallet that hands out [`Session`]s
//! - `sol!` bindings for the ERC-4824 registry and both tokens
//! - write submission with optional confirmation polling
//!
//! Everything is wired from one [`DaoConfig`] through [`EthClient`].
//!
//! [`Session`]: charity_dao_core::chain::Session

pub mod abi;
pub mod constants;
pub mod registry;
pub mod rpc;
pub mod token;
pub mod tx;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_util;

use alloy_primitives::Address;
use tracing::debug;

use charity_dao_core::config::DaoConfig;
use charity_dao_core::{DaoError, DaoResult};

pub use constants::CLIENT_VERSION;
pub use registry::Erc4824Registry;
pub use rpc::{HttpTransport, RpcClient, RpcFault, RpcTransport};
pub use token::{Erc20Contract, GovernanceTokenContract};
pub use tx::ContractHandle;
pub use wallet::NodeWallet;

/// Factory for every chain collaborator of one deployment.
#[derive(Clone)]
pub struct EthClient {
    rpc: RpcClient,
    cfg: DaoConfig,
}

impl EthClient {
    pub fn connect_http(cfg: &DaoConfig) -> DaoResult<Self> {
        let rpc = RpcClient::http(&cfg.rpc_url, cfg.chain.request_timeout_secs)
            .map_err(|e| DaoError::NoProviderAvailable(e.to_string()))?;
        debug!(url = %cfg.rpc_url, client = CLIENT_VERSION, "rpc client ready");
        Ok(Self::with_rpc(rpc, cfg))
    }

    pub fn with_rpc(rpc: RpcClient, cfg: &DaoConfig) -> Self {
        Self { rpc, cfg: cfg.clone() }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    fn contract(&self, address: Address) -> ContractHandle {
        ContractHandle::new(self.rpc.clone(), address, self.cfg.chain.clone())
    }

    /// Wallet exposing the account at `index`.
    pub fn wallet(&self, index: usize) -> NodeWallet {
        NodeWallet::new(self.rpc.clone(), index)
    }

    /// Wallet for the treasury account.
    pub fn treasury_wallet(&self) -> NodeWallet {
        self.wallet(self.cfg.treasury_account_index)
    }

    pub fn registry(&self) -> Erc4824Registry {
        Erc4824Registry::new(self.contract(self.cfg.registry_address), self.cfg.dao_address)
    }

    pub fn governance_token(&self) -> GovernanceTokenContract {
        GovernanceTokenContract::new(self.contract(self.cfg.governance_token_address))
    }

    pub fn payment_token(&self) -> Erc20Contract {
        Erc20Contract::new(self.contract(self.cfg.payment_token_address))
    }
}
