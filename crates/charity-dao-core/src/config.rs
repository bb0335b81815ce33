//! Configuration structures for the charity DAO client.
//!
//! This module defines the explicit, serializable deployment configuration:
//! contract addresses, token price, provider endpoint and content store. It is
//! consumed read-only by every workflow that needs a deployment address.
//!
//! The core crate itself does not read environment variables or files. The CLI
//! loads a JSON document and applies its flag overrides before calling
//! [`validate_config`].

use std::path::PathBuf;

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

use crate::errors::{DaoError, DaoResult};
use crate::units::{parse_units, MAX_DECIMALS};

/// Deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaoConfig {
    /// JSON-RPC endpoint of the wallet-enabled node.
    pub rpc_url: String,
    /// The DAO whose records are updated.
    pub dao_address: Address,
    /// ERC-4824 registry contract.
    pub registry_address: Address,
    pub governance_token_address: Address,
    /// ERC-20 used to pay for governance tokens.
    pub payment_token_address: Address,
    /// Price of one governance token, in payment-token units (decimal string).
    pub governance_token_price: String,
    pub base_currency: String,
    pub payment_token_decimals: u8,
    pub governance_token_decimals: u8,
    /// Provider account that receives payment and sells governance tokens.
    pub treasury_account_index: usize,
    pub chain: ChainConfig,
    pub content_store: ContentStoreConfig,
}

impl Default for DaoConfig {
    fn default() -> Self {
        // First four contract addresses a fresh local dev node hands out.
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            dao_address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            registry_address: address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
            governance_token_address: address!("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
            payment_token_address: address!("0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9"),
            governance_token_price: "10".to_string(),
            base_currency: "USDC".to_string(),
            payment_token_decimals: 6,
            governance_token_decimals: 18,
            treasury_account_index: 0,
            chain: ChainConfig::default(),
            content_store: ContentStoreConfig::default(),
        }
    }
}

impl DaoConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json_str(raw: &str) -> DaoResult<Self> {
        serde_json::from_str(raw).map_err(|e| DaoError::config(format!("invalid config json: {e}")))
    }

    /// Governance token price in payment-token base units.
    pub fn price_units(&self) -> DaoResult<U256> {
        parse_units(&self.governance_token_price, self.payment_token_decimals)
            .map_err(|e| DaoError::config(format!("governance_token_price: {e}")))
    }
}

/// Transaction submission policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Blocks to wait on top of the inclusion block. `0` returns on submission.
    pub confirmations: u64,
    pub receipt_timeout_secs: u64,
    pub receipt_poll_millis: u64,
    /// HTTP timeout for a single JSON-RPC request.
    pub request_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            confirmations: 0,
            receipt_timeout_secs: 120,
            receipt_poll_millis: 1_000,
            request_timeout_secs: 30,
        }
    }
}

/// Where documents are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentStoreConfig {
    /// Content-addressed blobs under a local directory.
    Local { root: PathBuf },
    /// A Skynet portal.
    Skynet {
        portal_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self::Local {
            root: PathBuf::from(".charity-dao/store"),
        }
    }
}

impl ContentStoreConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Skynet { .. } => "skynet",
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &DaoConfig) -> DaoResult<()> {
    if cfg.rpc_url.trim().is_empty() {
        return Err(DaoError::config("rpc_url must not be empty"));
    }

    for (field, addr) in [
        ("dao_address", cfg.dao_address),
        ("registry_address", cfg.registry_address),
        ("governance_token_address", cfg.governance_token_address),
        ("payment_token_address", cfg.payment_token_address),
    ] {
        if addr == Address::ZERO {
            return Err(DaoError::config(format!("{field} must not be the zero address")));
        }
    }

    if cfg.payment_token_decimals > MAX_DECIMALS || cfg.governance_token_decimals > MAX_DECIMALS {
        return Err(DaoError::config(format!(
            "token decimals must not exceed {MAX_DECIMALS}"
        )));
    }

    if cfg.price_units()?.is_zero() {
        return Err(DaoError::config("governance_token_price must be greater than zero"));
    }

    if cfg.chain.confirmations > 0 && cfg.chain.receipt_timeout_secs == 0 {
        return Err(DaoError::config(
            "receipt_timeout_secs must be greater than zero when confirmations are requested",
        ));
    }

    if cfg.chain.request_timeout_secs == 0 {
        return Err(DaoError::config("request_timeout_secs must be greater than zero"));
    }

    match &cfg.content_store {
        ContentStoreConfig::Local { root } if root.as_os_str().is_empty() => {
            return Err(DaoError::config("content_store.root must not be empty"));
        }
        ContentStoreConfig::Skynet { portal_url, .. } if portal_url.trim().is_empty() => {
            return Err(DaoError::config("content_store.portal_url must not be empty"));
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = DaoConfig::default();
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.price_units().unwrap(), U256::from(10_000_000u64));
    }

    #[test]
    fn zero_address_detected() {
        let mut cfg = DaoConfig::default();
        cfg.registry_address = Address::ZERO;
        let e = validate_config(&cfg).unwrap_err();
        assert!(e.to_string().contains("registry_address"));
    }

    #[test]
    fn bad_price_detected() {
        let mut cfg = DaoConfig::default();
        cfg.governance_token_price = "ten".to_string();
        assert!(validate_config(&cfg).is_err());
        cfg.governance_token_price = "0".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn confirmations_need_timeout() {
        let mut cfg = DaoConfig::default();
        cfg.chain.confirmations = 2;
        cfg.chain.receipt_timeout_secs = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = DaoConfig::from_json_str(
            r#"{
                "rpc_url": "http://node:8545",
                "content_store": {"kind": "skynet", "portal_url": "https://siasky.net"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.rpc_url, "http://node:8545");
        assert_eq!(cfg.base_currency, "USDC");
        assert_eq!(cfg.content_store.kind(), "skynet");
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn empty_portal_detected() {
        let mut cfg = DaoConfig::default();
        cfg.content_store = ContentStoreConfig::Skynet {
            portal_url: " ".into(),
            api_key: None,
        };
        assert!(validate_config(&cfg).is_err());
    }
}
