//! Node-managed wallet.
//!
//! The provider holds the keys and signs `eth_sendTransaction` itself, so a
//! session is just an account the provider agreed to expose.

use async_trait::async_trait;
use tracing::{debug, info};

use charity_dao_core::chain::{Session, Wallet};
use charity_dao_core::{DaoError, DaoResult};

use crate::rpc::RpcClient;

pub struct NodeWallet {
    rpc: RpcClient,
    account_index: usize,
}

impl NodeWallet {
    pub fn new(rpc: RpcClient, account_index: usize) -> Self {
        Self { rpc, account_index }
    }

    pub fn account_index(&self) -> usize {
        self.account_index
    }
}

#[async_trait]
impl Wallet for NodeWallet {
    async fn connect(&self) -> DaoResult<Session> {
        let accounts = match self.rpc.request_accounts().await {
            Ok(accounts) => accounts,
            Err(fault) if fault.is_method_not_found() => {
                debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.rpc.accounts().await.map_err(|e| e.into_connect_error())?
            }
            Err(fault) => return Err(fault.into_connect_error()),
        };

        if accounts.is_empty() {
            return Err(DaoError::NoProviderAvailable("provider exposes no accounts".to_string()));
        }
        let account = accounts.get(self.account_index).copied().ok_or_else(|| {
            DaoError::NoProviderAvailable(format!(
                "account index {} out of range ({} available)",
                self.account_index,
                accounts.len()
            ))
        })?;

        info!(%account, index = self.account_index, "wallet connected");
        Ok(Session::new(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcFault;
    use crate::test_util::ScriptedTransport;
    use alloy_primitives::Address;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    const A0: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const A1: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    fn wallet(t: &Arc<ScriptedTransport>, index: usize) -> NodeWallet {
        NodeWallet::new(RpcClient::new(t.clone()), index)
    }

    #[tokio::test]
    async fn picks_configured_index() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_requestAccounts", json!([A0, A1]));
        let session = wallet(&t, 1).connect().await.unwrap();
        assert_eq!(session.account, A1.parse::<Address>().unwrap());
    }

    #[tokio::test]
    async fn falls_back_to_eth_accounts() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_err(
            "eth_requestAccounts",
            RpcFault::Rpc {
                code: -32601,
                message: "Method not found".into(),
                data: None,
            },
        );
        t.push_ok("eth_accounts", json!([A0]));
        let session = wallet(&t, 0).connect().await.unwrap();
        assert_eq!(session.account, A0.parse::<Address>().unwrap());
        assert_eq!(t.methods(), vec!["eth_requestAccounts", "eth_accounts"]);
    }

    #[tokio::test]
    async fn dismissed_prompt_is_user_rejected() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_err(
            "eth_requestAccounts",
            RpcFault::Rpc {
                code: 4001,
                message: "User rejected the request.".into(),
                data: None,
            },
        );
        assert_matches!(wallet(&t, 0).connect().await, Err(DaoError::UserRejected(_)));
    }

    #[tokio::test]
    async fn empty_or_short_account_list() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_requestAccounts", json!([]));
        t.push_ok("eth_requestAccounts", json!([A0]));
        let w = wallet(&t, 3);
        assert_matches!(w.connect().await, Err(DaoError::NoProviderAvailable(_)));
        assert_matches!(w.connect().await, Err(DaoError::NoProviderAvailable(_)));
    }

    #[tokio::test]
    async fn every_connect_issues_a_request() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_requestAccounts", json!([A0]));
        t.push_ok("eth_requestAccounts", json!([A0]));
        let w = wallet(&t, 0);
        w.connect().await.unwrap();
        w.connect().await.unwrap();
        assert_eq!(t.calls().len(), 2);
    }
}
