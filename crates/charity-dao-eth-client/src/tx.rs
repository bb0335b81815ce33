//! Contract calls: reads via `eth_call`, writes via `eth_sendTransaction`.
//!
//! Writes resolve on submission unless the chain policy asks for
//! confirmations, in which case the receipt is polled until it is deep enough
//! or the timeout elapses.

use std::time::Duration;

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use charity_dao_core::chain::{Session, TxHash};
use charity_dao_core::config::ChainConfig;
use charity_dao_core::{DaoError, DaoResult};

use crate::rpc::RpcClient;

/// A deployed contract reachable through one provider.
#[derive(Clone)]
pub struct ContractHandle {
    rpc: RpcClient,
    address: Address,
    policy: ChainConfig,
}

impl ContractHandle {
    pub fn new(rpc: RpcClient, address: Address, policy: ChainConfig) -> Self {
        Self { rpc, address, policy }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Query a view function at the latest block.
    pub async fn read<C: SolCall + Send + Sync>(&self, call: &C) -> DaoResult<C::Return> {
        let data = call.abi_encode();
        debug!(contract = %self.address, function = C::SIGNATURE, "eth_call");
        let raw = self
            .rpc
            .call(self.address, &data)
            .await
            .map_err(|e| e.into_read_error())?;
        C::abi_decode_returns(&raw)
            .map_err(|e| DaoError::read(format!("{}: undecodable return data: {e}", C::SIGNATURE)))
    }

    /// Send a state-changing call signed by the session account.
    pub async fn write<C: SolCall + Send + Sync>(&self, session: &Session, call: &C) -> DaoResult<TxHash> {
        let data = call.abi_encode();
        let hash = self
            .rpc
            .send_transaction(session.account, self.address, &data)
            .await
            .map_err(|e| e.into_write_error())?;
        info!(
            contract = %self.address,
            function = C::SIGNATURE,
            from = %session.account,
            tx = %hash,
            "transaction submitted"
        );

        if self.policy.confirmations > 0 {
            wait_for_confirmations(&self.rpc, hash, &self.policy).await?;
        }
        Ok(hash)
    }
}

/// Poll until `hash` has `policy.confirmations` blocks (inclusion block counts
/// as the first) or `policy.receipt_timeout_secs` elapses.
pub async fn wait_for_confirmations(rpc: &RpcClient, hash: TxHash, policy: &ChainConfig) -> DaoResult<()> {
    let deadline = Instant::now() + Duration::from_secs(policy.receipt_timeout_secs);
    let poll = Duration::from_millis(policy.receipt_poll_millis.max(1));

    loop {
        let receipt = rpc
            .transaction_receipt(hash)
            .await
            .map_err(|e| e.into_read_error())?;

        if let Some(receipt) = receipt {
            if receipt.success == Some(false) {
                return Err(DaoError::TransactionReverted(format!(
                    "{hash} reverted in block {}",
                    receipt.block_number
                )));
            }
            let head = rpc.block_number().await.map_err(|e| e.into_read_error())?;
            let depth = head.saturating_sub(receipt.block_number) + 1;
            if depth >= policy.confirmations {
                debug!(tx = %hash, depth, "transaction confirmed");
                return Ok(());
            }
        }

        if Instant::now() >= deadline {
            return Err(DaoError::read(format!(
                "timed out after {}s waiting for {} confirmation(s) of {hash}",
                policy.receipt_timeout_secs, policy.confirmations
            )));
        }
        sleep(poll).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::IERC20;
    use crate::rpc::RpcFault;
    use crate::test_util::ScriptedTransport;
    use alloy_primitives::{B256, U256};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    fn handle(transport: Arc<ScriptedTransport>, confirmations: u64) -> ContractHandle {
        let policy = ChainConfig {
            confirmations,
            receipt_timeout_secs: 5,
            receipt_poll_millis: 10,
            request_timeout_secs: 5,
        };
        ContractHandle::new(RpcClient::new(transport), Address::repeat_byte(0xcc), policy)
    }

    fn approve() -> IERC20::approveCall {
        IERC20::approveCall {
            spender: Address::repeat_byte(1),
            amount: U256::from(5u64),
        }
    }

    fn tx_hash() -> String {
        format!("0x{}", "11".repeat(32))
    }

    #[tokio::test]
    async fn write_resolves_on_submission_without_confirmations() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_sendTransaction", json!(tx_hash()));
        let h = handle(t.clone(), 0);

        let hash = h.write(&Session::new(Address::repeat_byte(2)), &approve()).await.unwrap();
        assert_eq!(hash, B256::repeat_byte(0x11));
        assert_eq!(t.methods(), vec!["eth_sendTransaction"]);
    }

    #[tokio::test(start_paused = true)]
    async fn write_waits_for_depth() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_sendTransaction", json!(tx_hash()));
        t.push_ok("eth_getTransactionReceipt", serde_json::Value::Null);
        t.push_ok("eth_getTransactionReceipt", json!({"blockNumber": "0x5", "status": "0x1"}));
        t.push_ok("eth_blockNumber", json!("0x5"));
        t.push_ok("eth_getTransactionReceipt", json!({"blockNumber": "0x5", "status": "0x1"}));
        t.push_ok("eth_blockNumber", json!("0x6"));
        let h = handle(t.clone(), 2);

        h.write(&Session::new(Address::repeat_byte(2)), &approve()).await.unwrap();
        assert_eq!(t.methods().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_receipt_is_a_revert() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_sendTransaction", json!(tx_hash()));
        t.push_ok("eth_getTransactionReceipt", json!({"blockNumber": "0x5", "status": "0x0"}));
        let h = handle(t, 1);

        assert_matches!(
            h.write(&Session::new(Address::repeat_byte(2)), &approve()).await,
            Err(DaoError::TransactionReverted(_))
        );
    }

    #[tokio::test]
    async fn rejected_signature_maps_to_transaction_rejected() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_err(
            "eth_sendTransaction",
            RpcFault::Rpc {
                code: 4001,
                message: "User denied transaction signature".into(),
                data: None,
            },
        );
        let h = handle(t, 0);
        assert_matches!(
            h.write(&Session::new(Address::repeat_byte(2)), &approve()).await,
            Err(DaoError::TransactionRejected(_))
        );
    }

    #[tokio::test]
    async fn read_decodes_and_rejects_garbage() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_call", json!(format!("0x{:064x}", 7)));
        t.push_ok("eth_call", json!("0x"));
        let h = handle(t, 0);

        let call = IERC20::balanceOfCall {
            account: Address::repeat_byte(3),
        };
        assert_eq!(h.read(&call).await.unwrap(), U256::from(7u64));
        assert_matches!(h.read(&call).await, Err(DaoError::ReadError(_)));
    }
}
