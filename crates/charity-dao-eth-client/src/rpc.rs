//! JSON-RPC plumbing.
//!
//! [`RpcTransport`] moves one request/response pair; [`HttpTransport`] does it
//! over HTTP with `reqwest`. [`RpcClient`] layers the handful of `eth_*`
//! methods this client needs on top of any transport.
//!
//! Faults are kept as [`RpcFault`] until the caller knows whether it was
//! connecting, reading or writing, then mapped into the shared `DaoError`.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use charity_dao_core::DaoError;

use crate::constants::{
    BLOCK_LATEST, CODE_EXECUTION_REVERTED, CODE_METHOD_NOT_FOUND, CODE_UNAUTHORIZED, CODE_USER_REJECTED,
    JSONRPC_VERSION,
};

#[derive(Debug, Error)]
pub enum RpcFault {
    /// The endpoint could not be reached or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RpcFault {
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self.code(), Some(CODE_USER_REJECTED) | Some(CODE_UNAUTHORIZED))
    }

    pub fn is_method_not_found(&self) -> bool {
        self.code() == Some(CODE_METHOD_NOT_FOUND)
    }

    pub fn is_revert(&self) -> bool {
        match self {
            Self::Rpc { code, message, .. } => {
                *code == CODE_EXECUTION_REVERTED || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }

    /// Mapping for `eth_requestAccounts` / `eth_accounts`.
    pub fn into_connect_error(self) -> DaoError {
        if self.is_user_rejection() {
            DaoError::UserRejected(self.to_string())
        } else {
            DaoError::NoProviderAvailable(self.to_string())
        }
    }

    /// Mapping for `eth_call` and other read-only queries.
    pub fn into_read_error(self) -> DaoError {
        DaoError::ReadError(self.to_string())
    }

    /// Mapping for `eth_sendTransaction`.
    pub fn into_write_error(self) -> DaoError {
        if self.is_user_rejection() {
            DaoError::TransactionRejected(self.to_string())
        } else if self.is_revert() {
            DaoError::TransactionReverted(self.to_string())
        } else if matches!(self, Self::Transport(_)) {
            DaoError::NoProviderAvailable(self.to_string())
        } else {
            DaoError::TransactionRejected(self.to_string())
        }
    }
}

/// One JSON-RPC round trip.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Return the `result` member, which may be `null`.
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcFault>;
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize, Debug)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcErrorDetail {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// JSON-RPC over HTTP POST.
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, RpcFault> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RpcFault::Transport(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcFault> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, "rpc request");

        let body = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcFault::Transport(format!("{}: {e}", self.url)))?;

        let status = response.status();
        let parsed: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcFault::Malformed(format!("HTTP {status}: {e}")))?;

        match parsed.error {
            Some(err) => Err(RpcFault::Rpc {
                code: err.code,
                message: err.message,
                data: err.data,
            }),
            None => Ok(parsed.result.unwrap_or(Value::Null)),
        }
    }
}

/// Mined transaction receipt (only the fields this client reads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub block_number: u64,
    /// `None` on pre-Byzantium chains that carry no status field.
    pub success: Option<bool>,
}

/// Typed `eth_*` methods on top of a transport.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// HTTP client for `url`.
    pub fn http(url: &str, timeout_secs: u64) -> Result<Self, RpcFault> {
        Ok(Self::new(Arc::new(HttpTransport::new(url, timeout_secs)?)))
    }

    async fn typed<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, RpcFault> {
        let value = self.transport.request(method, params).await?;
        serde_json::from_value(value).map_err(|e| RpcFault::Malformed(format!("{method}: {e}")))
    }

    pub async fn request_accounts(&self) -> Result<Vec<Address>, RpcFault> {
        let raw: Vec<String> = self.typed("eth_requestAccounts", json!([])).await?;
        parse_all(&raw)
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, RpcFault> {
        let raw: Vec<String> = self.typed("eth_accounts", json!([])).await?;
        parse_all(&raw)
    }

    pub async fn chain_id(&self) -> Result<u64, RpcFault> {
        let raw: String = self.typed("eth_chainId", json!([])).await?;
        parse_quantity(&raw)
    }

    pub async fn client_version(&self) -> Result<String, RpcFault> {
        self.typed("web3_clientVersion", json!([])).await
    }

    pub async fn block_number(&self) -> Result<u64, RpcFault> {
        let raw: String = self.typed("eth_blockNumber", json!([])).await?;
        parse_quantity(&raw)
    }

    /// Submit a transaction for the node to sign with `from`.
    pub async fn send_transaction(&self, from: Address, to: Address, data: &[u8]) -> Result<B256, RpcFault> {
        let tx = json!({
            "from": from,
            "to": to,
            "data": format!("0x{}", hex::encode(data)),
        });
        let raw: String = self.typed("eth_sendTransaction", json!([tx])).await?;
        B256::from_str(&raw).map_err(|e| RpcFault::Malformed(format!("transaction hash {raw}: {e}")))
    }

    /// `eth_call` at the latest block; returns raw return data.
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, RpcFault> {
        let tx = json!({
            "to": to,
            "data": format!("0x{}", hex::encode(data)),
        });
        let raw: String = self.typed("eth_call", json!([tx, BLOCK_LATEST])).await?;
        decode_hex(&raw)
    }

    /// `None` while the transaction is pending.
    pub async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, RpcFault> {
        let raw: Option<RawReceipt> = self.typed("eth_getTransactionReceipt", json!([hash])).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let Some(block) = raw.block_number else {
            return Ok(None);
        };
        let success = match raw.status {
            Some(s) => Some(parse_quantity(&s)? == 1),
            None => None,
        };
        Ok(Some(Receipt {
            block_number: parse_quantity(&block)?,
            success,
        }))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn parse_all(raw: &[String]) -> Result<Vec<Address>, RpcFault> {
    raw.iter()
        .map(|s| Address::from_str(s).map_err(|e| RpcFault::Malformed(format!("account {s}: {e}"))))
        .collect()
}

/// Parse a hex-encoded JSON-RPC quantity (`0x1a`).
pub fn parse_quantity(raw: &str) -> Result<u64, RpcFault> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| RpcFault::Malformed(format!("quantity without 0x prefix: {raw}")))?;
    if digits.is_empty() {
        return Err(RpcFault::Malformed("empty quantity".to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|e| RpcFault::Malformed(format!("quantity {raw}: {e}")))
}

fn decode_hex(raw: &str) -> Result<Vec<u8>, RpcFault> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| RpcFault::Malformed(format!("hex data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedTransport;
    use assert_matches::assert_matches;

    fn rpc_err(code: i64, message: &str) -> RpcFault {
        RpcFault::Rpc {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    #[test]
    fn write_error_mapping() {
        assert_matches!(rpc_err(4001, "User denied").into_write_error(), DaoError::TransactionRejected(_));
        assert_matches!(rpc_err(3, "execution reverted").into_write_error(), DaoError::TransactionReverted(_));
        assert_matches!(
            rpc_err(-32000, "VM Exception: reverted with reason string 'ERC20: insufficient allowance'")
                .into_write_error(),
            DaoError::TransactionReverted(_)
        );
        assert_matches!(
            RpcFault::Transport("connection refused".into()).into_write_error(),
            DaoError::NoProviderAvailable(_)
        );
        assert_matches!(rpc_err(-32000, "nonce too low").into_write_error(), DaoError::TransactionRejected(_));
    }

    #[test]
    fn connect_and_read_mapping() {
        assert_matches!(rpc_err(4001, "rejected").into_connect_error(), DaoError::UserRejected(_));
        assert_matches!(
            RpcFault::Transport("refused".into()).into_connect_error(),
            DaoError::NoProviderAvailable(_)
        );
        assert_matches!(rpc_err(3, "reverted").into_read_error(), DaoError::ReadError(_));
    }

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert!(parse_quantity("12").is_err());
        assert!(parse_quantity("0x").is_err());
    }

    #[tokio::test]
    async fn send_transaction_encodes_params() {
        let hash = format!("0x{}", "ab".repeat(32));
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok("eth_sendTransaction", json!(hash));
        let rpc = RpcClient::new(transport.clone());

        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);
        let got = rpc.send_transaction(from, to, &[0xde, 0xad]).await.unwrap();
        assert_eq!(got, B256::repeat_byte(0xab));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let tx = &calls[0].1[0];
        assert_eq!(tx["data"], "0xdead");
        assert_eq!(Address::from_str(tx["from"].as_str().unwrap()).unwrap(), from);
        assert_eq!(Address::from_str(tx["to"].as_str().unwrap()).unwrap(), to);
    }

    #[tokio::test]
    async fn pending_receipt_is_none() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok("eth_getTransactionReceipt", Value::Null);
        transport.push_ok(
            "eth_getTransactionReceipt",
            json!({"blockNumber": "0x10", "status": "0x0", "transactionHash": "0x00"}),
        );
        let rpc = RpcClient::new(transport);

        assert_eq!(rpc.transaction_receipt(B256::ZERO).await.unwrap(), None);
        assert_eq!(
            rpc.transaction_receipt(B256::ZERO).await.unwrap(),
            Some(Receipt {
                block_number: 16,
                success: Some(false)
            })
        );
    }

    #[tokio::test]
    async fn call_returns_raw_bytes() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok("eth_call", json!("0x0102"));
        let rpc = RpcClient::new(transport.clone());

        assert_eq!(rpc.call(Address::ZERO, &[]).await.unwrap(), vec![1, 2]);
        assert_eq!(transport.calls()[0].1[1], "latest");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_fault() {
        let rpc = RpcClient::http("http://127.0.0.1:9", 2).unwrap();
        assert_matches!(rpc.block_number().await, Err(RpcFault::Transport(_)));
    }
}
