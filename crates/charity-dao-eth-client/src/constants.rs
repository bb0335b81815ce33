//! Constants shared by the provider-facing modules.
//!
//! Error codes follow EIP-1193 and JSON-RPC 2.0; keep them stable because the
//! error mapping in `rpc` depends on them.

/// Sent as the JSON-RPC client identifier in logs.
pub const CLIENT_VERSION: &str = concat!("charity-dao-eth-client/", env!("CARGO_PKG_VERSION"));

pub const JSONRPC_VERSION: &str = "2.0";

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;

/// EIP-1193: the requested account or method has not been authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;

/// JSON-RPC 2.0: method does not exist.
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;

/// Geth-style `execution reverted` error code.
pub const CODE_EXECUTION_REVERTED: i64 = 3;

pub const BLOCK_LATEST: &str = "latest";
