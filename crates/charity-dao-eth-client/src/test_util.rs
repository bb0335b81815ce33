//! Scripted JSON-RPC transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::rpc::{RpcFault, RpcTransport};

/// Replays queued responses in order and records every request.
///
/// A request whose method does not match the next queued entry fails with
/// `RpcFault::Malformed` so ordering mistakes show up in assertions.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<(String, Result<Value, RpcFault>)>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, method: &str, result: Value) {
        self.push(method, Ok(result));
    }

    pub fn push_err(&self, method: &str, fault: RpcFault) {
        self.push(method, Err(fault));
    }

    fn push(&self, method: &str, result: Result<Value, RpcFault>) {
        self.script.lock().unwrap().push_back((method.to_string(), result));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcFault> {
        self.calls.lock().unwrap().push((method.to_string(), params));
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some((expected, result)) if expected == method => result,
            Some((expected, _)) => Err(RpcFault::Malformed(format!("expected {expected}, got {method}"))),
            None => Err(RpcFault::Malformed(format!("unscripted call {method}"))),
        }
    }
}
