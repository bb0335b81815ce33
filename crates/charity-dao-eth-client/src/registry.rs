//! ERC-4824 registry binding.

use alloy_primitives::Address;
use async_trait::async_trait;

use charity_dao_core::chain::{DaoRegistry, Session, TxHash};
use charity_dao_core::model::Locator;
use charity_dao_core::DaoResult;

use crate::abi::IERC4824Registry;
use crate::tx::ContractHandle;

/// Registry writes on behalf of a single DAO.
pub struct Erc4824Registry {
    contract: ContractHandle,
    dao: Address,
}

impl Erc4824Registry {
    pub fn new(contract: ContractHandle, dao: Address) -> Self {
        Self { contract, dao }
    }

    pub fn dao(&self) -> Address {
        self.dao
    }
}

#[async_trait]
impl DaoRegistry for Erc4824Registry {
    async fn dao_update(
        &self,
        session: &Session,
        name: &str,
        description: &str,
        governance_uri: &Locator,
    ) -> DaoResult<TxHash> {
        let call = IERC4824Registry::daoUpdateCall {
            daoAddress: self.dao,
            name: name.to_string(),
            description: description.to_string(),
            governanceURI: governance_uri.to_string(),
        };
        self.contract.write(session, &call).await
    }

    async fn member_update(&self, session: &Session, member: Address, member_uri: &Locator) -> DaoResult<TxHash> {
        let call = IERC4824Registry::memberUpdateCall {
            daoAddress: self.dao,
            member,
            memberURI: member_uri.to_string(),
        };
        self.contract.write(session, &call).await
    }

    async fn proposal_update(&self, session: &Session, proposal_id: &str, proposal_uri: &Locator) -> DaoResult<TxHash> {
        let call = IERC4824Registry::proposalUpdateCall {
            daoAddress: self.dao,
            proposalId: proposal_id.to_string(),
            proposalURI: proposal_uri.to_string(),
        };
        self.contract.write(session, &call).await
    }

    async fn activity_log_update(
        &self,
        session: &Session,
        activity_id: &str,
        activity_log_uri: &Locator,
    ) -> DaoResult<TxHash> {
        let call = IERC4824Registry::activityLogUpdateCall {
            daoAddress: self.dao,
            activityId: activity_id.to_string(),
            activityLogURI: activity_log_uri.to_string(),
        };
        self.contract.write(session, &call).await
    }

    async fn governance_update(&self, session: &Session, governance_uri: &Locator) -> DaoResult<TxHash> {
        let call = IERC4824Registry::governanceUpdateCall {
            daoAddress: self.dao,
            governanceURI: governance_uri.to_string(),
        };
        self.contract.write(session, &call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcClient;
    use crate::test_util::ScriptedTransport;
    use alloy_sol_types::SolCall;
    use charity_dao_core::config::ChainConfig;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn proposal_update_targets_registry_with_dao_address() {
        let t = Arc::new(ScriptedTransport::new());
        t.push_ok("eth_sendTransaction", json!(format!("0x{}", "22".repeat(32))));

        let registry_addr = Address::repeat_byte(0xaa);
        let dao = Address::repeat_byte(0xbb);
        let contract = ContractHandle::new(RpcClient::new(t.clone()), registry_addr, ChainConfig::default());
        let registry = Erc4824Registry::new(contract, dao);

        let loc = Locator::parse("https://siasky.net/abc").unwrap();
        let session = Session::new(Address::repeat_byte(0x01));
        registry.proposal_update(&session, "p-1", &loc).await.unwrap();

        let calls = t.calls();
        let tx = &calls[0].1[0];
        let to: Address = tx["to"].as_str().unwrap().parse().unwrap();
        assert_eq!(to, registry_addr);

        let data = hex::decode(tx["data"].as_str().unwrap().trim_start_matches("0x")).unwrap();
        let decoded = IERC4824Registry::proposalUpdateCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.daoAddress, dao);
        assert_eq!(decoded.proposalId, "p-1");
        assert_eq!(decoded.proposalURI, "https://siasky.net/abc");
    }
}
