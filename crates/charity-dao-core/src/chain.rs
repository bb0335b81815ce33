//! Collaborator traits for the wallet and the deployed contracts.
//!
//! Workflows receive these as explicit dependencies together with a
//! [`Session`]. Writes take the session that signs them; reads take none.
//! Implementations live in `charity-dao-eth-client`; tests use in-memory fakes.

use std::fmt;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::Serialize;

use crate::errors::DaoResult;
use crate::model::Locator;

/// Hash of a submitted transaction.
pub type TxHash = B256;

/// A signing identity the provider authorised for one user-initiated command.
///
/// Sessions are acquired once, passed down, and dropped when the command
/// finishes. Nothing inside a workflow reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub account: Address,
}

impl Session {
    pub fn new(account: Address) -> Self {
        Self { account }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session({})", self.account)
    }
}

/// Wallet/provider adapter.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ask the provider for an account. Opens one prompt per call.
    async fn connect(&self) -> DaoResult<Session>;
}

/// ERC-4824 registry writes for one DAO.
#[async_trait]
pub trait DaoRegistry: Send + Sync {
    async fn dao_update(
        &self,
        session: &Session,
        name: &str,
        description: &str,
        governance_uri: &Locator,
    ) -> DaoResult<TxHash>;

    async fn member_update(&self, session: &Session, member: Address, member_uri: &Locator) -> DaoResult<TxHash>;

    async fn proposal_update(&self, session: &Session, proposal_id: &str, proposal_uri: &Locator) -> DaoResult<TxHash>;

    async fn activity_log_update(
        &self,
        session: &Session,
        activity_id: &str,
        activity_log_uri: &Locator,
    ) -> DaoResult<TxHash>;

    async fn governance_update(&self, session: &Session, governance_uri: &Locator) -> DaoResult<TxHash>;
}

/// Delegatable governance token (ERC-20 votes extension).
#[async_trait]
pub trait GovernanceToken: Send + Sync {
    async fn balance_of(&self, account: Address) -> DaoResult<U256>;

    async fn delegates(&self, account: Address) -> DaoResult<Address>;

    async fn get_votes(&self, account: Address) -> DaoResult<U256>;

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash>;

    async fn delegate(&self, session: &Session, delegatee: Address) -> DaoResult<TxHash>;
}

/// ERC-20 used to pay for governance tokens.
#[async_trait]
pub trait PaymentToken: Send + Sync {
    async fn balance_of(&self, account: Address) -> DaoResult<U256>;

    async fn allowance(&self, owner: Address, spender: Address) -> DaoResult<U256>;

    async fn approve(&self, session: &Session, spender: Address, amount: U256) -> DaoResult<TxHash>;

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash>;
}
