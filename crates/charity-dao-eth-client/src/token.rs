//! Token bindings: the delegatable governance token and the ERC-20 used to
//! pay for it.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use charity_dao_core::chain::{GovernanceToken, PaymentToken, Session, TxHash};
use charity_dao_core::DaoResult;

use crate::abi::{IGovernanceToken, IERC20};
use crate::tx::ContractHandle;

pub struct GovernanceTokenContract {
    contract: ContractHandle,
}

impl GovernanceTokenContract {
    pub fn new(contract: ContractHandle) -> Self {
        Self { contract }
    }
}

#[async_trait]
impl GovernanceToken for GovernanceTokenContract {
    async fn balance_of(&self, account: Address) -> DaoResult<U256> {
        self.contract.read(&IGovernanceToken::balanceOfCall { account }).await
    }

    async fn delegates(&self, account: Address) -> DaoResult<Address> {
        self.contract.read(&IGovernanceToken::delegatesCall { account }).await
    }

    async fn get_votes(&self, account: Address) -> DaoResult<U256> {
        self.contract.read(&IGovernanceToken::getVotesCall { account }).await
    }

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash> {
        self.contract
            .write(session, &IGovernanceToken::transferCall { to, amount })
            .await
    }

    async fn delegate(&self, session: &Session, delegatee: Address) -> DaoResult<TxHash> {
        self.contract
            .write(session, &IGovernanceToken::delegateCall { delegatee })
            .await
    }
}

pub struct Erc20Contract {
    contract: ContractHandle,
}

impl Erc20Contract {
    pub fn new(contract: ContractHandle) -> Self {
        Self { contract }
    }
}

#[async_trait]
impl PaymentToken for Erc20Contract {
    async fn balance_of(&self, account: Address) -> DaoResult<U256> {
        self.contract.read(&IERC20::balanceOfCall { account }).await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> DaoResult<U256> {
        self.contract.read(&IERC20::allowanceCall { owner, spender }).await
    }

    async fn approve(&self, session: &Session, spender: Address, amount: U256) -> DaoResult<TxHash> {
        self.contract
            .write(session, &IERC20::approveCall { spender, amount })
            .await
    }

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash> {
        self.contract.write(session, &IERC20::transferCall { to, amount }).await
    }
}
