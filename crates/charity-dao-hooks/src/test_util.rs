//! In-memory collaborators for workflow tests.
//!
//! [`FakeDeployment`] plays the content store, the registry and both tokens
//! at once and records every side effect, in order, in one journal. Balances
//! and votes follow ERC-20 votes semantics: an account's voting power is the
//! sum of the balances of every account delegating to it.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use charity_dao_core::chain::{DaoRegistry, GovernanceToken, PaymentToken, Session, TxHash, Wallet};
use charity_dao_core::content::ContentStore;
use charity_dao_core::model::{Document, Locator};
use charity_dao_core::{DaoError, DaoResult};

/// A recorded side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Upload { name: String, locator: Locator },
    DaoUpdate { from: Address, name: String, description: String, governance_uri: Locator },
    MemberUpdate { from: Address, member: Address, uri: Locator },
    ProposalUpdate { from: Address, id: String, uri: Locator },
    ActivityLogUpdate { from: Address, id: String, uri: Locator },
    GovernanceUpdate { from: Address, uri: Locator },
    Approve { owner: Address, spender: Address, amount: U256 },
    PaymentTransfer { from: Address, to: Address, amount: U256 },
    GovernanceTransfer { from: Address, to: Address, amount: U256 },
    Delegate { from: Address, to: Address },
}

impl Event {
    pub fn is_upload(&self) -> bool {
        matches!(self, Event::Upload { .. })
    }

    /// True for anything that would be an on-chain write.
    pub fn is_chain_write(&self) -> bool {
        !self.is_upload()
    }
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Upload,
    Read,
    DaoUpdate,
    MemberUpdate,
    ProposalUpdate,
    ActivityLogUpdate,
    GovernanceUpdate,
    Approve,
    PaymentTransfer,
    GovernanceTransfer,
    Delegate,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    documents: HashMap<String, Vec<u8>>,
    governance_balances: HashMap<Address, U256>,
    delegates: HashMap<Address, Address>,
    payment_balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    /// Approvals above this are recorded as this amount.
    allowance_cap: Option<U256>,
    failing: HashSet<Op>,
    next_tx: u64,
}

impl State {
    fn check(&self, op: Op) -> DaoResult<()> {
        if !self.failing.contains(&op) {
            return Ok(());
        }
        Err(match op {
            Op::Upload => DaoError::upload(format!("injected {op:?} failure")),
            Op::Read => DaoError::read(format!("injected {op:?} failure")),
            _ => DaoError::TransactionRejected(format!("injected {op:?} failure")),
        })
    }

    fn tx(&mut self, event: Event) -> TxHash {
        self.events.push(event);
        self.next_tx += 1;
        B256::left_padding_from(&self.next_tx.to_be_bytes())
    }

    fn balance(&self, account: Address) -> U256 {
        self.governance_balances.get(&account).copied().unwrap_or_default()
    }

    fn votes(&self, account: Address) -> U256 {
        self.delegates
            .iter()
            .filter(|(_, to)| **to == account)
            .map(|(from, _)| self.balance(*from))
            .fold(U256::ZERO, |acc, b| acc + b)
    }
}

/// Content store, registry and tokens backed by one in-memory state.
#[derive(Default)]
pub struct FakeDeployment {
    state: Mutex<State>,
}

impl FakeDeployment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: Op) {
        self.state.lock().failing.insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.state.lock().failing.remove(&op);
    }

    pub fn mint_governance(&self, account: Address, amount: U256) {
        let mut s = self.state.lock();
        let b = s.balance(account);
        s.governance_balances.insert(account, b + amount);
    }

    pub fn mint_payment(&self, account: Address, amount: U256) {
        let mut s = self.state.lock();
        let b = s.payment_balances.get(&account).copied().unwrap_or_default();
        s.payment_balances.insert(account, b + amount);
    }

    /// Make every later approval grant at most `cap`.
    pub fn cap_allowance(&self, cap: U256) {
        self.state.lock().allowance_cap = Some(cap);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().events.clone()
    }

    pub fn governance_balance(&self, account: Address) -> U256 {
        self.state.lock().balance(account)
    }

    pub fn payment_balance(&self, account: Address) -> U256 {
        self.state.lock().payment_balances.get(&account).copied().unwrap_or_default()
    }

    pub fn document(&self, locator: &Locator) -> Option<Vec<u8>> {
        self.state.lock().documents.get(locator.as_str()).cloned()
    }
}

#[async_trait]
impl ContentStore for FakeDeployment {
    fn kind(&self) -> &'static str {
        "fake"
    }

    async fn upload(&self, document: &Document) -> DaoResult<Locator> {
        let mut s = self.state.lock();
        s.check(Op::Upload)?;
        let locator = Locator::parse(&format!("fake://doc/{}", s.documents.len() + 1))?;
        s.documents.insert(locator.as_str().to_string(), document.bytes.clone());
        s.events.push(Event::Upload {
            name: document.name.clone(),
            locator: locator.clone(),
        });
        Ok(locator)
    }

    async fn fetch(&self, locator: &Locator) -> DaoResult<Vec<u8>> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        s.documents
            .get(locator.as_str())
            .cloned()
            .ok_or_else(|| DaoError::read(format!("unknown document {locator}")))
    }
}

#[async_trait]
impl DaoRegistry for FakeDeployment {
    async fn dao_update(
        &self,
        session: &Session,
        name: &str,
        description: &str,
        governance_uri: &Locator,
    ) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::DaoUpdate)?;
        Ok(s.tx(Event::DaoUpdate {
            from: session.account,
            name: name.to_string(),
            description: description.to_string(),
            governance_uri: governance_uri.clone(),
        }))
    }

    async fn member_update(&self, session: &Session, member: Address, member_uri: &Locator) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::MemberUpdate)?;
        Ok(s.tx(Event::MemberUpdate {
            from: session.account,
            member,
            uri: member_uri.clone(),
        }))
    }

    async fn proposal_update(&self, session: &Session, proposal_id: &str, proposal_uri: &Locator) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::ProposalUpdate)?;
        Ok(s.tx(Event::ProposalUpdate {
            from: session.account,
            id: proposal_id.to_string(),
            uri: proposal_uri.clone(),
        }))
    }

    async fn activity_log_update(
        &self,
        session: &Session,
        activity_id: &str,
        activity_log_uri: &Locator,
    ) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::ActivityLogUpdate)?;
        Ok(s.tx(Event::ActivityLogUpdate {
            from: session.account,
            id: activity_id.to_string(),
            uri: activity_log_uri.clone(),
        }))
    }

    async fn governance_update(&self, session: &Session, governance_uri: &Locator) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::GovernanceUpdate)?;
        Ok(s.tx(Event::GovernanceUpdate {
            from: session.account,
            uri: governance_uri.clone(),
        }))
    }
}

#[async_trait]
impl GovernanceToken for FakeDeployment {
    async fn balance_of(&self, account: Address) -> DaoResult<U256> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        Ok(s.balance(account))
    }

    async fn delegates(&self, account: Address) -> DaoResult<Address> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        Ok(s.delegates.get(&account).copied().unwrap_or(Address::ZERO))
    }

    async fn get_votes(&self, account: Address) -> DaoResult<U256> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        Ok(s.votes(account))
    }

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::GovernanceTransfer)?;
        let from = session.account;
        let have = s.balance(from);
        if have < amount {
            return Err(DaoError::TransactionReverted(
                "ERC20: transfer amount exceeds balance".to_string(),
            ));
        }
        s.governance_balances.insert(from, have - amount);
        let b = s.balance(to);
        s.governance_balances.insert(to, b + amount);
        Ok(s.tx(Event::GovernanceTransfer { from, to, amount }))
    }

    async fn delegate(&self, session: &Session, delegatee: Address) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::Delegate)?;
        s.delegates.insert(session.account, delegatee);
        Ok(s.tx(Event::Delegate {
            from: session.account,
            to: delegatee,
        }))
    }
}

#[async_trait]
impl PaymentToken for FakeDeployment {
    async fn balance_of(&self, account: Address) -> DaoResult<U256> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        Ok(s.payment_balances.get(&account).copied().unwrap_or_default())
    }

    async fn allowance(&self, owner: Address, spender: Address) -> DaoResult<U256> {
        let s = self.state.lock();
        s.check(Op::Read)?;
        Ok(s.allowances.get(&(owner, spender)).copied().unwrap_or_default())
    }

    async fn approve(&self, session: &Session, spender: Address, amount: U256) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::Approve)?;
        let granted = match s.allowance_cap {
            Some(cap) if cap < amount => cap,
            _ => amount,
        };
        s.allowances.insert((session.account, spender), granted);
        Ok(s.tx(Event::Approve {
            owner: session.account,
            spender,
            amount,
        }))
    }

    async fn transfer(&self, session: &Session, to: Address, amount: U256) -> DaoResult<TxHash> {
        let mut s = self.state.lock();
        s.check(Op::PaymentTransfer)?;
        let from = session.account;
        let have = s.payment_balances.get(&from).copied().unwrap_or_default();
        if have < amount {
            return Err(DaoError::TransactionReverted(
                "ERC20: transfer amount exceeds balance".to_string(),
            ));
        }
        s.payment_balances.insert(from, have - amount);
        let b = s.payment_balances.get(&to).copied().unwrap_or_default();
        s.payment_balances.insert(to, b + amount);
        Ok(s.tx(Event::PaymentTransfer { from, to, amount }))
    }
}

/// Wallet that always hands out the same account and counts prompts.
pub struct FakeWallet {
    account: Option<Address>,
    prompts: Mutex<usize>,
}

impl FakeWallet {
    pub fn new(account: Address) -> Self {
        Self {
            account: Some(account),
            prompts: Mutex::new(0),
        }
    }

    /// A wallet whose user dismisses every prompt.
    pub fn rejecting() -> Self {
        Self {
            account: None,
            prompts: Mutex::new(0),
        }
    }

    pub fn prompts(&self) -> usize {
        *self.prompts.lock()
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    async fn connect(&self) -> DaoResult<Session> {
        *self.prompts.lock() += 1;
        self.account
            .map(Session::new)
            .ok_or_else(|| DaoError::UserRejected("user closed the prompt".to_string()))
    }
}
