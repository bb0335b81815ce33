use anyhow::Result;
use alloy_primitives::{Address, U256};
use serde::Serialize;

use charity_dao_core::chain::PaymentToken;
use charity_dao_core::config::DaoConfig;
use charity_dao_core::units::{format_units, parse_purchase_amount};
use charity_dao_hooks::{
    acquire_membership, buy_governance_tokens, delegate_votes, voting_snapshot, TokenPrice, Tokens, VotingSnapshot,
};

use crate::args::{Cli, VotesCommand};
use crate::chain::client::Deployment;
use crate::io::{config, input};
use crate::output;

/// Snapshot with amounts rendered in whole-token units.
#[derive(Debug, Serialize)]
pub struct SnapshotOut {
    pub account: Address,
    pub balance: String,
    pub votes: String,
    pub delegate: Address,
    pub payment_balance: String,
    pub currency: String,
}

impl SnapshotOut {
    fn new(cfg: &DaoConfig, snapshot: &VotingSnapshot, payment_balance: U256) -> Self {
        Self {
            account: snapshot.account,
            balance: format_units(snapshot.balance, cfg.governance_token_decimals),
            votes: format_units(snapshot.votes, cfg.governance_token_decimals),
            delegate: snapshot.delegate,
            payment_balance: format_units(payment_balance, cfg.payment_token_decimals),
            currency: cfg.base_currency.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuyOut {
    pub amount: String,
    pub paid: String,
    pub currency: String,
    pub delivery_tx: String,
    pub registered_member: bool,
    pub snapshot: SnapshotOut,
}

#[derive(Debug, Serialize)]
pub struct DelegateOut {
    pub delegatee: Address,
    pub tx: String,
    pub snapshot: SnapshotOut,
}

pub async fn run(cli: &Cli, cmd: &VotesCommand) -> Result<()> {
    match cmd {
        VotesCommand::Show { address } => show(cli, address.as_deref()).await,
        VotesCommand::Buy { amount, skip_membership } => buy(cli, amount, *skip_membership).await,
        VotesCommand::Delegate { to } => delegate(cli, to.as_deref()).await,
    }
}

async fn show(cli: &Cli, address: Option<&str>) -> Result<()> {
    let cfg = config::load(cli)?;
    let explicit = address.map(input::parse_address).transpose()?;

    let deployment = Deployment::open(cfg)?;
    let account = match explicit {
        Some(a) => a,
        None => deployment.session(cli.account).await?.account,
    };

    let governance = deployment.eth.governance_token();
    let snapshot = voting_snapshot(&governance, account).await?;
    let payment_balance = deployment.eth.payment_token().balance_of(account).await?;
    output::print(&SnapshotOut::new(&deployment.cfg, &snapshot, payment_balance))
}

async fn buy(cli: &Cli, amount: &str, skip_membership: bool) -> Result<()> {
    let cfg = config::load(cli)?;
    let amount = parse_purchase_amount(amount, cfg.governance_token_decimals)?;
    let price = TokenPrice::from_config(&cfg)?;
    price.charge_for(amount)?;

    let deployment = Deployment::open(cfg)?;
    let buyer = deployment.session(cli.account).await?;
    let treasury = deployment.treasury().await?;

    let payment = deployment.eth.payment_token();
    let governance = deployment.eth.governance_token();
    let tokens = Tokens {
        payment: &payment,
        governance: &governance,
    };
    let cfg = &deployment.cfg;

    let pb = output::spinner("buying governance tokens");
    let out = if skip_membership {
        let result = buy_governance_tokens(tokens, &buyer, &treasury, amount, &price).await;
        pb.finish_and_clear();
        let purchase = result?;
        let payment_balance = payment.balance_of(buyer.account).await?;
        BuyOut {
            amount: format_units(purchase.amount, cfg.governance_token_decimals),
            paid: format_units(purchase.total, cfg.payment_token_decimals),
            currency: cfg.base_currency.clone(),
            delivery_tx: purchase.delivery_tx.to_string(),
            registered_member: false,
            snapshot: SnapshotOut::new(cfg, &purchase.snapshot, payment_balance),
        }
    } else {
        let registry = deployment.eth.registry();
        let result = acquire_membership(
            deployment.store.as_ref(),
            &registry,
            tokens,
            cfg.dao_address,
            &buyer,
            &treasury,
            amount,
            &price,
        )
        .await;
        pb.finish_and_clear();
        let membership = result?;
        let payment_balance = payment.balance_of(buyer.account).await?;
        BuyOut {
            amount: format_units(membership.purchase.amount, cfg.governance_token_decimals),
            paid: format_units(membership.purchase.total, cfg.payment_token_decimals),
            currency: cfg.base_currency.clone(),
            delivery_tx: membership.purchase.delivery_tx.to_string(),
            registered_member: membership.member_tx.is_some(),
            snapshot: SnapshotOut::new(cfg, &membership.snapshot, payment_balance),
        }
    };
    output::print(&out)
}

async fn delegate(cli: &Cli, to: Option<&str>) -> Result<()> {
    let cfg = config::load(cli)?;
    let explicit = to.map(input::parse_address).transpose()?;

    let deployment = Deployment::open(cfg)?;
    let session = deployment.session(cli.account).await?;
    let delegatee = explicit.unwrap_or(session.account);

    let governance = deployment.eth.governance_token();
    let tx = delegate_votes(&governance, &session, delegatee).await?;
    let snapshot = voting_snapshot(&governance, session.account).await?;
    let payment_balance = deployment.eth.payment_token().balance_of(session.account).await?;

    output::print(&DelegateOut {
        delegatee,
        tx: tx.to_string(),
        snapshot: SnapshotOut::new(&deployment.cfg, &snapshot, payment_balance),
    })
}
