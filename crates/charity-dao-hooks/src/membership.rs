//! Membership: buy governance tokens, self-delegate, and register new members.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::info;

use charity_dao_core::chain::{DaoRegistry, Session, TxHash};
use charity_dao_core::content::ContentStore;
use charity_dao_core::model::{Locator, MemberRecord};
use charity_dao_core::DaoResult;

use crate::staging::{commit, stage};
use crate::votes::{buy_governance_tokens, delegate_votes, voting_snapshot, Purchase, TokenPrice, Tokens, VotingSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub purchase: Purchase,
    pub delegation_tx: TxHash,
    /// Re-read after the delegation.
    pub snapshot: VotingSnapshot,
    pub member_document: Locator,
    /// Set only when the buyer held no tokens before this purchase.
    pub member_tx: Option<TxHash>,
}

/// Buy tokens for `buyer`, delegate them to the buyer, and publish the member
/// document. The `memberUpdate` write happens only for first-time holders.
#[allow(clippy::too_many_arguments)]
pub async fn acquire_membership(
    store: &dyn ContentStore,
    registry: &dyn DaoRegistry,
    tokens: Tokens<'_>,
    dao: Address,
    buyer: &Session,
    treasury: &Session,
    amount: U256,
    price: &TokenPrice,
) -> DaoResult<Membership> {
    let member = MemberRecord::new(dao, buyer.account)?;
    let balance_before = tokens.governance.balance_of(buyer.account).await?;

    let purchase = buy_governance_tokens(tokens, buyer, treasury, amount, price).await?;
    let delegation_tx = delegate_votes(tokens.governance, buyer, buyer.account).await?;
    let snapshot = voting_snapshot(tokens.governance, buyer.account).await?;

    let staged = stage(store, &member.document()?).await?;
    let member_tx = if balance_before.is_zero() {
        let published = commit(&staged, registry.member_update(buyer, buyer.account, &staged.locator)).await?;
        info!(member = %buyer.account, tx = %published.tx, "new member registered");
        Some(published.tx)
    } else {
        None
    };

    Ok(Membership {
        purchase,
        delegation_tx,
        snapshot,
        member_document: staged.locator,
        member_tx,
    })
}
