//! Governance token purchase, delegation and voting power.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::{info, warn};

use charity_dao_core::chain::{GovernanceToken, PaymentToken, Session, TxHash};
use charity_dao_core::config::DaoConfig;
use charity_dao_core::units::purchase_total;
use charity_dao_core::{DaoError, DaoResult};

/// The two token contracts a purchase touches.
#[derive(Clone, Copy)]
pub struct Tokens<'a> {
    pub payment: &'a dyn PaymentToken,
    pub governance: &'a dyn GovernanceToken,
}

/// Price of one whole governance token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPrice {
    /// Payment-token base units per whole governance token.
    pub per_token: U256,
    pub governance_decimals: u8,
}

impl TokenPrice {
    pub fn from_config(cfg: &DaoConfig) -> DaoResult<Self> {
        Ok(Self {
            per_token: cfg.price_units()?,
            governance_decimals: cfg.governance_token_decimals,
        })
    }

    /// Payment-token units owed for `amount` governance base units.
    pub fn total_for(&self, amount: U256) -> DaoResult<U256> {
        purchase_total(amount, self.per_token, self.governance_decimals)
    }

    /// [`total_for`](Self::total_for), refusing amounts too small to cost anything.
    pub fn charge_for(&self, amount: U256) -> DaoResult<U256> {
        let total = self.total_for(amount)?;
        if total.is_zero() {
            return Err(DaoError::invalid_argument("purchase total rounds to zero"));
        }
        Ok(total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purchase {
    pub buyer: Address,
    /// Governance token base units delivered.
    pub amount: U256,
    /// Payment token base units paid.
    pub total: U256,
    pub approve_tx: TxHash,
    pub payment_tx: TxHash,
    pub delivery_tx: TxHash,
    /// Re-read after delivery.
    pub snapshot: VotingSnapshot,
}

/// Balance, voting power and delegate of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VotingSnapshot {
    pub account: Address,
    pub balance: U256,
    pub votes: U256,
    /// Zero address when the account never delegated.
    pub delegate: Address,
}

/// Buy `amount` governance base units from the treasury.
///
/// The buyer approves the treasury for the total, the allowance is read back,
/// and only if it covers the total does the buyer pay and the treasury
/// deliver. A short allowance ends the workflow with the soft
/// `DaoError::InsufficientAllowance` and no transfer. An amount whose price
/// rounds down to zero is rejected before any call.
pub async fn buy_governance_tokens(
    tokens: Tokens<'_>,
    buyer: &Session,
    treasury: &Session,
    amount: U256,
    price: &TokenPrice,
) -> DaoResult<Purchase> {
    if amount.is_zero() {
        return Err(DaoError::invalid_argument("amount must be greater than zero"));
    }
    let total = price.charge_for(amount)?;

    let approve_tx = tokens.payment.approve(buyer, treasury.account, total).await?;
    let available = tokens.payment.allowance(buyer.account, treasury.account).await?;
    if available < total {
        warn!(
            buyer = %buyer.account,
            required = %total,
            %available,
            "allowance below purchase total, nothing transferred"
        );
        return Err(DaoError::InsufficientAllowance {
            required: total,
            available,
        });
    }

    let payment_tx = tokens.payment.transfer(buyer, treasury.account, total).await?;
    let delivery_tx = tokens.governance.transfer(treasury, buyer.account, amount).await?;
    info!(buyer = %buyer.account, %amount, %total, "governance tokens purchased");
    let snapshot = voting_snapshot(tokens.governance, buyer.account).await?;

    Ok(Purchase {
        buyer: buyer.account,
        amount,
        total,
        approve_tx,
        payment_tx,
        delivery_tx,
        snapshot,
    })
}

/// Delegate the session account's voting power to `delegatee`.
///
/// An account without tokens gets the soft `DaoError::NoVotingTokens` and no
/// `delegate` call is made.
pub async fn delegate_votes(
    governance: &dyn GovernanceToken,
    session: &Session,
    delegatee: Address,
) -> DaoResult<TxHash> {
    let balance = governance.balance_of(session.account).await?;
    if balance.is_zero() {
        warn!(account = %session.account, "no governance tokens, delegation skipped");
        return Err(DaoError::NoVotingTokens);
    }
    let tx = governance.delegate(session, delegatee).await?;
    info!(from = %session.account, to = %delegatee, %tx, "votes delegated");
    Ok(tx)
}

pub async fn voting_snapshot(governance: &dyn GovernanceToken, account: Address) -> DaoResult<VotingSnapshot> {
    let balance = governance.balance_of(account).await?;
    let votes = governance.get_votes(account).await?;
    let delegate = governance.delegates(account).await?;
    Ok(VotingSnapshot {
        account,
        balance,
        votes,
        delegate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_from_default_config() {
        let price = TokenPrice::from_config(&DaoConfig::default()).unwrap();
        // 10 USDC (6 decimals) per token; 2.5 tokens cost 25 USDC.
        let amount = U256::from(2_500_000_000_000_000_000u128);
        assert_eq!(price.total_for(amount).unwrap(), U256::from(25_000_000u64));
    }

    #[test]
    fn dust_amount_cannot_be_charged() {
        let price = TokenPrice::from_config(&DaoConfig::default()).unwrap();
        // One base unit is worth 10^-11 USDC units.
        assert_eq!(price.total_for(U256::from(1u64)).unwrap(), U256::ZERO);
        let err = price.charge_for(U256::from(1u64)).unwrap_err();
        assert!(err.to_string().contains("rounds to zero"));
        assert_eq!(price.charge_for(U256::from(100_000_000_000u64)).unwrap(), U256::from(1u64));
    }
}
