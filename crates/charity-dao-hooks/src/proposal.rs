//! Proposal workflows.
//!
//! A proposal submission is exactly one upload followed by exactly one
//! `proposalUpdate`. The activity log entry is a separate staged document and
//! a separate registry write; callers run [`record_activity`] after
//! [`submit_proposal`] succeeds so each failure names its own document.

use alloy_primitives::Address;
use tracing::info;

use charity_dao_core::chain::{DaoRegistry, Session, TxHash};
use charity_dao_core::content::ContentStore;
use charity_dao_core::model::{ActivityKind, ActivityLog, Locator, Proposal};
use charity_dao_core::{DaoError, DaoResult};

use crate::staging::{commit, stage, Published};

/// Upload the proposal document and record its locator with `proposalUpdate`.
pub async fn submit_proposal(
    store: &dyn ContentStore,
    registry: &dyn DaoRegistry,
    session: &Session,
    proposal: &Proposal,
) -> DaoResult<Published> {
    let staged = stage(store, &proposal.document()?).await?;
    let published = commit(&staged, registry.proposal_update(session, proposal.id(), &staged.locator)).await?;
    info!(id = proposal.id(), status = %proposal.status(), tx = %published.tx, "proposal submitted");
    Ok(published)
}

/// Log a submission by the session account against `proposal_id`.
pub async fn record_activity(
    store: &dyn ContentStore,
    registry: &dyn DaoRegistry,
    session: &Session,
    dao: Address,
    proposal_id: &str,
) -> DaoResult<Published> {
    let log = ActivityLog::new(dao, proposal_id, ActivityKind::Submission, session.account)?;
    let staged = stage(store, &log.document()?).await?;
    let published = commit(&staged, registry.activity_log_update(session, &log.id, &staged.locator)).await?;
    info!(id = proposal_id, tx = %published.tx, "activity logged");
    Ok(published)
}

/// Re-run `proposalUpdate` for a document staged by an earlier attempt.
pub async fn commit_proposal(
    registry: &dyn DaoRegistry,
    session: &Session,
    proposal_id: &str,
    locator: &Locator,
) -> DaoResult<TxHash> {
    if proposal_id.trim().is_empty() {
        return Err(DaoError::invalid_argument("proposal id is required"));
    }
    let tx = registry.proposal_update(session, proposal_id, locator).await?;
    info!(id = proposal_id, %locator, %tx, "staged proposal committed");
    Ok(tx)
}
