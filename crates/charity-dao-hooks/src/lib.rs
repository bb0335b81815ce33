//! charity-dao-hooks
//!
//! Domain workflows that compose the content store and the contract bindings.
//!
//! Every workflow:
//! - receives its collaborators and the signing [`Session`] explicitly
//! - awaits each step in series and stops at the first failure
//! - never retries and never rolls back earlier steps
//!
//! Documents go through [`staging`]: an upload yields a staged locator, and a
//! failed on-chain step is reported as `DaoError::Uncommitted` carrying that
//! locator so the caller can re-run only the commit.
//!
//! [`Session`]: charity_dao_core::chain::Session

pub mod dao;
pub mod membership;
pub mod proposal;
pub mod staging;
pub mod votes;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_util;


pub use dao::{update_dao, update_governance};
pub use membership::{acquire_membership, Membership};
pub use proposal::{commit_proposal, record_activity, submit_proposal};
pub use staging::{Published, Staged};
pub use votes::{buy_governance_tokens, delegate_votes, voting_snapshot, Purchase, TokenPrice, Tokens, VotingSnapshot};
