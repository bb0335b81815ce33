//! charity-dao-core
//!
//! Core primitives for the charity DAO client:
//! - JSON-LD records (DAO, proposal, activity log, member) validated at construction
//! - deployment configuration and its validation
//! - the shared error taxonomy
//! - decimal token amount conversion
//! - collaborator traits for the wallet, contracts and content store
//!
//! Nothing in this crate performs network or filesystem I/O.

pub mod chain;
pub mod config;
pub mod content;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod text;
pub mod units;

pub use crate::errors::{DaoError, DaoResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::chain::{DaoRegistry, GovernanceToken, PaymentToken, Session, TxHash, Wallet};
    pub use crate::config::{validate_config, ChainConfig, ContentStoreConfig, DaoConfig};
    pub use crate::content::ContentStore;
    pub use crate::model::{
        ActivityKind, ActivityLog, Call, CallOperation, DaoProfile, Document, GovernanceDocument, Locator,
        MemberRecord, Proposal, ProposalDraft, ProposalStatus,
    };
    pub use crate::{DaoError, DaoResult};
}
