//! Error taxonomy shared by every charity DAO crate.
//!
//! Library crates return [`DaoResult`]. The CLI wraps these into `anyhow`
//! at the top level.
//!
//! Two variants are *soft*: [`DaoError::InsufficientAllowance`] and
//! [`DaoError::NoVotingTokens`]. They abort a workflow before any transfer or
//! delegation is attempted and are meant to be shown to the user as warnings.

use alloy_primitives::U256;
use thiserror::Error;

use crate::model::Locator;

pub type DaoResult<T> = Result<T, DaoError>;

#[derive(Debug, Error)]
pub enum DaoError {
    /// The wallet prompt was dismissed.
    #[error("user rejected the connection request: {0}")]
    UserRejected(String),

    /// No compatible provider answered, or it exposes no usable account.
    #[error("no provider available: {0}")]
    NoProviderAvailable(String),

    /// The user declined to sign a transaction.
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// The contract reverted the transaction.
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    /// Provider or network fault on a read-only query.
    #[error("read failed: {0}")]
    ReadError(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance { required: U256, available: U256 },

    #[error("no governance tokens to delegate")]
    NoVotingTokens,

    /// A document was uploaded but its locator never reached the chain.
    #[error("document {locator} was uploaded but not recorded on-chain: {source}")]
    Uncommitted {
        locator: Locator,
        #[source]
        source: Box<DaoError>,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaoError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Wrap a commit-step failure together with the locator it left behind.
    pub fn uncommitted(locator: Locator, source: DaoError) -> Self {
        Self::Uncommitted {
            locator,
            source: Box::new(source),
        }
    }

    /// Soft errors are user-facing warnings, not failures.
    pub fn is_soft(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::InsufficientAllowance { .. } | Self::NoVotingTokens
        )
    }

    /// Unwrap [`DaoError::Uncommitted`] layers.
    pub fn root_cause(&self) -> &DaoError {
        match self {
            Self::Uncommitted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Locator of a document orphaned by this failure, if any.
    pub fn orphaned_locator(&self) -> Option<&Locator> {
        match self {
            Self::Uncommitted { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DaoError {
    fn from(err: serde_json::Error) -> Self {
        DaoError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn uncommitted_exposes_root_cause_and_locator() {
        let loc = Locator::parse("sha256://abcd").unwrap();
        let err = DaoError::uncommitted(loc.clone(), DaoError::TransactionRejected("denied".into()));

        assert_matches!(err.root_cause(), DaoError::TransactionRejected(_));
        assert_eq!(err.orphaned_locator(), Some(&loc));
        assert!(!err.is_soft());
    }

    #[test]
    fn soft_errors() {
        assert!(DaoError::NoVotingTokens.is_soft());
        assert!(DaoError::InsufficientAllowance {
            required: U256::from(2u64),
            available: U256::from(1u64),
        }
        .is_soft());
        assert!(!DaoError::upload("portal down").is_soft());
    }
}
