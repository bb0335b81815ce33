//! Charity DAO data models.
//!
//! Every record that leaves this client is a small JSON-LD document following
//! the DAOstar (ERC-4824) vocabulary. The documents are uploaded to a content
//! store and only their [`Locator`] is written on-chain.
//!
//! Design goals:
//! - **Validated at construction:** constructors reject blank names, empty call
//!   fields and inverted date ranges, so a value of these types is always
//!   publishable.
//! - **Explicit tags:** every document type serializes its own `@type` and
//!   `@context`; there are no ad hoc JSON objects.
//! - **Minimal policy:** proposal status transitions are not validated here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DaoError, DaoResult};

pub mod proposal;
pub mod records;
pub mod status;

pub use proposal::{Call, CallOperation, Proposal, ProposalDraft};
pub use records::{ActivityKind, ActivityLog, DaoProfile, GovernanceDocument, MemberRecord};
pub use status::ProposalStatus;

/// JSON-LD context shared by all DAOstar documents.
pub const DAOSTAR_CONTEXT: &str = "http://www.daostar.org/schemas";

/// Stable content-addressed URI returned by a content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator(String);

impl Locator {
    /// Parse a locator. It must be a non-empty URI with a scheme.
    pub fn parse(s: &str) -> DaoResult<Self> {
        let s = s.trim();
        let Some((scheme, rest)) = s.split_once(':') else {
            return Err(DaoError::invalid_argument(format!("locator has no scheme: {s}")));
        };
        let scheme_ok = scheme
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
        if !scheme_ok || rest.trim_start_matches('/').is_empty() {
            return Err(DaoError::invalid_argument(format!("invalid locator: {s}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map(|(s, _)| s).unwrap_or_default()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Locator {
    type Error = DaoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locator::parse(&value)
    }
}

impl From<Locator> for String {
    fn from(value: Locator) -> Self {
        value.0
    }
}

/// A named, serialized document ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name presented to the content store (e.g. `proposal.jsonld`).
    pub name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Document {
    /// Serialize a JSON-LD record.
    pub fn json_ld<T: Serialize>(name: impl Into<String>, value: &T) -> DaoResult<Self> {
        Ok(Self {
            name: name.into(),
            media_type: "application/ld+json",
            bytes: serde_json::to_vec(value)?,
        })
    }

    pub fn text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            media_type: "text/plain",
            bytes: text.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reject blank required fields with a stable message.
pub(crate) fn require_non_blank(value: &str, field: &str) -> DaoResult<()> {
    if value.trim().is_empty() {
        Err(DaoError::invalid_argument(format!("{field} is required")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_accepts_portal_and_digest_uris() {
        let l = Locator::parse("https://siasky.net/AADZltLKQ8wKm247ONj1rcNrEphq-_vHFc-OXj6Oe6fA_w").unwrap();
        assert_eq!(l.scheme(), "https");
        let l = Locator::parse("sha256://00ff").unwrap();
        assert_eq!(l.scheme(), "sha256");
    }

    #[test]
    fn locator_rejects_garbage() {
        assert!(Locator::parse("").is_err());
        assert!(Locator::parse("no-scheme").is_err());
        assert!(Locator::parse("1abc://x").is_err());
        assert!(Locator::parse("https://").is_err());
    }

    #[test]
    fn locator_serializes_as_plain_string() {
        let l = Locator::parse("sha256://beef").unwrap();
        assert_eq!(serde_json::to_string(&l).unwrap(), "\"sha256://beef\"");
        let back: Locator = serde_json::from_str("\"sha256://beef\"").unwrap();
        assert_eq!(back, l);
        assert!(serde_json::from_str::<Locator>("\"nope\"").is_err());
    }
}
