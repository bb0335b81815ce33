//! DAO, governance, activity log and member records.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::{require_non_blank, Document, Locator, DAOSTAR_CONTEXT};
use crate::errors::{DaoError, DaoResult};
use crate::text::normalize_text;

pub const GOVERNANCE_DOCUMENT_NAME: &str = "governance.jsonld";
pub const ACTIVITY_LOG_DOCUMENT_NAME: &str = "activityLog.jsonld";
pub const MEMBER_DOCUMENT_NAME: &str = "member.jsonld";

/// Voting rules used when the user does not supply any.
pub const DEFAULT_GOVERNANCE_TEXT: &str = "User can vote for, against or abstain.\n\n\
A proposal must have strictly more \"for\" votes than \"against\" votes to pass.\n\n\
\"For\" and \"abstain\" votes count towards the quorum. \"Against\" votes don't.\n";

/// Free-form governance rules, normalized before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceDocument {
    text: String,
}

impl GovernanceDocument {
    pub fn new(text: &str) -> DaoResult<Self> {
        let text = normalize_text(text);
        require_non_blank(&text, "governance")?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document(&self) -> Document {
        Document::text(GOVERNANCE_DOCUMENT_NAME, &self.text)
    }
}

impl Default for GovernanceDocument {
    fn default() -> Self {
        Self {
            text: DEFAULT_GOVERNANCE_TEXT.to_string(),
        }
    }
}

/// What the user edits on the DAO page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoProfile {
    name: String,
    description: String,
    governance: GovernanceDocument,
}

impl DaoProfile {
    pub fn new(name: &str, description: &str, governance: GovernanceDocument) -> DaoResult<Self> {
        require_non_blank(name, "name")?;
        require_non_blank(description, "description")?;
        Ok(Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            governance,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn governance(&self) -> &GovernanceDocument {
        &self.governance
    }

    /// The DAO record as it reads once the governance document is stored.
    pub fn record(&self, governance_uri: &Locator) -> DaoRecord {
        DaoRecord {
            context: DAOSTAR_CONTEXT.to_string(),
            ty: "DAO".to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            governance_uri: governance_uri.clone(),
        }
    }
}

impl Default for DaoProfile {
    fn default() -> Self {
        Self {
            name: "Charity DAO".to_string(),
            description: "Allocates funds to charities.".to_string(),
            governance: GovernanceDocument::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoRecord {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "governanceURI")]
    pub governance_uri: Locator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Submission,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRef {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub ty: String,
    pub activity: ActivityKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    #[serde(rename = "@type")]
    pub ty: String,
    pub address: Address,
}

/// Activity log entry: who did what to which proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(rename = "@context")]
    pub context: String,
    pub dao: Address,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub ty: String,
    pub proposal: ProposalRef,
    pub member: MemberRef,
}

impl ActivityLog {
    /// The activity id reuses the proposal id.
    pub fn new(dao: Address, proposal_id: &str, kind: ActivityKind, member: Address) -> DaoResult<Self> {
        require_non_blank(proposal_id, "proposal id")?;
        Ok(Self {
            context: DAOSTAR_CONTEXT.to_string(),
            dao,
            id: proposal_id.to_string(),
            ty: "activity".to_string(),
            proposal: ProposalRef {
                id: proposal_id.to_string(),
                ty: "proposal".to_string(),
                activity: kind,
            },
            member: MemberRef {
                ty: "EthereumAddress".to_string(),
                address: member,
            },
        })
    }

    pub fn document(&self) -> DaoResult<Document> {
        Document::json_ld(ACTIVITY_LOG_DOCUMENT_NAME, self)
    }
}

/// Member metadata, published on first token acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(rename = "@context")]
    pub context: String,
    pub dao: Address,
    #[serde(rename = "@type")]
    pub ty: String,
    pub address: Address,
}

impl MemberRecord {
    pub fn new(dao: Address, address: Address) -> DaoResult<Self> {
        if address == Address::ZERO {
            return Err(DaoError::invalid_argument("member address must not be zero"));
        }
        Ok(Self {
            context: DAOSTAR_CONTEXT.to_string(),
            dao,
            ty: "EthereumAddress".to_string(),
            address,
        })
    }

    pub fn document(&self) -> DaoResult<Document> {
        Document::json_ld(MEMBER_DOCUMENT_NAME, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const DAO: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const ALICE: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    #[test]
    fn governance_text_is_normalized() {
        let g = GovernanceDocument::new("one  \r\ntwo\r\n").unwrap();
        assert_eq!(g.text(), "one\ntwo\n");
        assert!(GovernanceDocument::new(" \n ").is_err());
        assert_eq!(g.document().name, GOVERNANCE_DOCUMENT_NAME);
    }

    #[test]
    fn dao_profile_requires_name_and_description() {
        assert!(DaoProfile::new("", "d", GovernanceDocument::default()).is_err());
        assert!(DaoProfile::new("n", " ", GovernanceDocument::default()).is_err());
        let p = DaoProfile::default();
        let rec = p.record(&Locator::parse("sha256://aa").unwrap());
        let v = serde_json::to_value(rec).unwrap();
        assert_eq!(v["type"], "DAO");
        assert_eq!(v["governanceURI"], "sha256://aa");
    }

    #[test]
    fn activity_log_shape() {
        let log = ActivityLog::new(DAO, "p-1", ActivityKind::Submission, ALICE).unwrap();
        let v = serde_json::to_value(&log).unwrap();
        assert_eq!(v["@type"], "activity");
        assert_eq!(v["@id"], "p-1");
        assert_eq!(v["proposal"]["activity"], "submission");
        assert_eq!(v["member"]["@type"], "EthereumAddress");
        let member: Address = v["member"]["address"].as_str().unwrap().parse().unwrap();
        assert_eq!(member, ALICE);
    }

    #[test]
    fn member_record_rejects_zero_address() {
        assert!(MemberRecord::new(DAO, Address::ZERO).is_err());
        let m = MemberRecord::new(DAO, ALICE).unwrap();
        assert_eq!(m.document().unwrap().name, MEMBER_DOCUMENT_NAME);
    }
}
