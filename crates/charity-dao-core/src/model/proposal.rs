//! Proposals and their on-chain calls.
//!
//! A [`ProposalDraft`] is what the user fills in. [`ProposalDraft::build`]
//! validates it against the caller-supplied "today" and produces a
//! [`Proposal`], which is always `Pending`.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;
use uuid::Uuid;

use super::{require_non_blank, Document, ProposalStatus, DAOSTAR_CONTEXT};
use crate::errors::{DaoError, DaoResult};

/// File name used when uploading a proposal document.
pub const PROPOSAL_DOCUMENT_NAME: &str = "proposal.jsonld";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOperation {
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "delegate call")]
    DelegateCall,
}

impl CallOperation {
    pub fn parse(s: &str) -> DaoResult<Self> {
        match s.trim() {
            "call" => Ok(Self::Call),
            "delegate call" | "delegatecall" | "delegate-call" => Ok(Self::DelegateCall),
            other => Err(DaoError::invalid_argument(format!("unknown call operation: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::DelegateCall => "delegate call",
        }
    }
}

impl fmt::Display for CallOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call a proposal would execute. Fields are opaque user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub operation: CallOperation,
    pub from: String,
    pub to: String,
    pub value: String,
    pub data: String,
}

impl Call {
    pub fn validate(&self, idx: usize) -> DaoResult<()> {
        require_non_blank(&self.from, &format!("calls[{idx}].from"))?;
        require_non_blank(&self.to, &format!("calls[{idx}].to"))?;
        require_non_blank(&self.value, &format!("calls[{idx}].value"))?;
        require_non_blank(&self.data, &format!("calls[{idx}].data"))?;
        Ok(())
    }
}

/// User input for a new proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    /// Client-generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl ProposalDraft {
    /// Validate the draft and turn it into a `Pending` proposal of `dao`.
    pub fn build(self, dao: Address, today: Date) -> DaoResult<Proposal> {
        require_non_blank(&self.name, "name")?;
        require_non_blank(&self.content_uri, "contentURI")?;
        if self.start_date < today {
            return Err(DaoError::invalid_argument(
                "startDate must not be in the past",
            ));
        }
        if self.end_date < self.start_date {
            return Err(DaoError::invalid_argument(
                "endDate has to be later than startDate",
            ));
        }
        for (idx, call) in self.calls.iter().enumerate() {
            call.validate(idx)?;
        }

        let id = match self.id {
            Some(id) => {
                require_non_blank(&id, "id")?;
                id
            }
            None => Uuid::new_v4().to_string(),
        };

        Ok(Proposal {
            dao,
            id,
            name: self.name.trim().to_string(),
            content_uri: self.content_uri.trim().to_string(),
            status: ProposalStatus::Pending,
            start_timestamp: to_timestamp(self.start_date),
            end_timestamp: to_timestamp(self.end_date),
            calls: self.calls,
        })
    }
}

/// A validated proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    dao: Address,
    id: String,
    name: String,
    content_uri: String,
    status: ProposalStatus,
    start_timestamp: i64,
    end_timestamp: i64,
    calls: Vec<Call>,
}

#[derive(Serialize)]
struct ProposalLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    dao: String,
    #[serde(rename = "@id")]
    id: &'a str,
    #[serde(rename = "@type")]
    ty: &'static str,
    name: &'a str,
    #[serde(rename = "contentURI")]
    content_uri: &'a str,
    status: ProposalStatus,
    #[serde(rename = "startTimestamp")]
    start_timestamp: i64,
    #[serde(rename = "endTimestamp")]
    end_timestamp: i64,
    calls: &'a [Call],
}

impl Proposal {
    pub fn dao(&self) -> Address {
        self.dao
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_uri(&self) -> &str {
        &self.content_uri
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    pub fn end_timestamp(&self) -> i64 {
        self.end_timestamp
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn to_json_ld(&self) -> DaoResult<serde_json::Value> {
        Ok(serde_json::to_value(self.ld())?)
    }

    /// The document uploaded before `proposalUpdate`.
    pub fn document(&self) -> DaoResult<Document> {
        Document::json_ld(PROPOSAL_DOCUMENT_NAME, &self.ld())
    }

    fn ld(&self) -> ProposalLd<'_> {
        ProposalLd {
            context: DAOSTAR_CONTEXT,
            dao: self.dao.to_string(),
            id: &self.id,
            ty: "proposal",
            name: &self.name,
            content_uri: &self.content_uri,
            status: self.status,
            start_timestamp: self.start_timestamp,
            end_timestamp: self.end_timestamp,
            calls: &self.calls,
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> DaoResult<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| DaoError::invalid_argument(format!("invalid date {s:?}: {e}")))
}

/// Unix seconds of UTC midnight on `date`.
pub fn to_timestamp(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp()
}

mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::macros::format_description;
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let out = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        s.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::macros::date;

    fn draft() -> ProposalDraft {
        ProposalDraft {
            id: Some("6f1c1b3e-0000-4000-8000-000000000001".into()),
            name: "Fund the food bank".into(),
            content_uri: "https://example.org/food-bank".into(),
            start_date: date!(2026 - 11 - 01),
            end_date: date!(2026 - 11 - 08),
            calls: vec![Call {
                operation: CallOperation::Call,
                from: "0x01".into(),
                to: "0x02".into(),
                value: "100".into(),
                data: "0x".into(),
            }],
        }
    }

    #[test]
    fn builds_pending_proposal_with_utc_timestamps() {
        let p = draft().build(Address::ZERO, date!(2026 - 10 - 19)).unwrap();
        assert_eq!(p.status(), ProposalStatus::Pending);
        assert_eq!(p.start_timestamp(), 1_793_491_200);
        assert_eq!(p.end_timestamp() - p.start_timestamp(), 7 * 86_400);
    }

    #[test]
    fn generates_id_when_absent() {
        let mut d = draft();
        d.id = None;
        let p = d.build(Address::ZERO, date!(2026 - 10 - 19)).unwrap();
        assert!(Uuid::parse_str(p.id()).is_ok());
    }

    #[test]
    fn rejects_missing_name_and_content() {
        let mut d = draft();
        d.name = "  ".into();
        let e = d.build(Address::ZERO, date!(2026 - 10 - 19)).unwrap_err();
        assert_matches!(e, DaoError::InvalidArgument(m) if m == "name is required");

        let mut d = draft();
        d.content_uri = String::new();
        assert!(d.build(Address::ZERO, date!(2026 - 10 - 19)).is_err());
    }

    #[test]
    fn rejects_inverted_or_past_dates() {
        let mut d = draft();
        d.end_date = date!(2026 - 10 - 31);
        assert!(d.build(Address::ZERO, date!(2026 - 10 - 19)).is_err());

        assert!(draft().build(Address::ZERO, date!(2026 - 11 - 02)).is_err());
    }

    #[test]
    fn rejects_empty_call_field() {
        let mut d = draft();
        d.calls[0].data = "".into();
        let e = d.build(Address::ZERO, date!(2026 - 10 - 19)).unwrap_err();
        assert!(e.to_string().contains("calls[0].data"));
    }

    #[test]
    fn json_ld_shape() {
        let p = draft().build(Address::ZERO, date!(2026 - 10 - 19)).unwrap();
        let v = p.to_json_ld().unwrap();
        assert_eq!(v["@context"], DAOSTAR_CONTEXT);
        assert_eq!(v["@type"], "proposal");
        assert_eq!(v["status"], "Pending");
        assert_eq!(v["contentURI"], "https://example.org/food-bank");
        assert_eq!(v["calls"][0]["operation"], "call");
        assert_eq!(p.document().unwrap().name, PROPOSAL_DOCUMENT_NAME);
    }

    #[test]
    fn draft_reads_form_json() {
        let raw = r#"{
            "name": "Shelter",
            "contentURI": "https://example.org/shelter",
            "startDate": "2026-12-01",
            "endDate": "2026-12-02",
            "calls": [{"operation": "delegate call", "from": "a", "to": "b", "value": "0", "data": "0x00"}]
        }"#;
        let d: ProposalDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(d.calls[0].operation, CallOperation::DelegateCall);
        assert_eq!(d.start_date, date!(2026 - 12 - 01));
        assert!(d.id.is_none());
    }
}
