use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use alloy_primitives::Address;
use time::{Date, OffsetDateTime};

use charity_dao_core::model::proposal::parse_date;
use charity_dao_core::model::{Call, CallOperation, ProposalDraft};

use crate::args::CreateProposalArgs;

pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path.as_ref()).with_context(|| format!("reading {}", path.as_ref().display()))?;
    let v: serde_json::Value = serde_json::from_str(&raw).map_err(|e| anyhow!("invalid json: {e}"))?;
    Ok(v)
}

pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path.as_ref()).with_context(|| format!("reading {}", path.as_ref().display()))
}

/// Today's date in UTC; proposal dates are compared against it.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_address(s: &str) -> Result<Address> {
    s.trim().parse::<Address>().map_err(|e| anyhow!("invalid address {s}: {e}"))
}

/// Draft from `--file` or from the individual flags.
pub fn proposal_draft(args: &CreateProposalArgs) -> Result<ProposalDraft> {
    let mut draft = match &args.file {
        Some(path) => serde_json::from_value::<ProposalDraft>(read_json_file(path)?)
            .map_err(|e| anyhow!("invalid proposal draft {}: {e}", path.display()))?,
        None => ProposalDraft {
            id: None,
            name: args.name.clone().unwrap_or_default(),
            content_uri: args.content_uri.clone().unwrap_or_default(),
            start_date: parse_date(args.start.as_deref().ok_or_else(|| anyhow!("--start is required"))?)?,
            end_date: parse_date(args.end.as_deref().ok_or_else(|| anyhow!("--end is required"))?)?,
            calls: args.calls.iter().map(|c| parse_call(c)).collect::<Result<_>>()?,
        },
    };
    if args.id.is_some() {
        draft.id = args.id.clone();
    }
    Ok(draft)
}

/// `operation,from,to,value,data`
pub fn parse_call(s: &str) -> Result<Call> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [operation, from, to, value, data] = parts[..] else {
        return Err(anyhow!("--call expects operation,from,to,value,data: {s}"));
    };
    Ok(Call {
        operation: CallOperation::parse(operation)?,
        from: from.to_string(),
        to: to.to_string(),
        value: value.to_string(),
        data: data.to_string(),
    })
}
