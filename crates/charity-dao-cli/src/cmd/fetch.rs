use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use charity_dao_core::hashing::sha256_hex;
use charity_dao_core::model::Locator;

use crate::args::Cli;
use crate::chain::client::open_store;
use crate::io::{config, export};
use crate::output;

#[derive(Debug, Serialize)]
pub struct FetchOut {
    pub locator: Locator,
    pub bytes: usize,
    pub sha256: String,
    pub wrote_to: Option<String>,
}

pub async fn run(cli: &Cli, locator: &str, to: Option<&Path>) -> Result<()> {
    let cfg = config::load(cli)?;
    let locator = Locator::parse(locator)?;
    let store = open_store(&cfg)?;
    let bytes = store.fetch(&locator).await?;

    match to {
        Some(path) => {
            export::write_file(path, &bytes)?;
            output::print(&FetchOut {
                sha256: sha256_hex(&bytes),
                bytes: bytes.len(),
                locator,
                wrote_to: Some(path.display().to_string()),
            })
        }
        None if output::is_json() => output::print(&FetchOut {
            sha256: sha256_hex(&bytes),
            bytes: bytes.len(),
            locator,
            wrote_to: None,
        }),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes)?;
            out.flush()?;
            Ok(())
        }
    }
}
