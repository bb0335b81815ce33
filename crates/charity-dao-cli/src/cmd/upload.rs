use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use charity_dao_core::model::{Document, Locator};
use charity_dao_hooks::staging::stage;

use crate::args::Cli;
use crate::chain::client::open_store;
use crate::io::config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub name: String,
    pub store: &'static str,
    pub locator: Locator,
    pub sha256: String,
    pub bytes: usize,
}

pub async fn run(cli: &Cli, path: &Path, name: Option<&str>) -> Result<()> {
    let cfg = config::load(cli)?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let name = match name {
        Some(n) => n.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("cannot derive a document name from {}", path.display()))?,
    };
    let media_type = if name.ends_with(".jsonld") || name.ends_with(".json") {
        "application/ld+json"
    } else {
        "text/plain"
    };
    let document = Document {
        name,
        media_type,
        bytes,
    };

    let store = open_store(&cfg)?;
    let staged = stage(store.as_ref(), &document).await?;

    output::print(&UploadOut {
        name: staged.name,
        store: store.kind(),
        locator: staged.locator,
        sha256: staged.digest,
        bytes: document.len(),
    })
}
