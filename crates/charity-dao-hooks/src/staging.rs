//! Two-phase publication: stage a document, then commit its locator on-chain.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use charity_dao_core::chain::TxHash;
use charity_dao_core::content::ContentStore;
use charity_dao_core::hashing::sha256_hex;
use charity_dao_core::model::{Document, Locator};
use charity_dao_core::{DaoError, DaoResult};

/// An uploaded document whose locator is not yet on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Staged {
    pub name: String,
    pub locator: Locator,
    /// SHA-256 of the uploaded bytes.
    pub digest: String,
}

/// A document that was staged and committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Published {
    pub locator: Locator,
    pub tx: TxHash,
}

/// Upload `document`. Nothing is written on-chain.
pub async fn stage(store: &dyn ContentStore, document: &Document) -> DaoResult<Staged> {
    let locator = store.upload(document).await?;
    let staged = Staged {
        name: document.name.clone(),
        locator,
        digest: sha256_hex(&document.bytes),
    };
    info!(
        store = store.kind(),
        name = %staged.name,
        locator = %staged.locator,
        digest = %staged.digest,
        "document staged"
    );
    Ok(staged)
}

/// Await the on-chain step recording `staged`.
///
/// A failure is wrapped in `DaoError::Uncommitted` so the orphaned locator
/// reaches the caller.
pub async fn commit<F>(staged: &Staged, write: F) -> DaoResult<Published>
where
    F: Future<Output = DaoResult<TxHash>>,
{
    match write.await {
        Ok(tx) => Ok(Published {
            locator: staged.locator.clone(),
            tx,
        }),
        Err(err) => {
            warn!(
                name = %staged.name,
                locator = %staged.locator,
                error = %err,
                "document uploaded but not recorded on-chain"
            );
            Err(DaoError::uncommitted(staged.locator.clone(), err))
        }
    }
}
