//! Content store seam.

use async_trait::async_trait;

use crate::errors::DaoResult;
use crate::model::{Document, Locator};

/// Off-chain store for metadata documents.
///
/// Documents are opaque bytes. A successful upload returns a stable locator;
/// failures are `DaoError::UploadFailed` and are never retried.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn kind(&self) -> &'static str;

    async fn upload(&self, document: &Document) -> DaoResult<Locator>;

    async fn fetch(&self, locator: &Locator) -> DaoResult<Vec<u8>>;
}
