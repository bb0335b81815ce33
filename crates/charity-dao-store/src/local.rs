//! Content-addressed local store.
//!
//! Layout: `{root}/objects/{sha256-hex}`. The locator of a document is
//! `sha256://{hex}` so identical bytes always map to the same locator and a
//! rewrite of an existing object is a no-op.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytesize::ByteSize;
use tracing::{debug, info};

use charity_dao_core::content::ContentStore;
use charity_dao_core::hashing::{require_sha256_hex, sha256_hex};
use charity_dao_core::model::{Document, Locator};
use charity_dao_core::{DaoError, DaoResult};

pub const LOCAL_SCHEME: &str = "sha256";

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    fn object_path(&self, digest: &str) -> PathBuf {
        self.objects_dir().join(digest)
    }

    /// Digest named by a `sha256://` locator.
    pub fn digest_of(locator: &Locator) -> DaoResult<String> {
        if locator.scheme() != LOCAL_SCHEME {
            return Err(DaoError::invalid_argument(format!(
                "not a local store locator: {locator}"
            )));
        }
        let digest = locator
            .as_str()
            .trim_start_matches("sha256:")
            .trim_start_matches('/')
            .to_ascii_lowercase();
        require_sha256_hex(&digest)?;
        Ok(digest)
    }
}

#[async_trait]
impl ContentStore for LocalStore {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn upload(&self, document: &Document) -> DaoResult<Locator> {
        let digest = sha256_hex(&document.bytes);
        let path = self.object_path(&digest);

        tokio::fs::create_dir_all(self.objects_dir())
            .await
            .map_err(|e| DaoError::upload(format!("create {}: {e}", self.objects_dir().display())))?;

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(name = %document.name, %digest, "object already present");
        } else {
            // Write under a temporary name first so readers never see a partial object.
            let tmp = path.with_extension("partial");
            tokio::fs::write(&tmp, &document.bytes)
                .await
                .map_err(|e| DaoError::upload(format!("write {}: {e}", tmp.display())))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(|e| DaoError::upload(format!("rename {}: {e}", path.display())))?;
        }

        let locator = Locator::parse(&format!("{LOCAL_SCHEME}://{digest}"))?;
        info!(
            name = %document.name,
            size = %ByteSize::b(document.len() as u64),
            %locator,
            "document stored"
        );
        Ok(locator)
    }

    async fn fetch(&self, locator: &Locator) -> DaoResult<Vec<u8>> {
        let digest = Self::digest_of(locator)?;
        let path = self.object_path(&digest);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DaoError::read(format!("{locator}: {e}")))?;

        if sha256_hex(&bytes) != digest {
            return Err(DaoError::read(format!("{locator}: stored object is corrupt")));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn doc(bytes: &[u8]) -> Document {
        Document {
            name: "proposal.jsonld".into(),
            media_type: "application/ld+json",
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn upload_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let loc = store.upload(&doc(b"{\"a\":1}")).await.unwrap();
        assert_eq!(loc.scheme(), "sha256");
        assert_eq!(store.fetch(&loc).await.unwrap(), b"{\"a\":1}");
    }

    #[tokio::test]
    async fn identical_bytes_share_a_locator() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let a = store.upload(&doc(b"same")).await.unwrap();
        let b = store.upload(&doc(b"same")).await.unwrap();
        let c = store.upload(&doc(b"other")).await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let objects = std::fs::read_dir(dir.path().join("objects")).unwrap().count();
        assert_eq!(objects, 2);
    }

    #[tokio::test]
    async fn missing_object_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let loc = Locator::parse(&format!("sha256://{}", "0".repeat(64))).unwrap();
        assert_matches!(store.fetch(&loc).await, Err(DaoError::ReadError(_)));
    }

    #[tokio::test]
    async fn tampered_object_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let loc = store.upload(&doc(b"original")).await.unwrap();

        let digest = LocalStore::digest_of(&loc).unwrap();
        std::fs::write(dir.path().join("objects").join(digest), b"changed").unwrap();
        assert_matches!(store.fetch(&loc).await, Err(DaoError::ReadError(_)));
    }

    #[test]
    fn foreign_locator_rejected() {
        let loc = Locator::parse("https://siasky.net/abc").unwrap();
        assert_matches!(LocalStore::digest_of(&loc), Err(DaoError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn unwritable_root_is_an_upload_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let store = LocalStore::new(&file);
        assert_matches!(store.upload(&doc(b"x")).await, Err(DaoError::UploadFailed(_)));
    }
}
