//! charity-dao-store
//!
//! Content store clients for charity DAO metadata documents.
//!
//! Backends:
//! - `local`: content-addressed blobs under a directory (`sha256://` locators)
//! - `skynet`: a Skynet portal (`{portal}/{skylink}` locators)
//!
//! Both implement [`charity_dao_core::content::ContentStore`]. Stores never
//! retry; the first failure is returned as `DaoError::UploadFailed`.

#[cfg(feature = "fs")]
pub mod local;

#[cfg(feature = "skynet")]
pub mod skynet;

use charity_dao_core::config::ContentStoreConfig;
use charity_dao_core::content::ContentStore;
use charity_dao_core::{DaoError, DaoResult};

/// Open the store described by `cfg`.
#[cfg_attr(not(feature = "skynet"), allow(unused_variables))]
pub fn open(cfg: &ContentStoreConfig, request_timeout_secs: u64) -> DaoResult<Box<dyn ContentStore>> {
    match cfg {
        #[cfg(feature = "fs")]
        ContentStoreConfig::Local { root } => Ok(Box::new(local::LocalStore::new(root.clone()))),
        #[cfg(feature = "skynet")]
        ContentStoreConfig::Skynet { portal_url, api_key } => Ok(Box::new(skynet::SkynetStore::new(
            portal_url,
            api_key.as_deref(),
            request_timeout_secs,
        )?)),
        #[allow(unreachable_patterns)]
        other => Err(DaoError::config(format!(
            "content store '{}' is not enabled in this build",
            other.kind()
        ))),
    }
}

#[cfg(all(test, feature = "fs"))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn skynet() -> ContentStoreConfig {
        ContentStoreConfig::Skynet {
            portal_url: "https://siasky.net".into(),
            api_key: None,
        }
    }

    #[cfg(not(feature = "skynet"))]
    #[test]
    fn backend_left_out_of_the_build_is_a_config_error() {
        assert_matches!(
            open(&skynet(), 30).err(),
            Some(DaoError::Config(ref m)) if m.contains("'skynet' is not enabled")
        );
    }

    #[cfg(feature = "skynet")]
    #[test]
    fn opens_skynet_store_with_request_timeout() {
        let store = open(&skynet(), 5).unwrap();
        assert_eq!(store.kind(), "skynet");
    }

    #[test]
    fn opens_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(
            &ContentStoreConfig::Local {
                root: dir.path().to_path_buf(),
            },
            30,
        )
        .unwrap();
        assert_eq!(store.kind(), "local");
    }
}
