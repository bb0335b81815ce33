//! Skynet portal client.
//!
//! Upload: multipart `POST {portal}/skynet/skyfile` with a single `file` part.
//! The portal answers `{"skylink": "..."}` and the document locator is
//! `{portal}/{skylink}`, which is also the URL `fetch` downloads from.

use std::time::Duration;

use async_trait::async_trait;
use bytesize::ByteSize;
use reqwest::{header, multipart, Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

use charity_dao_core::content::ContentStore;
use charity_dao_core::model::{Document, Locator};
use charity_dao_core::{DaoError, DaoResult};

const UPLOAD_PATH: &str = "skynet/skyfile";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    skylink: String,
}

#[derive(Debug)]
pub struct SkynetStore {
    portal_url: String,
    client: Client,
}

impl SkynetStore {
    pub fn new(portal_url: &str, api_key: Option<&str>, timeout_secs: u64) -> DaoResult<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| DaoError::config("content_store.api_key is not a valid header value"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DaoError::config(format!("http client: {e}")))?;

        Ok(Self {
            portal_url: portal_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn portal_url(&self) -> &str {
        &self.portal_url
    }

    fn upload_url(&self) -> String {
        format!("{}/{UPLOAD_PATH}", self.portal_url)
    }

    fn locator_for(&self, skylink: &str) -> DaoResult<Locator> {
        let skylink = skylink.trim().trim_start_matches("sia://").trim_matches('/');
        if skylink.is_empty() {
            return Err(DaoError::upload("portal returned an empty skylink"));
        }
        Locator::parse(&format!("{}/{skylink}", self.portal_url))
            .map_err(|e| DaoError::upload(format!("portal returned an unusable skylink: {e}")))
    }

    async fn checked(response: Response, what: &str) -> Result<Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("{what}: HTTP {status}: {}", body.trim()))
    }
}

#[async_trait]
impl ContentStore for SkynetStore {
    fn kind(&self) -> &'static str {
        "skynet"
    }

    async fn upload(&self, document: &Document) -> DaoResult<Locator> {
        let part = multipart::Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(document.media_type)
            .map_err(|e| DaoError::upload(format!("{}: {e}", document.name)))?;
        let form = multipart::Form::new().part("file", part);

        debug!(url = %self.upload_url(), name = %document.name, "uploading to portal");
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| DaoError::upload(format!("{}: {e}", self.portal_url)))?;
        let response = Self::checked(response, "upload").await.map_err(DaoError::upload)?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DaoError::upload(format!("malformed portal response: {e}")))?;

        let locator = self.locator_for(&body.skylink)?;
        info!(
            name = %document.name,
            size = %ByteSize::b(document.len() as u64),
            %locator,
            "document uploaded"
        );
        Ok(locator)
    }

    async fn fetch(&self, locator: &Locator) -> DaoResult<Vec<u8>> {
        let url = match locator.scheme() {
            "http" | "https" => locator.as_str().to_string(),
            "sia" => self
                .locator_for(locator.as_str())
                .map_err(|e| DaoError::read(e.to_string()))?
                .to_string(),
            other => {
                return Err(DaoError::invalid_argument(format!(
                    "skynet store cannot fetch '{other}' locators"
                )))
            }
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DaoError::read(format!("{url}: {e}")))?;
        let response = Self::checked(response, "fetch").await.map_err(DaoError::read)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DaoError::read(format!("{url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn store() -> SkynetStore {
        SkynetStore::new("https://siasky.net/", None, 5).unwrap()
    }

    #[test]
    fn locator_joins_portal_and_skylink() {
        let s = store();
        assert_eq!(s.upload_url(), "https://siasky.net/skynet/skyfile");
        let loc = s.locator_for("AADZltLKQ8wKm247ONj1rcNrEphq").unwrap();
        assert_eq!(loc.as_str(), "https://siasky.net/AADZltLKQ8wKm247ONj1rcNrEphq");
        let loc = s.locator_for("sia://AADZ").unwrap();
        assert_eq!(loc.as_str(), "https://siasky.net/AADZ");
    }

    #[test]
    fn empty_skylink_is_an_upload_failure() {
        assert_matches!(store().locator_for("  "), Err(DaoError::UploadFailed(_)));
    }

    #[test]
    fn portal_response_shape() {
        let r: UploadResponse = serde_json::from_str(r#"{"skylink":"abc","merkleroot":"x","bitfield":0}"#).unwrap();
        assert_eq!(r.skylink, "abc");
    }

    #[test]
    fn bad_api_key_is_a_config_error() {
        assert_matches!(
            SkynetStore::new("https://siasky.net", Some("bad\nkey"), 5),
            Err(DaoError::Config(_))
        );
    }

    #[tokio::test]
    async fn local_locators_are_not_fetchable() {
        let loc = Locator::parse(&format!("sha256://{}", "a".repeat(64))).unwrap();
        assert_matches!(store().fetch(&loc).await, Err(DaoError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn unreachable_portal_is_an_upload_failure() {
        let s = SkynetStore::new("http://127.0.0.1:9", None, 2).unwrap();
        let doc = Document::text("governance.jsonld", "rules");
        assert_matches!(s.upload(&doc).await, Err(DaoError::UploadFailed(_)));
    }
}
