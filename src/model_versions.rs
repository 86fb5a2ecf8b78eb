//! Model version lookups and download links.

use std::sync::Arc;

use crate::{
    client::ClientInner,
    errors::Result,
    http::{path_segment, QueryParams},
    params::validate_hash,
    types::ModelVersionDetail,
};

/// Client for model version operations.
#[derive(Clone)]
pub struct ModelVersionsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ModelVersionsClient {
    /// Get a model version with a summary of its parent model.
    pub async fn get(&self, model_version_id: u64) -> Result<ModelVersionDetail> {
        let path = format!("/model-versions/{model_version_id}");
        self.inner
            .get_json(&path, &QueryParams::new(), "model_versions.get")
            .await
    }

    /// Find the model version owning a file with the given hash.
    ///
    /// Typically an AutoV1, AutoV2, SHA256, CRC32 or BLAKE3 hex digest. A blank
    /// hash is rejected locally; an unknown one surfaces as a 404 API error.
    pub async fn by_hash(&self, hash: &str) -> Result<ModelVersionDetail> {
        let hash = hash.trim();
        validate_hash(hash)?;
        let path = format!("/model-versions/by-hash/{}", path_segment(hash));
        self.inner
            .get_json(&path, &QueryParams::new(), "model_versions.by_hash")
            .await
    }

    /// Same as [`crate::Client::download_url`].
    pub fn download_url(&self, model_version_id: u64) -> String {
        self.inner.download_url(model_version_id)
    }
}
