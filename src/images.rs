//! Image gallery API client.

use std::sync::Arc;

use crate::{
    client::ClientInner,
    errors::Result,
    params::{ImagesQuery, QueryParameters},
    types::{Image, PaginatedList},
};

/// Client for browsing images.
///
/// # Example
///
/// ```rust,ignore
/// use civitai::{ImagesQuery, ImageSort, NsfwFilter};
///
/// let page = client.images().list(ImagesQuery {
///     model_version_id: Some(130072),
///     nsfw: Some(NsfwFilter::Enabled(false)),
///     sort: Some(ImageSort::MostReactions),
///     ..Default::default()
/// }).await?;
/// ```
#[derive(Clone)]
pub struct ImagesClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ImagesClient {
    pub async fn list(&self, query: ImagesQuery) -> Result<PaginatedList<Image>> {
        query.validate()?;
        self.inner
            .get_json("/images", &query.to_query(), "images.list")
            .await
    }
}
