use std::sync::Arc;

use crate::{
    client::ClientInner,
    errors::Result,
    params::{QueryParameters, SearchQuery},
    types::{PaginatedList, Tag},
};

/// Client for listing model tags.
#[derive(Clone)]
pub struct TagsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl TagsClient {
    pub async fn list(&self, query: SearchQuery) -> Result<PaginatedList<Tag>> {
        query.validate()?;
        self.inner
            .get_json("/tags", &query.to_query(), "tags.list")
            .await
    }
}
