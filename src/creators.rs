use std::sync::Arc;

use crate::{
    client::ClientInner,
    errors::Result,
    params::{QueryParameters, SearchQuery},
    types::{Creator, PaginatedList},
};

/// Client for listing creators.
#[derive(Clone)]
pub struct CreatorsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl CreatorsClient {
    pub async fn list(&self, query: SearchQuery) -> Result<PaginatedList<Creator>> {
        query.validate()?;
        self.inner
            .get_json("/creators", &query.to_query(), "creators.list")
            .await
    }
}
