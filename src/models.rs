//! Models catalog API client.
//!
//! Search and browse models, or fetch one model with all of its versions.

use std::sync::Arc;

use crate::{
    client::ClientInner,
    errors::Result,
    http::QueryParams,
    params::{BrowseOptions, ModelSort, ModelsQuery, Period, QueryParameters},
    types::{Model, ModelType, PaginatedList},
};

/// Client for model catalog operations.
///
/// # Example
///
/// ```rust,ignore
/// use civitai::{Client, Config, ModelsQuery, ModelType};
///
/// let client = Client::new(Config::default())?;
/// let page = client
///     .models()
///     .list(ModelsQuery::new().with_query("portrait").with_type(ModelType::Lora))
///     .await?;
/// for model in &page.items {
///     println!("{} ({})", model.name, model.model_type);
/// }
/// ```
#[derive(Clone)]
pub struct ModelsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ModelsClient {
    /// Search models. Page and limit must be positive when set.
    pub async fn list(&self, query: ModelsQuery) -> Result<PaginatedList<Model>> {
        query.validate()?;
        self.inner
            .get_json("/models", &query.to_query(), "models.list")
            .await
    }

    /// Get a model and its versions. A missing model surfaces as a 404 API error.
    pub async fn get(&self, model_id: u64) -> Result<Model> {
        let path = format!("/models/{model_id}");
        self.inner
            .get_json(&path, &QueryParams::new(), "models.get")
            .await
    }

    /// Most downloaded models in `period` (defaults to a week).
    pub async fn most_downloaded(
        &self,
        period: Option<Period>,
        opts: BrowseOptions,
    ) -> Result<PaginatedList<Model>> {
        let query = opts
            .into_query()
            .with_sort(ModelSort::MostDownloaded)
            .with_period(period.unwrap_or(Period::Week));
        self.list(query).await
    }

    /// Most recently published models.
    pub async fn newest(&self, opts: BrowseOptions) -> Result<PaginatedList<Model>> {
        self.list(opts.into_query().with_sort(ModelSort::Newest))
            .await
    }

    /// Best rated models in `period` (defaults to all time).
    pub async fn highest_rated(
        &self,
        period: Option<Period>,
        opts: BrowseOptions,
    ) -> Result<PaginatedList<Model>> {
        let query = opts
            .into_query()
            .with_sort(ModelSort::HighestRated)
            .with_period(period.unwrap_or(Period::AllTime));
        self.list(query).await
    }

    pub async fn by_tag(
        &self,
        tag: impl Into<String>,
        opts: BrowseOptions,
    ) -> Result<PaginatedList<Model>> {
        self.list(opts.into_query().with_tag(tag)).await
    }

    pub async fn by_creator(
        &self,
        username: impl Into<String>,
        opts: BrowseOptions,
    ) -> Result<PaginatedList<Model>> {
        self.list(opts.into_query().with_username(username)).await
    }

    pub async fn by_type(
        &self,
        model_type: ModelType,
        opts: BrowseOptions,
    ) -> Result<PaginatedList<Model>> {
        self.list(opts.into_query().with_type(model_type)).await
    }
}
