//! Typed parameter bags for list operations.
//!
//! Every bag deserializes from the camelCase argument objects used by the
//! tool layer and writes itself into a [`QueryParams`] using the upstream
//! parameter names.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ValidationError,
    http::QueryParams,
    types::{ModelType, NsfwLevelName},
};

/// A parameter bag that can be checked locally and rendered as a query string.
pub trait QueryParameters {
    /// Local checks run before any request is sent.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn append_to(&self, query: &mut QueryParams);

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.append_to(&mut query);
        query
    }
}

pub(crate) fn ensure_positive(field: &str, value: Option<u32>) -> Result<(), ValidationError> {
    match value {
        Some(0) => Err(ValidationError::new("must be a positive integer").with_field(field)),
        _ => Ok(()),
    }
}

macro_rules! query_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

query_enum!(
    /// Sort order for model listings.
    ModelSort {
        HighestRated => "Highest Rated",
        MostDownloaded => "Most Downloaded",
        Newest => "Newest",
    }
);

query_enum!(
    /// Sort order for image listings.
    ImageSort {
        MostReactions => "Most Reactions",
        MostComments => "Most Comments",
        Newest => "Newest",
    }
);

query_enum!(
    /// Time window used by sorted listings.
    Period {
        AllTime => "AllTime",
        Year => "Year",
        Month => "Month",
        Week => "Week",
        Day => "Day",
    }
);

query_enum!(
    /// Commercial use permission filter.
    CommercialUse {
        None => "None",
        Image => "Image",
        Rent => "Rent",
        Sell => "Sell",
    }
);

query_enum!(
    /// File hash algorithms known to the by-hash lookup. Upstream decides
    /// which digests it accepts; this only describes the common ones.
    HashAlgorithm {
        AutoV1 => "AutoV1",
        AutoV2 => "AutoV2",
        Sha256 => "SHA256",
        Crc32 => "CRC32",
        Blake3 => "BLAKE3",
    }
);

impl HashAlgorithm {
    /// Algorithms whose hex digest has the length of `hash`.
    pub fn candidates(hash: &str) -> Vec<HashAlgorithm> {
        match hash.len() {
            8 => vec![HashAlgorithm::AutoV1, HashAlgorithm::Crc32],
            10 => vec![HashAlgorithm::AutoV2],
            64 => vec![HashAlgorithm::Sha256, HashAlgorithm::Blake3],
            _ => Vec::new(),
        }
    }
}

/// Check a file hash before it is placed in a request path.
///
/// Only a blank hash is rejected here. Length and alphabet are left to
/// upstream, which answers 404 for digests it does not know.
pub fn validate_hash(hash: &str) -> Result<(), ValidationError> {
    if hash.trim().is_empty() {
        return Err(ValidationError::new("hash is required").with_field("hash"));
    }
    Ok(())
}

/// NSFW filter for image listings: a plain toggle or a maximum named level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NsfwFilter {
    Enabled(bool),
    Level(NsfwLevelName),
}

impl fmt::Display for NsfwFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NsfwFilter::Enabled(enabled) => write!(f, "{enabled}"),
            NsfwFilter::Level(level) => f.write_str(level.as_str()),
        }
    }
}

/// Filters for `GET /models`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelsQuery {
    /// Free-text search over model names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Only models published by this creator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ModelType>,
    /// Base model labels, e.g. `SDXL 1.0`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub base_models: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<ModelSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Results per page. Upstream caps this; no cap is applied locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Requires an API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<bool>,
    /// Requires an API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_file_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_credit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_derivatives: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_different_licenses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_commercial_use: Option<CommercialUse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_generation: Option<bool>,
}

impl ModelsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_type(mut self, model_type: ModelType) -> Self {
        self.types.push(model_type);
        self
    }

    pub fn with_sort(mut self, sort: ModelSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = Some(nsfw);
        self
    }
}

impl QueryParameters for ModelsQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("limit", self.limit)?;
        ensure_positive("page", self.page)
    }

    fn append_to(&self, q: &mut QueryParams) {
        q.push_opt("limit", self.limit)
            .push_opt("page", self.page)
            .push_opt("query", self.query.as_deref())
            .push_opt("tag", self.tag.as_deref())
            .push_opt("username", self.username.as_deref())
            .push_all("types", &self.types)
            .push_all("baseModels", &self.base_models)
            .push_all("ids", &self.ids)
            .push_opt("sort", self.sort)
            .push_opt("period", self.period)
            .push_opt("favorites", self.favorites)
            .push_opt("hidden", self.hidden)
            .push_opt("primaryFileOnly", self.primary_file_only)
            .push_opt("allowNoCredit", self.allow_no_credit)
            .push_opt("allowDerivatives", self.allow_derivatives)
            .push_opt("allowDifferentLicenses", self.allow_different_licenses)
            .push_opt("allowCommercialUse", self.allow_commercial_use)
            .push_opt("nsfw", self.nsfw)
            .push_opt("supportsGeneration", self.supports_generation);
    }
}

/// Filters for `GET /images`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<NsfwFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<ImageSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl QueryParameters for ImagesQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("limit", self.limit)?;
        ensure_positive("page", self.page)
    }

    fn append_to(&self, q: &mut QueryParams) {
        q.push_opt("limit", self.limit)
            .push_opt("page", self.page)
            .push_opt("postId", self.post_id)
            .push_opt("modelId", self.model_id)
            .push_opt("modelVersionId", self.model_version_id)
            .push_opt("username", self.username.as_deref())
            .push_opt("nsfw", self.nsfw)
            .push_opt("sort", self.sort)
            .push_opt("period", self.period);
    }
}

/// Free-text search with paging, used by the creators and tags listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }
}

impl QueryParameters for SearchQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("limit", self.limit)?;
        ensure_positive("page", self.page)
    }

    fn append_to(&self, q: &mut QueryParams) {
        q.push_opt("limit", self.limit)
            .push_opt("page", self.page)
            .push_opt("query", self.query.as_deref());
    }
}

/// Result count used by the browse shortcuts when none is given.
pub const DEFAULT_BROWSE_LIMIT: u32 = 20;

/// Overrides accepted by the browse shortcuts on [`crate::ModelsClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseOptions {
    /// Defaults to 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Defaults to `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
}

impl BrowseOptions {
    pub(crate) fn into_query(self) -> ModelsQuery {
        ModelsQuery {
            limit: Some(self.limit.unwrap_or(DEFAULT_BROWSE_LIMIT)),
            page: self.page,
            nsfw: Some(self.nsfw.unwrap_or(false)),
            ..Default::default()
        }
    }
}
