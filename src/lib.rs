//! Typed Rust client for the Civitai catalog API.
//!
//! Models, model versions, images, creators and tags are fetched with one GET
//! per call and validated against their declared shapes before they reach the
//! caller. The [`tools`] module exposes the same operations as named tools
//! for assistant integrations.
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://civitai.com/api/v1";

/// Default root for model download links.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://civitai.com/api/download";

/// Default User-Agent header value.
pub(crate) const DEFAULT_CLIENT_HEADER: &str = concat!("civitai-rust/", env!("CARGO_PKG_VERSION"));

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

mod client;
mod creators;
mod errors;
mod http;
mod images;
mod model_versions;
mod models;
mod params;
pub mod schema;
mod tags;
mod telemetry;
pub mod testing;
pub mod tools;
mod types;

pub use client::{Client, Config};
pub use creators::CreatorsClient;
pub use errors::{APIError, Error, Result, TransportError, TransportErrorKind, ValidationError};
pub use http::{build_url, QueryParams, TOKEN_PARAM};
pub use images::ImagesClient;
pub use model_versions::ModelVersionsClient;
pub use models::ModelsClient;
pub use params::{
    validate_hash, BrowseOptions, CommercialUse, HashAlgorithm, ImageSort, ImagesQuery,
    ModelSort, ModelsQuery, NsfwFilter, Period, QueryParameters, SearchQuery,
    DEFAULT_BROWSE_LIMIT,
};
pub use tags::TagsClient;
pub use telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext};
pub use tools::{
    tool_definitions, CatalogTool, ToolArgsError, ToolCall, ToolDefinition, ToolDispatcher,
    ToolError, ToolExecutionResult, UnknownToolError, ValidateArgs,
};
pub use types::{
    Creator, Cursor, File, FileFormat, FileMetadata, FileSize, Image, Metadata, Model, ModelMode,
    ModelSummary, ModelType, ModelVersion, ModelVersionDetail, NsfwLevel, NsfwLevelName,
    PaginatedList, Stats, Tag,
};
