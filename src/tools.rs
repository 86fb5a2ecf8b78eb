//! Tool catalog and dispatch for assistant integrations.
//!
//! Each tool maps one-to-one onto a catalog client operation. Arguments
//! arrive as a JSON object, are parsed into a typed struct and validated,
//! and the validated result goes back out as JSON. Presentation of results
//! is left to the caller.

use std::fmt;

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    errors::Error,
    params::{
        ensure_positive, validate_hash, BrowseOptions, ImagesQuery, ModelsQuery, Period,
        SearchQuery,
    },
    types::ModelType,
    Client,
};

// ============================================================================
// Tool catalog
// ============================================================================

/// A tool as advertised to the assistant: name, description and the JSON
/// Schema of its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Every tool this crate can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTool {
    SearchModels,
    GetModel,
    GetModelVersion,
    GetModelVersionByHash,
    BrowseImages,
    GetPopularModels,
    GetLatestModels,
    GetTopRatedModels,
    SearchModelsByTag,
    SearchModelsByCreator,
    GetModelsByType,
    GetCreators,
    GetTags,
    GetDownloadUrl,
}

impl CatalogTool {
    pub const ALL: [CatalogTool; 14] = [
        CatalogTool::SearchModels,
        CatalogTool::GetModel,
        CatalogTool::GetModelVersion,
        CatalogTool::GetModelVersionByHash,
        CatalogTool::BrowseImages,
        CatalogTool::GetPopularModels,
        CatalogTool::GetLatestModels,
        CatalogTool::GetTopRatedModels,
        CatalogTool::SearchModelsByTag,
        CatalogTool::SearchModelsByCreator,
        CatalogTool::GetModelsByType,
        CatalogTool::GetCreators,
        CatalogTool::GetTags,
        CatalogTool::GetDownloadUrl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CatalogTool::SearchModels => "search_models",
            CatalogTool::GetModel => "get_model",
            CatalogTool::GetModelVersion => "get_model_version",
            CatalogTool::GetModelVersionByHash => "get_model_version_by_hash",
            CatalogTool::BrowseImages => "browse_images",
            CatalogTool::GetPopularModels => "get_popular_models",
            CatalogTool::GetLatestModels => "get_latest_models",
            CatalogTool::GetTopRatedModels => "get_top_rated_models",
            CatalogTool::SearchModelsByTag => "search_models_by_tag",
            CatalogTool::SearchModelsByCreator => "search_models_by_creator",
            CatalogTool::GetModelsByType => "get_models_by_type",
            CatalogTool::GetCreators => "get_creators",
            CatalogTool::GetTags => "get_tags",
            CatalogTool::GetDownloadUrl => "get_download_url",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            CatalogTool::SearchModels => "Search Civitai models by text, tag, creator, type, base model and license filters",
            CatalogTool::GetModel => "Get a model with all of its versions, files and sample images",
            CatalogTool::GetModelVersion => "Get one model version with a summary of its parent model",
            CatalogTool::GetModelVersionByHash => "Find the model version owning a file hash (e.g. AutoV2, SHA256 or BLAKE3)",
            CatalogTool::BrowseImages => "Browse generated images filtered by model, version, post, user or NSFW level",
            CatalogTool::GetPopularModels => "Most downloaded models in a period (default: week), SFW unless nsfw is set",
            CatalogTool::GetLatestModels => "Newest models, SFW unless nsfw is set",
            CatalogTool::GetTopRatedModels => "Highest rated models in a period (default: all time), SFW unless nsfw is set",
            CatalogTool::SearchModelsByTag => "Models carrying a tag, SFW unless nsfw is set",
            CatalogTool::SearchModelsByCreator => "Models published by a creator, SFW unless nsfw is set",
            CatalogTool::GetModelsByType => "Models of one type (Checkpoint, LORA, ...), SFW unless nsfw is set",
            CatalogTool::GetCreators => "Search model creators",
            CatalogTool::GetTags => "Search model tags",
            CatalogTool::GetDownloadUrl => "Download link for a model version's primary file",
        }
    }

    /// JSON Schema of this tool's arguments.
    pub fn input_schema(&self) -> Value {
        match self {
            CatalogTool::SearchModels => schema_of::<ModelsQuery>(),
            CatalogTool::GetModel => schema_of::<ModelIdArgs>(),
            CatalogTool::GetModelVersion | CatalogTool::GetDownloadUrl => {
                schema_of::<ModelVersionIdArgs>()
            }
            CatalogTool::GetModelVersionByHash => schema_of::<HashArgs>(),
            CatalogTool::BrowseImages => schema_of::<ImagesQuery>(),
            CatalogTool::GetPopularModels | CatalogTool::GetTopRatedModels => {
                schema_of::<PeriodBrowseArgs>()
            }
            CatalogTool::GetLatestModels => schema_of::<BrowseOptions>(),
            CatalogTool::SearchModelsByTag => schema_of::<TagArgs>(),
            CatalogTool::SearchModelsByCreator => schema_of::<CreatorArgs>(),
            CatalogTool::GetModelsByType => schema_of::<TypeArgs>(),
            CatalogTool::GetCreators | CatalogTool::GetTags => schema_of::<SearchQuery>(),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for CatalogTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Definitions for every tool, in catalog order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    CatalogTool::ALL.iter().map(|t| t.definition()).collect()
}

fn schema_of<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({ "type": "object" }))
}

// ============================================================================
// Typed arguments
// ============================================================================

/// Trait for argument types that validate themselves after parsing.
pub trait ValidateArgs {
    /// Returns Ok(()) if valid, or an error message if invalid.
    fn validate(&self) -> Result<(), String>;
}

fn browse_checks(opts: &BrowseOptions) -> Result<(), String> {
    ensure_positive("limit", opts.limit).map_err(|e| e.to_string())?;
    ensure_positive("page", opts.page).map_err(|e| e.to_string())
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

impl ValidateArgs for ModelsQuery {
    fn validate(&self) -> Result<(), String> {
        crate::params::QueryParameters::validate(self).map_err(|e| e.to_string())
    }
}

impl ValidateArgs for ImagesQuery {
    fn validate(&self) -> Result<(), String> {
        crate::params::QueryParameters::validate(self).map_err(|e| e.to_string())
    }
}

impl ValidateArgs for SearchQuery {
    fn validate(&self) -> Result<(), String> {
        crate::params::QueryParameters::validate(self).map_err(|e| e.to_string())
    }
}

impl ValidateArgs for BrowseOptions {
    fn validate(&self) -> Result<(), String> {
        browse_checks(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelIdArgs {
    pub model_id: u64,
}

impl ValidateArgs for ModelIdArgs {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersionIdArgs {
    pub model_version_id: u64,
}

impl ValidateArgs for ModelVersionIdArgs {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HashArgs {
    /// Hex digest of a model file.
    pub hash: String,
}

impl ValidateArgs for HashArgs {
    fn validate(&self) -> Result<(), String> {
        validate_hash(&self.hash).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBrowseArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(flatten)]
    pub options: BrowseOptions,
}

impl ValidateArgs for PeriodBrowseArgs {
    fn validate(&self) -> Result<(), String> {
        browse_checks(&self.options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TagArgs {
    pub tag: String,
    #[serde(flatten)]
    pub options: BrowseOptions,
}

impl ValidateArgs for TagArgs {
    fn validate(&self) -> Result<(), String> {
        require("tag", &self.tag)?;
        browse_checks(&self.options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatorArgs {
    pub username: String,
    #[serde(flatten)]
    pub options: BrowseOptions,
}

impl ValidateArgs for CreatorArgs {
    fn validate(&self) -> Result<(), String> {
        require("username", &self.username)?;
        browse_checks(&self.options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeArgs {
    #[serde(rename = "type")]
    pub model_type: ModelType,
    #[serde(flatten)]
    pub options: BrowseOptions,
}

impl ValidateArgs for TypeArgs {
    fn validate(&self) -> Result<(), String> {
        browse_checks(&self.options)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error returned when tool argument parsing or validation fails.
/// Contains a descriptive message suitable for sending back to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArgsError {
    pub message: String,
    pub tool_name: String,
}

impl fmt::Display for ToolArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ToolArgsError {}

/// Error returned when a tool is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToolError {
    pub tool_name: String,
    pub available: Vec<String>,
}

impl fmt::Display for UnknownToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tool: '{}'. Available: {}",
            self.tool_name,
            self.available.join(", ")
        )
    }
}

impl std::error::Error for UnknownToolError {}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    UnknownTool(#[from] UnknownToolError),

    #[error("{0}")]
    InvalidArguments(#[from] ToolArgsError),

    #[error("{0}")]
    Catalog(#[from] Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// True when the assistant can fix the call by correcting its arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::InvalidArguments(_))
    }
}

/// Parses and validates tool arguments. `null` is treated as an empty object.
pub fn parse_tool_args<T>(tool: CatalogTool, args: Value) -> Result<T, ToolArgsError>
where
    T: DeserializeOwned + ValidateArgs,
{
    let args = if args.is_null() { json!({}) } else { args };
    let parsed: T = serde_json::from_value(args).map_err(|e| ToolArgsError {
        message: format!("failed to parse arguments for tool '{}': {}", tool, e),
        tool_name: tool.name().to_string(),
    })?;
    parsed.validate().map_err(|e| ToolArgsError {
        message: format!("invalid arguments for tool '{}': {}", tool, e),
        tool_name: tool.name().to_string(),
    })?;
    Ok(parsed)
}

// ============================================================================
// Dispatch
// ============================================================================

/// One tool invocation as received from the RPC layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result of executing a tool call.
#[derive(Debug, Clone)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: Option<Value>,
    pub error: Option<String>,
    /// True if the error is due to malformed arguments and the model should
    /// be given a chance to retry with corrected arguments.
    pub is_retryable: bool,
}

impl ToolExecutionResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Routes tool calls to the catalog client.
#[derive(Clone)]
pub struct ToolDispatcher {
    client: Client,
}

impl ToolDispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Run one tool and return its validated result as JSON.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = CatalogTool::from_name(name).ok_or_else(|| UnknownToolError {
            tool_name: name.to_string(),
            available: CatalogTool::ALL.iter().map(|t| t.name().to_string()).collect(),
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(tool = %tool, "dispatching tool call");

        let client = &self.client;
        let value = match tool {
            CatalogTool::SearchModels => {
                let q: ModelsQuery = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().list(q).await?)?
            }
            CatalogTool::GetModel => {
                let a: ModelIdArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().get(a.model_id).await?)?
            }
            CatalogTool::GetModelVersion => {
                let a: ModelVersionIdArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.model_versions().get(a.model_version_id).await?)?
            }
            CatalogTool::GetModelVersionByHash => {
                let a: HashArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.model_versions().by_hash(&a.hash).await?)?
            }
            CatalogTool::BrowseImages => {
                let q: ImagesQuery = parse_tool_args(tool, args)?;
                serde_json::to_value(client.images().list(q).await?)?
            }
            CatalogTool::GetPopularModels => {
                let a: PeriodBrowseArgs = parse_tool_args(tool, args)?;
                let page = client.models().most_downloaded(a.period, a.options).await?;
                serde_json::to_value(page)?
            }
            CatalogTool::GetLatestModels => {
                let a: BrowseOptions = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().newest(a).await?)?
            }
            CatalogTool::GetTopRatedModels => {
                let a: PeriodBrowseArgs = parse_tool_args(tool, args)?;
                let page = client.models().highest_rated(a.period, a.options).await?;
                serde_json::to_value(page)?
            }
            CatalogTool::SearchModelsByTag => {
                let a: TagArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().by_tag(a.tag, a.options).await?)?
            }
            CatalogTool::SearchModelsByCreator => {
                let a: CreatorArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().by_creator(a.username, a.options).await?)?
            }
            CatalogTool::GetModelsByType => {
                let a: TypeArgs = parse_tool_args(tool, args)?;
                serde_json::to_value(client.models().by_type(a.model_type, a.options).await?)?
            }
            CatalogTool::GetCreators => {
                let q: SearchQuery = parse_tool_args(tool, args)?;
                serde_json::to_value(client.creators().list(q).await?)?
            }
            CatalogTool::GetTags => {
                let q: SearchQuery = parse_tool_args(tool, args)?;
                serde_json::to_value(client.tags().list(q).await?)?
            }
            CatalogTool::GetDownloadUrl => {
                let a: ModelVersionIdArgs = parse_tool_args(tool, args)?;
                json!({
                    "modelVersionId": a.model_version_id,
                    "downloadUrl": client.download_url(a.model_version_id),
                })
            }
        };
        Ok(value)
    }

    /// Executes a single tool call, folding any failure into the result.
    pub async fn execute(&self, call: &ToolCall) -> ToolExecutionResult {
        match self.dispatch(&call.name, call.arguments.clone()).await {
            Ok(result) => ToolExecutionResult {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                result: Some(result),
                error: None,
                is_retryable: false,
            },
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(tool = %call.name, error = %err, "tool call failed");
                ToolExecutionResult {
                    tool_call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    result: None,
                    is_retryable: err.is_retryable(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Executes multiple tool calls concurrently.
    /// Results are returned in the same order as the input calls.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolExecutionResult> {
        let futures: Vec<_> = calls.iter().map(|call| self.execute(call)).collect();
        futures::future::join_all(futures).await
    }
}
