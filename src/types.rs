//! Catalog entities as returned by the Civitai API.
//!
//! Every type here is read-only and built fresh from one decoded response.
//! Unknown upstream fields are dropped on decode; optional fields that are
//! absent or `null` both decode to `None` and are omitted again on encode.

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Model category. Upstream rejects anything outside this set, and so do we.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ModelType {
    Checkpoint,
    TextualInversion,
    Hypernetwork,
    AestheticGradient,
    #[serde(rename = "LORA")]
    Lora,
    Controlnet,
    Poses,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Checkpoint => "Checkpoint",
            ModelType::TextualInversion => "TextualInversion",
            ModelType::Hypernetwork => "Hypernetwork",
            ModelType::AestheticGradient => "AestheticGradient",
            ModelType::Lora => "LORA",
            ModelType::Controlnet => "Controlnet",
            ModelType::Poses => "Poses",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability mode of a model that is no longer fully published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelMode {
    Archived,
    TakenDown,
}

/// Aggregate counters. Endpoints populate different subsets, so every field
/// is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbs_up_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbs_down_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cry_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laugh_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislike_count: Option<u64>,
}

/// A model author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub username: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_count: Option<u64>,
    /// Link to the creator's models on the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Size class of a weights file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSize {
    Full,
    Pruned,
}

/// Serialization format of a weights file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    SafeTensor,
    PickleTensor,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Floating point precision, e.g. `fp16`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FileSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FileFormat>,
}

/// A downloadable file attached to a model version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickle_scan_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virus_scan_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    /// Hash algorithm name (`AutoV2`, `SHA256`, ...) to hex digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashes: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Named NSFW level as used by image endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NsfwLevelName {
    None,
    Soft,
    Mature,
    X,
}

impl NsfwLevelName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NsfwLevelName::None => "None",
            NsfwLevelName::Soft => "Soft",
            NsfwLevelName::Mature => "Mature",
            NsfwLevelName::X => "X",
        }
    }
}

/// NSFW level of an image. Upstream sends either a named level or a raw
/// numeric level depending on the endpoint; whichever arrived is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NsfwLevel {
    Named(NsfwLevelName),
    Numeric(Number),
}

/// A sample or gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Missing in some listing contexts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub url: String,
    pub hash: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw_level: Option<NsfwLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    /// Generation parameters. Arbitrary keys and values, never validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub trained_words: Vec<String>,
    pub files: Vec<File>,
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
}

impl ModelVersion {
    /// The file flagged as primary, falling back to the first file.
    pub fn primary_file(&self) -> Option<&File> {
        self.files
            .iter()
            .find(|f| f.primary == Some(true))
            .or_else(|| self.files.first())
    }
}

/// A catalog model with its versions, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub model_type: ModelType,
    pub nsfw: bool,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModelMode>,
    pub creator: Creator,
    pub model_versions: Vec<ModelVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    /// Person of interest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_no_credit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_derivatives: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_different_license: Option<bool>,
}

impl Model {
    pub fn latest_version(&self) -> Option<&ModelVersion> {
        self.model_versions.first()
    }
}

/// Parent model summary embedded in single-version lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: ModelType,
    pub nsfw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModelMode>,
}

/// Result of a version lookup by id or by file hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersionDetail {
    #[serde(flatten)]
    pub version: ModelVersion,
    pub model: ModelSummary,
}

impl ModelVersionDetail {
    pub fn model_id(&self) -> Option<u64> {
        self.version.model_id
    }
}

/// Pagination cursor. Numeric on some endpoints, opaque string on others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Number(Number),
    String(String),
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Number(n) => write!(f, "{n}"),
            Cursor::String(s) => f.write_str(s),
        }
    }
}

/// Pagination metadata accompanying every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

/// A page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub metadata: Metadata,
}

impl<T> PaginatedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.metadata.next_page.is_some() || self.metadata.next_cursor.is_some()
    }
}
