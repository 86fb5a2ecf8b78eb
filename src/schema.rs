//! Response validation.
//!
//! Each validator takes an already decoded JSON value and either returns the
//! canonical entity from [`crate::types`] or a [`ValidationError`] naming the
//! entity and, where serde reports it, the offending field. Validation is
//! lenient where upstream is known to be inconsistent (missing image ids,
//! number-or-string cursors, named-or-numeric NSFW levels, free-form
//! generation metadata) and strict everywhere else.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    errors::ValidationError,
    types::{
        Creator, Image, Metadata, Model, ModelVersion, ModelVersionDetail, PaginatedList, Stats,
        Tag,
    },
};

/// An entity with a declared upstream shape.
pub trait Schema: DeserializeOwned {
    /// Name used in validation messages.
    const NAME: &'static str;
}

impl Schema for Model {
    const NAME: &'static str = "model";
}

impl Schema for ModelVersion {
    const NAME: &'static str = "model version";
}

impl Schema for ModelVersionDetail {
    const NAME: &'static str = "model version";
}

impl Schema for Image {
    const NAME: &'static str = "image";
}

impl Schema for Creator {
    const NAME: &'static str = "creator";
}

impl Schema for Tag {
    const NAME: &'static str = "tag";
}

impl Schema for Stats {
    const NAME: &'static str = "stats";
}

impl Schema for Metadata {
    const NAME: &'static str = "pagination metadata";
}

impl<T: Schema> Schema for PaginatedList<T> {
    const NAME: &'static str = "paginated list";
}

/// Validate `value` against the shape of `T`.
pub fn validate<T: Schema>(value: Value) -> Result<T, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new(format!(
            "{} response must be a JSON object, got {}",
            T::NAME,
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|err| {
        let message = err.to_string();
        let err = ValidationError::new(format!("invalid {}: {}", T::NAME, message));
        match missing_field(&message) {
            Some(field) => err.with_field(field),
            None => err,
        }
    })
}

pub fn validate_model(value: Value) -> Result<Model, ValidationError> {
    validate(value)
}

pub fn validate_model_version(value: Value) -> Result<ModelVersion, ValidationError> {
    validate(value)
}

pub fn validate_model_version_detail(value: Value) -> Result<ModelVersionDetail, ValidationError> {
    validate(value)
}

pub fn validate_image(value: Value) -> Result<Image, ValidationError> {
    validate(value)
}

pub fn validate_creator(value: Value) -> Result<Creator, ValidationError> {
    validate(value)
}

pub fn validate_tag(value: Value) -> Result<Tag, ValidationError> {
    validate(value)
}

pub fn validate_stats(value: Value) -> Result<Stats, ValidationError> {
    validate(value)
}

pub fn validate_metadata(value: Value) -> Result<Metadata, ValidationError> {
    validate(value)
}

/// Validate a list response whose items have the shape of `T`.
pub fn validate_page<T: Schema>(value: Value) -> Result<PaginatedList<T>, ValidationError> {
    validate(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// serde_json reports missing fields as "missing field `name`".
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Number};

    use super::*;
    use crate::types::{Cursor, ModelType, NsfwLevel, NsfwLevelName};

    fn minimal_model() -> Value {
        json!({
            "id": 4201,
            "name": "Realistic Vision",
            "description": "<p>photoreal</p>",
            "type": "Checkpoint",
            "nsfw": false,
            "tags": [],
            "mode": null,
            "creator": { "username": "SG_161222" },
            "modelVersions": []
        })
    }

    fn image() -> Value {
        json!({
            "id": 11,
            "url": "https://image.civitai.com/x/1.jpeg",
            "hash": "UKHLb^~q9F%M",
            "width": 512,
            "height": 768,
            "nsfwLevel": "None",
            "meta": { "prompt": "a cat", "steps": 30, "cfgScale": 7.5 }
        })
    }

    #[test]
    fn minimal_model_round_trips() {
        let model = validate_model(minimal_model()).expect("minimal model");
        assert_eq!(model.id, 4201);
        assert_eq!(model.name, "Realistic Vision");
        assert_eq!(model.description.as_deref(), Some("<p>photoreal</p>"));
        assert_eq!(model.model_type, ModelType::Checkpoint);
        assert!(!model.nsfw);
        assert!(model.tags.is_empty());
        assert!(model.mode.is_none());
        assert_eq!(model.creator.username, "SG_161222");
        assert!(model.model_versions.is_empty());
        assert!(model.latest_version().is_none());

        let encoded = serde_json::to_value(&model).unwrap();
        assert_eq!(encoded["type"], "Checkpoint");
        assert_eq!(encoded["creator"], json!({ "username": "SG_161222" }));
        assert_eq!(encoded["modelVersions"], json!([]));
    }

    #[test]
    fn model_without_type_is_rejected() {
        let mut value = minimal_model();
        value.as_object_mut().unwrap().remove("type");
        let err = validate_model(value).expect_err("type is required");
        assert_eq!(err.field.as_deref(), Some("type"));
        assert!(err.message.starts_with("invalid model"));
    }

    #[test]
    fn model_with_unknown_type_is_rejected() {
        let mut value = minimal_model();
        value["type"] = json!("Wildcards");
        assert!(validate_model(value).is_err());
    }

    #[test]
    fn model_without_versions_is_rejected() {
        let mut value = minimal_model();
        value.as_object_mut().unwrap().remove("modelVersions");
        let err = validate_model(value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("modelVersions"));
    }

    #[test]
    fn lora_type_keeps_upstream_spelling() {
        let mut value = minimal_model();
        value["type"] = json!("LORA");
        let model = validate_model(value).unwrap();
        assert_eq!(model.model_type, ModelType::Lora);
        assert_eq!(serde_json::to_value(model).unwrap()["type"], "LORA");
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let mut value = minimal_model();
        value["downloadsRemaining"] = json!(3);
        let model = validate_model(value).unwrap();
        let encoded = serde_json::to_value(model).unwrap();
        assert!(encoded.get("downloadsRemaining").is_none());
    }

    #[test]
    fn image_without_id_is_accepted() {
        let mut value = image();
        value.as_object_mut().unwrap().remove("id");
        let image = validate_image(value).expect("id is optional");
        assert!(image.id.is_none());
    }

    #[test]
    fn nsfw_level_accepts_number_or_name() {
        let mut numeric = image();
        numeric["nsfwLevel"] = json!(2);
        let mut named = image();
        named["nsfwLevel"] = json!("Mature");

        let numeric = validate_image(numeric).expect("numeric level");
        let named = validate_image(named).expect("named level");

        assert_eq!(
            numeric.nsfw_level,
            Some(NsfwLevel::Numeric(Number::from(2)))
        );
        assert_eq!(
            named.nsfw_level,
            Some(NsfwLevel::Named(NsfwLevelName::Mature))
        );
        assert_eq!(serde_json::to_value(numeric).unwrap()["nsfwLevel"], json!(2));
    }

    #[test]
    fn nsfw_level_rejects_unknown_name() {
        let mut value = image();
        value["nsfwLevel"] = json!("Spicy");
        assert!(validate_image(value).is_err());
    }

    #[test]
    fn generation_meta_is_not_validated() {
        let mut value = image();
        value["meta"] = json!({ "Model": null, "resources": [{ "hash": 12 }], "seed": "x" });
        let image = validate_image(value).unwrap();
        assert_eq!(image.meta.unwrap().len(), 3);

        let mut value = self::image();
        value["meta"] = Value::Null;
        assert!(validate_image(value).unwrap().meta.is_none());
    }

    #[test]
    fn image_missing_url_is_rejected() {
        let mut value = image();
        value.as_object_mut().unwrap().remove("url");
        let err = validate_image(value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("url"));
    }

    #[test]
    fn cursor_accepts_string_or_number() {
        let text = validate_metadata(json!({ "nextCursor": "abc123" })).unwrap();
        let number = validate_metadata(json!({ "nextCursor": 42 })).unwrap();
        assert_eq!(text.next_cursor, Some(Cursor::String("abc123".into())));
        assert_eq!(number.next_cursor, Some(Cursor::Number(Number::from(42))));
        assert_eq!(number.next_cursor.unwrap().to_string(), "42");
    }

    #[test]
    fn metadata_nulls_become_absent() {
        let meta = validate_metadata(json!({
            "totalItems": null,
            "currentPage": 1,
            "pageSize": 20,
            "nextPage": null
        }))
        .unwrap();
        assert!(meta.total_items.is_none());
        assert_eq!(meta.current_page, Some(1));
        assert!(meta.next_page.is_none());
    }

    #[test]
    fn page_validates_every_item() {
        let page = json!({
            "items": [{ "name": "anime", "modelCount": 120 }, { "modelCount": 3 }],
            "metadata": {}
        });
        let err = validate_page::<Tag>(page).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn page_requires_metadata() {
        let err = validate_page::<Creator>(json!({ "items": [] })).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("metadata"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_model(json!([1, 2])).unwrap_err();
        assert_eq!(err.message, "model response must be a JSON object, got an array");
    }

    #[test]
    fn version_detail_flattens_version_fields() {
        let detail = validate_model_version_detail(json!({
            "id": 130072,
            "modelId": 4201,
            "name": "v6.0",
            "createdAt": "2023-07-31T09:47:33.123Z",
            "trainedWords": ["analog style"],
            "baseModel": "SD 1.5",
            "files": [{
                "sizeKB": 2082642.4,
                "primary": true,
                "pickleScanResult": "Success",
                "virusScanResult": "Success",
                "scannedAt": "2023-07-31T09:55:00.000Z",
                "metadata": { "fp": "fp16", "size": "pruned", "format": "SafeTensor" }
            }],
            "images": [],
            "model": { "name": "Realistic Vision", "type": "Checkpoint", "nsfw": false, "poi": false }
        }))
        .unwrap();
        assert_eq!(detail.version.id, 130072);
        assert_eq!(detail.model_id(), Some(4201));
        assert_eq!(detail.model.model_type, ModelType::Checkpoint);
        let file = detail.version.primary_file().unwrap();
        let meta = file.metadata.as_ref().unwrap();
        assert_eq!(meta.fp.as_deref(), Some("fp16"));
    }

    #[test]
    fn file_metadata_fields_are_individually_nullable() {
        let version = validate_model_version(json!({
            "id": 1,
            "name": "v1",
            "description": null,
            "createdAt": "2023-01-01T00:00:00Z",
            "trainedWords": [],
            "files": [{ "sizeKB": 10.0, "metadata": { "fp": null, "size": null, "format": "Other" } }],
            "images": []
        }))
        .unwrap();
        let meta = version.files[0].metadata.as_ref().unwrap();
        assert!(meta.fp.is_none());
        assert!(meta.size.is_none());
        assert!(version.description.is_none());
    }
}
