#![allow(dead_code)]

use serde_json::{json, Value};

pub fn model_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "<p>A photoreal checkpoint</p>",
        "type": "Checkpoint",
        "poi": false,
        "nsfw": false,
        "allowNoCredit": true,
        "allowCommercialUse": ["Image", "Rent"],
        "tags": ["photorealistic", "base model"],
        "mode": null,
        "creator": { "username": "SG_161222", "image": null },
        "stats": { "downloadCount": 1200, "favoriteCount": 40, "rating": 4.9, "ratingCount": 31 },
        "modelVersions": [version_json(130072, id)]
    })
}

pub fn version_json(id: u64, model_id: u64) -> Value {
    json!({
        "id": id,
        "modelId": model_id,
        "name": "v6.0 (B1)",
        "description": null,
        "createdAt": "2023-07-31T09:47:33.123Z",
        "downloadUrl": format!("https://civitai.com/api/download/models/{id}"),
        "trainedWords": ["analog style", "modelshoot style"],
        "baseModel": "SD 1.5",
        "files": [{
            "id": 99,
            "name": "realisticVision_v60B1.safetensors",
            "sizeKB": 2082642.4,
            "type": "Model",
            "primary": true,
            "pickleScanResult": "Success",
            "virusScanResult": "Success",
            "scannedAt": "2023-07-31T09:55:00.000Z",
            "metadata": { "fp": "fp16", "size": "pruned", "format": "SafeTensor" },
            "hashes": { "AutoV2": "6CE0161689", "SHA256": "6CE0161689B3853ACAA03779EC93EAFE75A02F4CED659BEE03F50797806FA2FA" }
        }],
        "images": [{
            "url": "https://image.civitai.com/x/1.jpeg",
            "hash": "U8F~gc00_3Di00%M",
            "width": 832,
            "height": 1216,
            "nsfwLevel": 1,
            "meta": { "prompt": "portrait photo", "seed": 123 }
        }]
    })
}

pub fn version_detail_json(id: u64, model_id: u64) -> Value {
    let mut value = version_json(id, model_id);
    value["model"] = json!({ "name": "Realistic Vision", "type": "Checkpoint", "nsfw": false, "poi": false });
    value
}

pub fn page(items: Vec<Value>, metadata: Value) -> Value {
    json!({ "items": items, "metadata": metadata })
}

pub fn tags_page() -> Value {
    page(
        vec![
            json!({ "name": "anime", "modelCount": 5000, "link": "https://civitai.com/api/v1/models?tag=anime" }),
            json!({ "name": "landscape", "modelCount": 800 }),
        ],
        json!({ "totalItems": 2, "currentPage": 1, "pageSize": 20, "totalPages": 1, "nextPage": null }),
    )
}

pub fn creators_page() -> Value {
    page(
        vec![json!({ "username": "SG_161222", "modelCount": 12, "link": "https://civitai.com/api/v1/models?username=SG_161222", "image": null })],
        json!({ "currentPage": 1, "pageSize": 20 }),
    )
}

pub fn images_page() -> Value {
    page(
        vec![
            json!({
                "id": 1001,
                "url": "https://image.civitai.com/x/2.jpeg",
                "hash": "UFE2?]-;00D%",
                "width": 1024,
                "height": 1024,
                "nsfw": false,
                "nsfwLevel": "None",
                "createdAt": "2024-01-02T03:04:05.000Z",
                "postId": 555,
                "stats": { "cryCount": 0, "laughCount": 1, "likeCount": 20, "heartCount": 9, "dislikeCount": 0, "commentCount": 2 },
                "meta": null,
                "username": "painter"
            }),
            json!({
                "url": "https://image.civitai.com/x/3.jpeg",
                "hash": "UFE2?]-;00D%",
                "width": 512,
                "height": 512,
                "nsfwLevel": 2,
                "meta": { "sampler": "DPM++ 2M Karras" },
                "modelVersionIds": [130072]
            }),
        ],
        json!({ "nextCursor": "1001|1704164645000", "nextPage": "https://civitai.com/api/v1/images?cursor=1001" }),
    )
}

/// All `(key, value)` pairs of the request's query string, in order.
pub fn query_pairs(req: &wiremock::Request) -> Vec<(String, String)> {
    req.url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn values_of(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}
