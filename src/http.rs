use reqwest::StatusCode;

use crate::errors::{APIError, Error};

/// Query parameter name carrying the API token.
pub const TOKEN_PARAM: &str = "token";

/// Ordered query string under construction.
///
/// Empty string values are never recorded, so a parameter left blank by the
/// caller is omitted from the request instead of being sent empty. Keys may
/// repeat; array parameters are pushed once per element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.0.push((key.to_string(), value));
        }
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    pub fn extend(&mut self, other: &QueryParams) -> &mut Self {
        self.0.extend(other.0.iter().cloned());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every value recorded for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Percent-encoded `k=v&k=v` form.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Build a request URL: base, path, then the token (when configured), then
/// the operation's own parameters.
pub fn build_url(base: &str, path: &str, token: Option<&str>, query: &QueryParams) -> String {
    let mut url = format!("{}{}", base.trim_end_matches('/'), path);
    let mut params = QueryParams::new();
    if let Some(token) = token {
        params.push(TOKEN_PARAM, token);
    }
    params.extend(query);
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.encode());
    }
    url
}

/// Escape a caller-supplied identifier for use as one path segment.
pub fn path_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

pub(crate) fn parse_api_error_parts(status: StatusCode, body: String) -> Error {
    let status_text = status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string();

    if body.trim().is_empty() {
        return APIError::new(status.as_u16(), status_text).into();
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            let err = value.get("error");
            err.and_then(|v| v.as_str())
                .or_else(|| err.and_then(|v| v.get("message")).and_then(|v| v.as_str()))
                .or_else(|| value.get("message").and_then(|v| v.as_str()))
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| status_text.clone());

    APIError {
        status: status.as_u16(),
        status_text,
        message,
        raw_body: Some(body),
    }
    .into()
}
