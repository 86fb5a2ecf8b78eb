use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    header::{ACCEPT, CONTENT_TYPE, USER_AGENT},
    StatusCode,
};

use crate::{
    creators::CreatorsClient,
    errors::{Error, Result, TransportError, ValidationError},
    http::{build_url, parse_api_error_parts, QueryParams},
    images::ImagesClient,
    model_versions::ModelVersionsClient,
    models::ModelsClient,
    schema::{self, Schema},
    tags::TagsClient,
    telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext, Telemetry},
    DEFAULT_BASE_URL, DEFAULT_CLIENT_HEADER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DOWNLOAD_BASE_URL,
};

/// Settings for [`Client::new`]. Every field is optional.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// API root, defaults to `https://civitai.com/api/v1`.
    pub base_url: Option<String>,
    /// Root for download links, defaults to `https://civitai.com/api/download`.
    pub download_base_url: Option<String>,
    /// API token. Sent both as a `token` query parameter and as a bearer
    /// header. Blank values are treated as absent.
    pub api_token: Option<String>,
    /// User-Agent value (defaults to `civitai-rust/<version>`).
    pub client_header: Option<String>,
    /// Preconfigured HTTP client. When set, `connect_timeout` is ignored.
    pub http_client: Option<reqwest::Client>,
    /// Override the connect timeout (defaults to 10s).
    pub connect_timeout: Option<Duration>,
    /// Per-request timeout. No default: callers wanting bounded latency set
    /// one here or wrap the call themselves.
    pub timeout: Option<Duration>,
    /// Optional metrics callbacks (HTTP latency and status).
    pub metrics: Option<MetricsCallbacks>,
}

impl Config {
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Client for the Civitai catalog API.
///
/// Cheap to clone; clones share one connection pool. Every operation issues
/// at most one GET and holds no state between calls.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    base_url: String,
    download_base_url: String,
    pub(crate) api_token: Option<String>,
    client_header: String,
    http: reqwest::Client,
    request_timeout: Option<Duration>,
    telemetry: Telemetry,
}

fn normalize_base(raw: &str, what: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    reqwest::Url::parse(&base).map_err(|err| Error::Config(format!("invalid {what}: {err}")))?;
    Ok(base)
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
        let base_url = normalize_base(
            cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            "base url",
        )?;
        let download_base_url = normalize_base(
            cfg.download_base_url
                .as_deref()
                .unwrap_or(DEFAULT_DOWNLOAD_BASE_URL),
            "download base url",
        )?;

        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(TransportError::from)?,
        };

        let client_header = cfg
            .client_header
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_HEADER.to_string());

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                download_base_url,
                api_token: cfg
                    .api_token
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                client_header,
                http,
                request_timeout: cfg.timeout,
                telemetry: Telemetry::new(cfg.metrics),
            }),
        })
    }

    pub fn models(&self) -> ModelsClient {
        ModelsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn model_versions(&self) -> ModelVersionsClient {
        ModelVersionsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn images(&self) -> ImagesClient {
        ImagesClient {
            inner: self.inner.clone(),
        }
    }

    pub fn creators(&self) -> CreatorsClient {
        CreatorsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn tags(&self) -> TagsClient {
        TagsClient {
            inner: self.inner.clone(),
        }
    }

    /// Download link for a model version's primary file.
    ///
    /// Pure string construction: no request is made. The token, when
    /// configured, is embedded as a query parameter.
    pub fn download_url(&self, model_version_id: u64) -> String {
        self.inner.download_url(model_version_id)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn has_api_token(&self) -> bool {
        self.inner.api_token.is_some()
    }
}

impl ClientInner {
    /// Full request URL for `path`, token first, then `query`.
    pub(crate) fn url(&self, path: &str, query: &QueryParams) -> String {
        build_url(&self.base_url, path, self.api_token.as_deref(), query)
    }

    pub(crate) fn download_url(&self, model_version_id: u64) -> String {
        build_url(
            &self.download_base_url,
            &format!("/models/{model_version_id}"),
            self.api_token.as_deref(),
            &QueryParams::new(),
        )
    }

    /// Issue one GET against `path` and validate the body as `T`.
    pub(crate) async fn get_json<T: Schema>(
        &self,
        path: &str,
        query: &QueryParams,
        operation: &str,
    ) -> Result<T> {
        let ctx = RequestContext::new("GET", path).with_operation(operation);
        let fut = self.execute(path, query, ctx);
        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(
            fut,
            tracing::debug_span!("civitai.http", method = "GET", path = %path, operation),
        );
        fut.await
    }

    async fn execute<T: Schema>(
        &self,
        path: &str,
        query: &QueryParams,
        ctx: RequestContext,
    ) -> Result<T> {
        let url = self.url(path, query);
        let start = Instant::now();

        let mut builder = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.client_header);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(err) => {
                self.record(start, None, Some(err.to_string()), ctx);
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "transport error");
                return Err(TransportError::from(err).into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            self.record(start, Some(status), Some(format!("http {}", status.as_u16())), ctx);
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status, "request failed; returning error");
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_api_error_parts(status, body));
        }

        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.record(start, Some(status), Some(err.to_string()), ctx);
                return Err(TransportError::from(err).into());
            }
        };
        self.record(start, Some(status), None, ctx);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            status = %status,
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );

        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|err| {
            ValidationError::new(format!("response body is not valid JSON: {err}"))
        })?;
        let parsed = schema::validate::<T>(value).map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "response failed validation");
            err
        })?;
        Ok(parsed)
    }

    fn record(
        &self,
        start: Instant,
        status: Option<StatusCode>,
        error: Option<String>,
        context: RequestContext,
    ) {
        if self.telemetry.http_enabled() {
            self.telemetry.record_http(HttpRequestMetrics {
                latency: start.elapsed(),
                status: status.map(|s| s.as_u16()),
                error,
                context,
            });
        }
    }
}
