//! Main AdminClient

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::ApiResponse;
use crate::api::ListParams;
use crate::api::PageResult;
use crate::enums::EnumSource;
use crate::enums::OptionItem;
use crate::enums::OptionSet;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::ModuleKey;
use crate::model::Record;

/// Client for the conventional per-module REST surface.
///
/// | Operation | Request |
/// |-----------|---------|
/// | [`page`](Self::page) | `GET /{module}/page` |
/// | [`get`](Self::get) | `GET /{module}/{id}` |
/// | [`save`](Self::save) | `POST /{module}/save` |
/// | [`delete`](Self::delete) | `POST /{module}/del` |
/// | [`enums`](Self::enums) | `GET /common/enums` |
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use soundcms_lib::AdminClient;
///
/// let client = AdminClient::builder()
///     .url("http://localhost:8080/api")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let page = client.page(&ModuleKey::Sound, &ListParams::new()).await?;
/// ```
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl AdminClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> AdminClientBuilder<Missing> {
        AdminClientBuilder::new()
    }

    /// Returns the base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Loads one page of a module's rows.
    pub async fn page(&self, module: &ModuleKey, params: &ListParams) -> Result<PageResult<Record>, Error> {
        let mut url = self.url(&[module.path(), "page"])?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.to_query() {
                pairs.append_pair(&key, &value);
            }
        }
        debug!("GET {}", url);

        let response: ApiResponse<PageResult<Record>> =
            self.send(self.inner.http_client.get(url)).await?;
        Ok(response.into_data()?)
    }

    /// Loads a single record by id.
    pub async fn get(&self, module: &ModuleKey, id: i64) -> Result<Record, Error> {
        let url = self.url(&[module.path(), &id.to_string()])?;
        debug!("GET {}", url);

        let response: ApiResponse<Record> = self.send(self.inner.http_client.get(url)).await?;
        Ok(response.into_data()?)
    }

    /// Creates or updates a record.
    ///
    /// The backend answers either with the stored record or with its id; in
    /// the latter case the submitted record is returned with the id applied.
    pub async fn save(&self, module: &ModuleKey, record: &Record) -> Result<Record, Error> {
        let url = self.url(&[module.path(), "save"])?;
        debug!("POST {}", url);

        let response: ApiResponse<serde_json::Value> = self
            .send(self.inner.http_client.post(url).json(record))
            .await?;
        let data = response.into_data()?;

        match data {
            serde_json::Value::Number(n) => {
                let mut saved = record.clone();
                if let Some(id) = n.as_i64() {
                    saved.set_id(id);
                }
                Ok(saved)
            }
            object @ serde_json::Value::Object(_) => serde_json::from_value(object)
                .map_err(|e| Error::Api(ApiError::decode(e.to_string()))),
            other => Err(Error::Api(ApiError::decode(format!(
                "unexpected save response: {}",
                other
            )))),
        }
    }

    /// Deletes records by id.
    pub async fn delete(&self, module: &ModuleKey, ids: &[i64]) -> Result<(), Error> {
        let url = self.url(&[module.path(), "del"])?;
        debug!("POST {} ({} ids)", url, ids.len());

        let body = serde_json::json!({ "idList": ids });
        let response: ApiResponse<serde_json::Value> =
            self.send(self.inner.http_client.post(url).json(&body)).await?;
        Ok(response.into_ack()?)
    }

    /// Lists every option set the backend exposes.
    pub async fn enums(&self) -> Result<Vec<OptionSet>, Error> {
        let url = self.url(&["common", "enums"])?;
        debug!("GET {}", url);

        let response: ApiResponse<BTreeMap<String, Vec<OptionItem>>> =
            self.send(self.inner.http_client.get(url)).await?;
        let sets = response
            .into_data()?
            .into_iter()
            .map(|(name, items)| OptionSet::new(name, items))
            .collect();
        Ok(sets)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let raw = format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            segments.join("/")
        );
        Url::parse(&raw).map_err(|e| ApiError::bad_url(&raw, e))
    }

    async fn send<T: DeserializeOwned>(&self, mut request: RequestBuilder) -> Result<ApiResponse<T>, ApiError> {
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!("backend answered HTTP {}", status.as_u16());
            return Err(ApiError::status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::decode_body(e.to_string(), body))
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::TimedOut(timeout),
            _ => ApiError::Transport(err),
        }
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

#[async_trait]
impl EnumSource for AdminClient {
    async fn fetch_enums(&self) -> Result<Vec<OptionSet>, Error> {
        self.enums().await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`AdminClient`].
///
/// Uses the typestate pattern so `build()` only exists once `url` is set.
pub struct AdminClientBuilder<Url> {
    url: Url,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl AdminClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the backend base URL (including any `/api` prefix).
    pub fn url(self, url: impl Into<String>) -> AdminClientBuilder<Set<String>> {
        AdminClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for AdminClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> AdminClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl AdminClientBuilder<Set<String>> {
    /// Builds the [`AdminClient`].
    pub fn build(self) -> Result<AdminClient, ApiError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Url::parse(&self.url.0).map_err(|e| ApiError::bad_url(&self.url.0, e))?;

        Ok(AdminClient {
            inner: Arc::new(AdminClientInner {
                base_url: self.url.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
