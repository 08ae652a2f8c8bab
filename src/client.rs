//! HTTP client for the PDM backend.
//!
//! [`ApiClient::request`] is a thin wrapper over `reqwest`: it prefixes the
//! base URL, merges a default JSON content type with caller headers, and turns
//! non-2xx responses into [`ClientError::Api`] carrying the server's `detail`
//! message. There are no retries, timeouts or caching.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schemas::{
    ActionResponse, FileCheckinRequest, FileCheckoutRequest, FileInfo, FileListResponse,
    StatusFilter,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response; displays as the server-provided message
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Per-request settings merged over the client defaults
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header; it replaces any default of the same name
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json(mut self, body: impl Serialize) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Service info returned by `GET /api`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request to `base_url + endpoint` and parse the JSON body
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("API request to {} failed: {}", url, e);
            ClientError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    detail: Some(serde_json::Value::String(detail)),
                }) => detail,
                Ok(ErrorBody {
                    detail: Some(detail),
                }) if !detail.is_null() => detail.to_string(),
                _ => format!("HTTP Error: {}", status.as_u16()),
            };

            tracing::error!("API request to {} failed: {}", url, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("API response from {} could not be parsed: {}", url, e);
            ClientError::Decode(e)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.request(endpoint, RequestOptions::default()).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: impl Serialize,
    ) -> ClientResult<T> {
        let options = RequestOptions::default().method(Method::POST).json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn service_info(&self) -> ClientResult<ServiceInfo> {
        self.get("/api").await
    }

    pub async fn list_files(
        &self,
        search: Option<&str>,
        status: StatusFilter,
        limit: Option<usize>,
    ) -> ClientResult<FileListResponse> {
        let mut params = Vec::new();
        if let Some(search) = search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        match status {
            StatusFilter::All => {}
            StatusFilter::Available => params.push("status=available".to_string()),
            StatusFilter::CheckedOut => params.push("status=checked_out".to_string()),
        }
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }

        let endpoint = if params.is_empty() {
            "/api/files".to_string()
        } else {
            format!("/api/files?{}", params.join("&"))
        };
        self.get(&endpoint).await
    }

    pub async fn get_file(&self, filename: &str) -> ClientResult<FileInfo> {
        self.get(&format!("/api/files/{}", urlencoding::encode(filename)))
            .await
    }

    pub async fn checkout(&self, request: &FileCheckoutRequest) -> ClientResult<ActionResponse> {
        self.post("/api/files/checkout", request).await
    }

    pub async fn checkin(&self, request: &FileCheckinRequest) -> ClientResult<ActionResponse> {
        self.post("/api/files/checkin", request).await
    }
}
