//! Reqwest-backed HTTP transport and its configuration.

use crate::auth::domain::{AccessToken, ApiRequest, ApiResponse, HttpMethod, MultipartPart,
    RequestBody};
use crate::auth::ports::{HttpTransport, TransportError, TransportResult};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Environment variable overriding the API base URL.
const ENV_BASE_URL: &str = "CREWDESK_API_URL";

/// Local-development default when no override is set.
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured base URL could not be parsed.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The offending value.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Where the transport sends requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// Creates a configuration from an explicit base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Resolves the base URL from the `CREWDESK_API_URL` environment
    /// variable, falling back to the local-development default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the override is not a
    /// valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let base_url = Url::parse(&raw).map_err(|err| ConfigError::InvalidBaseUrl {
            url: raw,
            reason: err.to_string(),
        })?;
        Ok(Self { base_url })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Transport backed by a shared `reqwest` client.
///
/// The client's cookie jar carries the refresh token, so credentialed
/// requests need no explicit handling here. JSON bodies get
/// `Content-Type`/`Accept` headers; multipart bodies let `reqwest`
/// generate the content type and boundary.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds a transport with a cookie-enabled client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] when the underlying
    /// client cannot be constructed.
    pub fn new(config: &ApiConfig) -> TransportResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url().clone(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> TransportResult<ApiResponse> {
        let url = self
            .base_url
            .join(request.path().trim_start_matches('/'))
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, url);
        match request.body() {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                builder = builder
                    .json(value)
                    .header(reqwest::header::ACCEPT, "application/json");
            }
            RequestBody::Multipart(parts) => {
                builder = builder.multipart(build_form(parts)?);
            }
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}

/// Builds a multipart form, leaving the boundary to `reqwest`.
fn build_form(parts: &[MultipartPart]) -> TransportResult<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        match part {
            MultipartPart::Text { name, value } => {
                form = form.text(name.clone(), value.clone());
            }
            MultipartPart::File {
                name,
                file_name,
                mime,
                data,
            } => {
                let file_part = reqwest::multipart::Part::bytes(data.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
                form = form.part(name.clone(), file_part);
            }
        }
    }
    Ok(form)
}

/// Parses a response body, treating empty or non-JSON text as null.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or(Value::Null)
}
