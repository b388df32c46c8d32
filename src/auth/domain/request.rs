//! Request and response descriptors crossing the transport port.

use serde_json::Value;
use std::fmt;

/// Path prefixes that identify authentication endpoints.
///
/// A 401 from one of these is a credential problem, not a session expiry,
/// and must never trigger a refresh (which would loop on bad credentials).
const AUTH_PATHS: [&str; 3] = ["/auth/login", "/auth/register", "/auth/refresh"];

/// HTTP method subset used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Fetch a resource.
    Get,
    /// Create a resource or invoke an action.
    Post,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// A named text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A named binary attachment.
    File {
        /// Field name.
        name: String,
        /// Original file name.
        file_name: String,
        /// MIME type of the payload.
        mime: String,
        /// Raw bytes.
        data: Vec<u8>,
    },
}

/// Request body shape.
///
/// JSON bodies carry explicit `Content-Type`/`Accept` headers; multipart
/// bodies leave the content type to the transport so the boundary is
/// generated correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A JSON document.
    Json(Value),
    /// A multipart form.
    Multipart(Vec<MultipartPart>),
}

/// An outbound API request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    body: RequestBody,
}

impl ApiRequest {
    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a POST request with no body.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a POST request carrying a JSON body.
    #[must_use]
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: RequestBody::Json(body),
        }
    }

    /// Creates a PATCH request carrying a JSON body.
    #[must_use]
    pub fn patch_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Patch,
            path: path.into(),
            body: RequestBody::Json(body),
        }
    }

    /// Creates a POST request carrying a multipart form.
    #[must_use]
    pub fn post_multipart(path: impl Into<String>, parts: Vec<MultipartPart>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: RequestBody::Multipart(parts),
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request body descriptor.
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Returns true for login/register/refresh endpoints, which are exempt
    /// from the refresh-and-retry protocol.
    #[must_use]
    pub fn is_auth_endpoint(&self) -> bool {
        AUTH_PATHS
            .iter()
            .any(|prefix| self.path.starts_with(prefix))
    }
}

/// A transport-level response: status code plus parsed JSON body.
///
/// Non-JSON bodies surface as [`Value::Null`]; callers treat the absence of
/// an error envelope as "no message available".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    /// Creates a response from a status code and body.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the parsed body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the `data` object of a success envelope, if present.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// Extracts the error envelope message (`body.error.message`).
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
    }

    /// Extracts the error envelope message or falls back to generic text.
    #[must_use]
    pub fn error_message_or(&self, fallback: &str) -> String {
        self.error_message().unwrap_or(fallback).to_owned()
    }

    /// Returns true when the error payload indicates a deactivated or
    /// inactive account.
    #[must_use]
    pub fn indicates_deactivation(&self) -> bool {
        self.error_message().is_some_and(|message| {
            let lowered = message.to_ascii_lowercase();
            lowered.contains("deactivat") || lowered.contains("inactive")
        })
    }
}
