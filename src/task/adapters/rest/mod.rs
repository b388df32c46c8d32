//! REST adapter mapping lifecycle actions onto the backend task API.
//!
//! Every call goes through the [`AuthenticatedClient`], so token refresh and
//! forced teardown apply uniformly. Successful responses arrive wrapped in a
//! `{ "success": true, "data": { "task": … } }` envelope; failures carry a
//! `{ "error": { "message": … } }` payload that is surfaced to the caller,
//! falling back to a generic message when absent.

use crate::auth::domain::{ApiRequest, ApiResponse};
use crate::auth::ports::{HttpTransport, Navigator, SessionStore};
use crate::auth::services::{ApiClientError, AuthenticatedClient, GENERIC_ERROR_MESSAGE};
use crate::task::domain::{Task, TaskId, TaskStatus};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the REST task client.
#[derive(Debug, Error)]
pub enum RestTaskError {
    /// Transport, refresh, or session failure.
    #[error(transparent)]
    Client(#[from] ApiClientError),
    /// The backend rejected the action.
    #[error("task request rejected ({status}): {message}")]
    Backend {
        /// HTTP status of the rejection.
        status: u16,
        /// Server-supplied message, or the generic fallback.
        message: String,
    },
    /// The response envelope did not contain a task.
    #[error("malformed task payload: {0}")]
    MalformedPayload(String),
}

/// Result alias for REST task operations.
pub type RestTaskResult<T> = Result<T, RestTaskError>;

/// Task lifecycle actions over the HTTP API.
pub struct RestTaskClient<T, S, V>
where
    T: HttpTransport,
    S: SessionStore,
    V: Navigator + 'static,
{
    client: Arc<AuthenticatedClient<T, S, V>>,
}

impl<T, S, V> RestTaskClient<T, S, V>
where
    T: HttpTransport,
    S: SessionStore,
    V: Navigator + 'static,
{
    /// Creates a REST task client over an authenticated API client.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S, V>>) -> Self {
        Self { client }
    }

    /// Moves a task to the given status.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn update_status(&self, id: TaskId, status: TaskStatus) -> RestTaskResult<Task> {
        let path = format!("/tasks/{id}/status");
        let request = ApiRequest::patch_json(path, json!({ "status": status.as_str() }));
        self.dispatch(request).await
    }

    /// Approves a newly assigned or reopened task.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn approve(&self, id: TaskId) -> RestTaskResult<Task> {
        self.post_action(id, "approve", json!({})).await
    }

    /// Rejects a task with a reason.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn reject(&self, id: TaskId, reason: &str) -> RestTaskResult<Task> {
        self.post_action(id, "reject", json!({ "reason": reason })).await
    }

    /// Approves a pending completion.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn approve_completion(&self, id: TaskId) -> RestTaskResult<Task> {
        self.post_action(id, "approve-completion", json!({})).await
    }

    /// Rejects a pending completion, returning the task to in progress.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn reject_completion(&self, id: TaskId) -> RestTaskResult<Task> {
        self.post_action(id, "reject-completion", json!({})).await
    }

    /// Reopens a task with a reason.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn reopen(&self, id: TaskId, reason: &str) -> RestTaskResult<Task> {
        self.post_action(id, "reopen", json!({ "reason": reason })).await
    }

    /// Requests a completion verification code for the task.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn generate_otp(&self, id: TaskId) -> RestTaskResult<Task> {
        self.post_action(id, "generate-otp", json!({})).await
    }

    /// Submits a completion verification code.
    ///
    /// # Errors
    ///
    /// Returns [`RestTaskError`] when the request fails, is rejected, or
    /// yields a malformed payload.
    pub async fn verify_otp(&self, id: TaskId, code: &str) -> RestTaskResult<Task> {
        self.post_action(id, "verify-otp", json!({ "code": code })).await
    }

    async fn post_action(
        &self,
        id: TaskId,
        action: &str,
        payload: serde_json::Value,
    ) -> RestTaskResult<Task> {
        let path = format!("/tasks/{id}/{action}");
        self.dispatch(ApiRequest::post_json(path, payload)).await
    }

    async fn dispatch(&self, request: ApiRequest) -> RestTaskResult<Task> {
        let response = self.client.send(request).await?;
        unwrap_task(&response)
    }
}

/// Extracts the task from a success envelope, or maps the failure.
fn unwrap_task(response: &ApiResponse) -> RestTaskResult<Task> {
    if !response.is_success() {
        return Err(RestTaskError::Backend {
            status: response.status(),
            message: response.error_message_or(GENERIC_ERROR_MESSAGE),
        });
    }
    let payload = response
        .data()
        .and_then(|data| data.get("task"))
        .ok_or_else(|| RestTaskError::MalformedPayload("missing data.task".to_owned()))?;
    serde_json::from_value(payload.clone())
        .map_err(|err| RestTaskError::MalformedPayload(err.to_string()))
}
