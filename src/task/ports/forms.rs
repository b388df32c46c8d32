//! Repository port for form responses.

use crate::task::domain::{FormResponse, TaskId, TemplateId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for form response repository operations.
pub type FormResponseRepositoryResult<T> = Result<T, FormResponseRepositoryError>;

/// Form response persistence contract, keyed by `(task_id, template_id)`.
#[async_trait]
pub trait FormResponseRepository: Send + Sync {
    /// Stores a response.
    ///
    /// # Errors
    ///
    /// Returns [`FormResponseRepositoryError::DuplicateResponse`] when a
    /// response already exists for the same task and template.
    async fn store(&self, response: &FormResponse) -> FormResponseRepositoryResult<()>;

    /// Returns true when a response exists for the task/template pair.
    async fn exists(
        &self,
        task_id: TaskId,
        template_id: TemplateId,
    ) -> FormResponseRepositoryResult<bool>;

    /// Returns all responses recorded against a task.
    async fn find_for_task(&self, task_id: TaskId)
    -> FormResponseRepositoryResult<Vec<FormResponse>>;
}

/// Errors returned by form response repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FormResponseRepositoryError {
    /// A response for this task/template pair already exists.
    #[error("a response for task {task_id} and template {template_id} already exists")]
    DuplicateResponse {
        /// Task the duplicate targets.
        task_id: TaskId,
        /// Template the duplicate targets.
        template_id: TemplateId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FormResponseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
