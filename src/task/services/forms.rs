//! Service layer for form responses attached to tasks.

use crate::task::{
    domain::{FormResponse, StaffId, TaskId, TemplateId},
    ports::{FormResponseRepository, FormResponseRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for form response operations.
#[derive(Debug, Error)]
pub enum FormResponseError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FormResponseRepositoryError),
}

/// Result type for form response service operations.
pub type FormResponseResult<T> = Result<T, FormResponseError>;

/// Form response orchestration service.
///
/// Existence is checked idempotently so a re-submission prompt can be
/// suppressed before any write is attempted.
#[derive(Clone)]
pub struct FormResponseService<F, C>
where
    F: FormResponseRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<F>,
    clock: Arc<C>,
}

impl<F, C> FormResponseService<F, C>
where
    F: FormResponseRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new form response service.
    #[must_use]
    pub const fn new(repository: Arc<F>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns true when a response already exists for the task/template
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns [`FormResponseError::Repository`] when the lookup fails.
    pub async fn has_response(
        &self,
        task_id: TaskId,
        template_id: TemplateId,
    ) -> FormResponseResult<bool> {
        Ok(self.repository.exists(task_id, template_id).await?)
    }

    /// Submits a filled response. At most one response is accepted per
    /// `(task, template)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`FormResponseRepositoryError::DuplicateResponse`] (wrapped)
    /// when a response already exists.
    pub async fn submit_response(
        &self,
        task_id: TaskId,
        template_id: TemplateId,
        submitted_by: StaffId,
        answers: BTreeMap<String, String>,
    ) -> FormResponseResult<FormResponse> {
        let response = FormResponse::new(task_id, template_id, submitted_by, answers, &*self.clock);
        self.repository.store(&response).await?;
        Ok(response)
    }

    /// Returns all responses recorded against a task.
    ///
    /// # Errors
    ///
    /// Returns [`FormResponseError::Repository`] when the lookup fails.
    pub async fn responses_for_task(&self, task_id: TaskId) -> FormResponseResult<Vec<FormResponse>> {
        Ok(self.repository.find_for_task(task_id).await?)
    }
}
