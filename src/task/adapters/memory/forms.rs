//! In-memory form response repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{FormResponse, TaskId, TemplateId},
    ports::{FormResponseRepository, FormResponseRepositoryError, FormResponseRepositoryResult},
};

/// Thread-safe in-memory form response repository keyed by
/// `(task_id, template_id)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFormResponseRepository {
    responses: Arc<RwLock<HashMap<(TaskId, TemplateId), FormResponse>>>,
}

impl InMemoryFormResponseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormResponseRepository for InMemoryFormResponseRepository {
    async fn store(&self, response: &FormResponse) -> FormResponseRepositoryResult<()> {
        let mut responses = self.responses.write().map_err(|err| {
            FormResponseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let key = (response.task_id, response.template_id);
        if responses.contains_key(&key) {
            return Err(FormResponseRepositoryError::DuplicateResponse {
                task_id: response.task_id,
                template_id: response.template_id,
            });
        }
        responses.insert(key, response.clone());
        Ok(())
    }

    async fn exists(
        &self,
        task_id: TaskId,
        template_id: TemplateId,
    ) -> FormResponseRepositoryResult<bool> {
        let responses = self.responses.read().map_err(|err| {
            FormResponseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(responses.contains_key(&(task_id, template_id)))
    }

    async fn find_for_task(
        &self,
        task_id: TaskId,
    ) -> FormResponseRepositoryResult<Vec<FormResponse>> {
        let responses = self.responses.read().map_err(|err| {
            FormResponseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(responses
            .values()
            .filter(|response| response.task_id == task_id)
            .cloned()
            .collect())
    }
}
