//! Repository port for task persistence and lookup.

use crate::task::domain::{StaffId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Updates are guarded by the task's optimistic version stamp so concurrent
/// actions on the same task surface as a conflict instead of silently
/// interleaving.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task, returning the stored copy with
    /// an advanced version stamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist or [`TaskRepositoryError::VersionConflict`] when the caller's
    /// copy is stale.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks assigned to the given staff member.
    async fn find_by_assignee(&self, staff: StaffId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The caller's copy of the task is stale.
    #[error("version conflict on task {task_id}: submitted {submitted}, stored {stored}")]
    VersionConflict {
        /// Task being updated.
        task_id: TaskId,
        /// Version stamp on the submitted copy.
        submitted: u64,
        /// Version stamp currently stored.
        stored: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
