//! Recording passcode dispatcher for tests and embedding.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::task::{
    domain::{OtpCode, Task, TaskId},
    ports::{OtpDispatchResult, OtpDispatcher},
};

/// Dispatcher that captures dispatched codes instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingOtpDispatcher {
    dispatched: Arc<Mutex<Vec<(TaskId, OtpCode)>>>,
}

impl RecordingOtpDispatcher {
    /// Creates an empty recording dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently dispatched code for a task, if any.
    #[must_use]
    pub fn last_code_for(&self, task_id: TaskId) -> Option<OtpCode> {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(id, _)| *id == task_id)
            .map(|(_, code)| code.clone())
    }

    /// Returns how many codes have been dispatched in total.
    #[must_use]
    pub fn dispatch_count(&self) -> usize {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl OtpDispatcher for RecordingOtpDispatcher {
    async fn dispatch(&self, task: &Task, code: &OtpCode) -> OtpDispatchResult<()> {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((task.id(), code.clone()));
        Ok(())
    }
}
