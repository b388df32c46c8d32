//! Recording notifier for tests and embedding.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::task::ports::{TaskEvent, TaskNotifier};

/// Notifier that records every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<TaskEvent>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recently delivered event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<TaskEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl TaskNotifier for RecordingNotifier {
    async fn notify(&self, event: TaskEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
