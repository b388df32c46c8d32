//! Notification port for user-facing transition outcomes.

use crate::task::domain::{TaskAction, TaskId, TaskStatus};
use async_trait::async_trait;

/// Outcome of a task transition, delivered to the presentation layer.
///
/// A transition is not complete until the caller's view is consistent with
/// the server's; the service emits one event per successful mutation and
/// returns the updated task alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEvent {
    /// Task the event concerns.
    pub task_id: TaskId,
    /// Action that produced the event.
    pub action: TaskAction,
    /// Authoritative status after the transition.
    pub status: TaskStatus,
    /// Whether a completion now awaits sign-off.
    pub pending_completion: bool,
    /// Human-readable outcome message.
    pub message: String,
}

/// Sink for transition outcome events.
#[async_trait]
pub trait TaskNotifier: Send + Sync {
    /// Delivers one outcome event. Delivery is best-effort; failures are the
    /// adapter's concern.
    async fn notify(&self, event: TaskEvent);
}
