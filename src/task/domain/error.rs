//! Error types for task domain validation and transition guards.

use super::{TaskAction, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned by task transition guards and constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The action is not offered from the task's current status.
    #[error("cannot {action} task {task_id} while it is '{status}'")]
    InvalidAction {
        /// Task being acted on.
        task_id: TaskId,
        /// Authoritative status at the time of the action.
        status: TaskStatus,
        /// The refused action.
        action: TaskAction,
    },

    /// Initial approval was attempted while the task awaits completion
    /// sign-off. The two approval gates never overlap.
    #[error("task {0} is awaiting completion sign-off, not initial approval")]
    CompletionApprovalPending(TaskId),

    /// The initial approval gate is disabled by auto-approve.
    #[error("auto-approve is enabled; task {0} has no initial approval gate")]
    AutoApproveEnabled(TaskId),

    /// The action is reserved for administrators.
    #[error("administrator privileges are required to {action} task {task_id}")]
    AdminRequired {
        /// Task being acted on.
        task_id: TaskId,
        /// The refused action.
        action: TaskAction,
    },

    /// No completion sign-off is pending on this task.
    #[error("task {0} has no completion awaiting sign-off")]
    NoCompletionPending(TaskId),

    /// A rejection or reopen reason was blank.
    #[error("a reason is required")]
    MissingReason,

    /// Completion must go through one-time passcode verification.
    #[error("completing task {0} requires one-time passcode verification")]
    OtpVerificationRequired(TaskId),

    /// One-time passcode verification is not enabled for this workflow.
    #[error("one-time passcode verification is not enabled for task {0}")]
    OtpNotEnabled(TaskId),

    /// No active passcode exists; one must be requested first.
    #[error("no active one-time passcode for task {0}; request a new code")]
    OtpNotRequested(TaskId),

    /// The passcode has expired.
    #[error("the one-time passcode for task {0} has expired; request a new code")]
    OtpExpired(TaskId),

    /// The submitted passcode did not match. The challenge is spent and a
    /// fresh code must be requested before the next attempt.
    #[error("incorrect one-time passcode for task {0}; request a new code")]
    OtpMismatch(TaskId),

    /// A blank passcode was submitted.
    #[error("a one-time passcode must not be blank")]
    BlankOtpCode,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing task statuses from the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
