//! Task status enumeration and the actor roles that drive it.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative task lifecycle status.
///
/// Serialisation uses the backend's historical wire names (for example
/// `"Completed Tasks"`), which also appear verbatim in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Approved (or auto-approved) but work has not started.
    #[serde(rename = "Not yet Started")]
    NotYetStarted,
    /// Awaiting an approval gate. Which gate depends on the
    /// `pending_completion` flag on the task.
    #[serde(rename = "Pending")]
    PendingApproval,
    /// Work is underway.
    #[serde(rename = "In progress")]
    InProgress,
    /// Work is underway but past the expected completion date.
    #[serde(rename = "Delayed Tasks")]
    Delayed,
    /// Work is finished and (where required) signed off.
    #[serde(rename = "Completed Tasks")]
    Completed,
    /// An administrator has reopened the task for further work.
    #[serde(rename = "Reopened")]
    Reopened,
    /// The task was rejected at the initial approval gate.
    #[serde(rename = "Rejected")]
    Rejected,
    /// Work is paused.
    #[serde(rename = "Hold")]
    Hold,
}

impl TaskStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotYetStarted => "Not yet Started",
            Self::PendingApproval => "Pending",
            Self::InProgress => "In progress",
            Self::Delayed => "Delayed Tasks",
            Self::Completed => "Completed Tasks",
            Self::Reopened => "Reopened",
            Self::Rejected => "Rejected",
            Self::Hold => "Hold",
        }
    }

    /// Returns true when work may proceed from this status.
    ///
    /// `Delayed` is the overdue rendering of an in-progress task and is
    /// treated identically to `InProgress` by every transition guard.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress | Self::Delayed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Not yet Started" => Ok(Self::NotYetStarted),
            "Pending" => Ok(Self::PendingApproval),
            "In progress" => Ok(Self::InProgress),
            "Delayed Tasks" => Ok(Self::Delayed),
            "Completed Tasks" => Ok(Self::Completed),
            "Reopened" => Ok(Self::Reopened),
            "Rejected" => Ok(Self::Rejected),
            "Hold" => Ok(Self::Hold),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of the caller performing a task action.
///
/// Reopening and the completion-approval pair are admin-only regardless of
/// workflow settings; this asymmetry is a permanent guard, not a
/// configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// The staff member the task is assigned to.
    Assignee,
    /// An administrator or approver.
    Admin,
}

impl ActorRole {
    /// Returns true for administrative callers.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Task action names used in guard errors and notification events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Assign a new task to a staff member.
    Assign,
    /// Begin work on an approved task.
    Start,
    /// Pass the initial approval gate.
    Approve,
    /// Refuse the initial approval gate.
    Reject,
    /// Pause in-progress work.
    Hold,
    /// Resume paused work.
    Resume,
    /// Mark work as finished.
    Complete,
    /// Sign off a completion awaiting approval.
    ApproveCompletion,
    /// Send a completion awaiting approval back to work.
    RejectCompletion,
    /// Reopen a task for further work.
    Reopen,
    /// Request a completion one-time passcode.
    RequestOtp,
    /// Submit a completion one-time passcode.
    VerifyOtp,
}

impl TaskAction {
    /// Returns the action name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Start => "start",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Hold => "hold",
            Self::Resume => "resume",
            Self::Complete => "complete",
            Self::ApproveCompletion => "approve-completion",
            Self::RejectCompletion => "reject-completion",
            Self::Reopen => "reopen",
            Self::RequestOtp => "request-otp",
            Self::VerifyOtp => "verify-otp",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
