//! Service layer orchestrating task transitions, approvals, and the OTP
//! completion sub-flow.

use crate::task::{
    domain::{
        ActorRole, CompletionOutcome, StaffId, Task, TaskAction, TaskDomainError, TaskId,
        WorkflowSettings,
    },
    ports::{
        OtpDispatchError, OtpDispatcher, TaskEvent, TaskNotifier, TaskRepository,
        TaskRepositoryError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    title: String,
    assigned_to: StaffId,
    expected_completion_date: DateTime<Utc>,
}

impl AssignTaskRequest {
    /// Creates an assignment request.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        assigned_to: StaffId,
        expected_completion_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            assigned_to,
            expected_completion_date,
        }
    }
}

/// Progress of a completion request.
///
/// Completion is not always a single transition: with OTP verification
/// enabled the first call only dispatches a code, and with the sign-off gate
/// enabled the task waits for an administrator.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionProgress {
    /// The task completed outright.
    Completed(Task),
    /// The completion awaits administrative sign-off.
    AwaitingApproval(Task),
    /// A verification code was dispatched; completion resumes on
    /// [`TaskLifecycleService::verify_completion_otp`].
    OtpSent(Task),
}

impl CompletionProgress {
    /// Returns the task carried by the progress value.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Completed(task) | Self::AwaitingApproval(task) | Self::OtpSent(task) => task,
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// A transition guard refused the action.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Passcode delivery failed.
    #[error(transparent)]
    OtpDispatch(#[from] OtpDispatchError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every successful mutation is persisted through the repository's
/// optimistic version check, emits one [`TaskEvent`], and returns the stored
/// task so the caller's view matches the authoritative state.
#[derive(Clone)]
pub struct TaskLifecycleService<R, N, O, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    O: OtpDispatcher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    otp_dispatcher: Arc<O>,
    clock: Arc<C>,
    settings: WorkflowSettings,
}

impl<R, N, O, C> TaskLifecycleService<R, N, O, C>
where
    R: TaskRepository,
    N: TaskNotifier,
    O: OtpDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        otp_dispatcher: Arc<O>,
        clock: Arc<C>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            repository,
            notifier,
            otp_dispatcher,
            clock,
            settings,
        }
    }

    /// Returns the workflow settings the service enforces.
    #[must_use]
    pub const fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Assigns a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation fails or the
    /// repository rejects the new record.
    pub async fn assign(&self, request: AssignTaskRequest) -> TaskLifecycleResult<Task> {
        let task = Task::assign(
            request.title,
            request.assigned_to,
            request.expected_completion_date,
            &self.settings,
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        self.emit(&task, TaskAction::Assign, "Task assigned").await;
        Ok(task)
    }

    /// Begins work on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the guard refuses or persistence
    /// fails.
    pub async fn start(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.start(&self.settings, &*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Start, "Task started")
            .await
    }

    /// Passes the initial approval gate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the guard refuses or persistence
    /// fails.
    pub async fn approve(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.approve(&self.settings, &*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Approve, "Task approved")
            .await
    }

    /// Refuses the initial approval gate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the reason is blank, the guard
    /// refuses, or persistence fails.
    pub async fn reject(&self, task_id: TaskId, reason: &str) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.reject(&self.settings, reason, &*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Reject, "Task rejected")
            .await
    }

    /// Pauses in-progress work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the guard refuses or persistence
    /// fails.
    pub async fn hold(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.hold(&*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Hold, "Task put on hold")
            .await
    }

    /// Resumes paused work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the guard refuses or persistence
    /// fails.
    pub async fn resume(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.resume(&*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Resume, "Task resumed")
            .await
    }

    /// Marks work as finished.
    ///
    /// With OTP verification enabled this dispatches a code instead of
    /// transitioning; otherwise the completion applies immediately, gated by
    /// the sign-off setting.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the guard refuses, code dispatch
    /// fails, or persistence fails.
    pub async fn complete(&self, task_id: TaskId) -> TaskLifecycleResult<CompletionProgress> {
        if self.settings.enable_otp_verification {
            let task = self.request_completion_otp(task_id).await?;
            return Ok(CompletionProgress::OtpSent(task));
        }
        let mut task = self.load(task_id).await?;
        let outcome = task.complete(&self.settings, &*self.clock)?;
        self.finish_completion(&task, TaskAction::Complete, outcome)
            .await
    }

    /// Issues and dispatches a fresh completion passcode. Also used to
    /// regenerate a code after a rejected submission.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the workflow does not use
    /// passcodes, the guard refuses, dispatch fails, or persistence fails.
    pub async fn request_completion_otp(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let code = task.begin_otp_challenge(&self.settings, &*self.clock)?;
        let stored = self.repository.update(&task).await?;
        self.otp_dispatcher.dispatch(&stored, &code).await?;
        tracing::debug!(task_id = %stored.id(), "completion passcode dispatched");
        self.emit(&stored, TaskAction::RequestOtp, "Verification code sent")
            .await;
        Ok(stored)
    }

    /// Submits a completion passcode. On success the completion transition
    /// is finalised per the sign-off setting.
    ///
    /// On a rejected submission the task's status and flag are unchanged but
    /// the spent challenge is persisted, so a fresh code must be requested
    /// before the next attempt.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] carrying the OTP-specific domain error
    /// on rejection, or persistence errors.
    pub async fn verify_completion_otp(
        &self,
        task_id: TaskId,
        code: &str,
    ) -> TaskLifecycleResult<CompletionProgress> {
        let mut task = self.load(task_id).await?;
        match task.verify_otp(code, &self.settings, &*self.clock) {
            Ok(outcome) => {
                self.finish_completion(&task, TaskAction::VerifyOtp, outcome)
                    .await
            }
            Err(
                err @ (TaskDomainError::OtpMismatch(_) | TaskDomainError::OtpExpired(_)),
            ) => {
                // The challenge was spent; persist that so a stale code
                // cannot be replayed.
                self.repository.update(&task).await?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Signs off a completion awaiting approval. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not an
    /// administrator, nothing awaits sign-off, or persistence fails.
    pub async fn approve_completion(
        &self,
        task_id: TaskId,
        actor: ActorRole,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.approve_completion(actor, &*self.clock)?;
        self.persist_and_notify(&task, TaskAction::ApproveCompletion, "Completion approved")
            .await
    }

    /// Sends a completion awaiting approval back to work. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not an
    /// administrator, nothing awaits sign-off, or persistence fails.
    pub async fn reject_completion(
        &self,
        task_id: TaskId,
        actor: ActorRole,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.reject_completion(actor, &*self.clock)?;
        self.persist_and_notify(
            &task,
            TaskAction::RejectCompletion,
            "Completion rejected; task returned to in progress",
        )
        .await
    }

    /// Reopens a non-terminal task, recording the reason. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not an
    /// administrator, the reason is blank, the task is terminal, or
    /// persistence fails.
    pub async fn reopen(
        &self,
        task_id: TaskId,
        actor: ActorRole,
        reason: &str,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.reopen(actor, reason, &*self.clock)?;
        self.persist_and_notify(&task, TaskAction::Reopen, "Task reopened")
            .await
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns all tasks assigned to a staff member.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_for(&self, staff: StaffId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_assignee(staff).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(task_id).into())
    }

    async fn finish_completion(
        &self,
        task: &Task,
        action: TaskAction,
        outcome: CompletionOutcome,
    ) -> TaskLifecycleResult<CompletionProgress> {
        let message = match outcome {
            CompletionOutcome::Completed => "Task completed",
            CompletionOutcome::AwaitingApproval => "Completion submitted for approval",
        };
        let stored = self.persist_and_notify(task, action, message).await?;
        Ok(match outcome {
            CompletionOutcome::Completed => CompletionProgress::Completed(stored),
            CompletionOutcome::AwaitingApproval => CompletionProgress::AwaitingApproval(stored),
        })
    }

    async fn persist_and_notify(
        &self,
        task: &Task,
        action: TaskAction,
        message: &str,
    ) -> TaskLifecycleResult<Task> {
        let stored = self.repository.update(task).await?;
        self.emit(&stored, action, message).await;
        Ok(stored)
    }

    async fn emit(&self, task: &Task, action: TaskAction, message: &str) {
        tracing::debug!(task_id = %task.id(), action = %action, status = %task.status(), "task transition");
        self.notifier
            .notify(TaskEvent {
                task_id: task.id(),
                action,
                status: task.status(),
                pending_completion: task.pending_completion(),
                message: message.to_owned(),
            })
            .await;
    }
}
