//! Task aggregate root and its transition guards.

use super::{
    ActorRole, OtpChallenge, OtpCode, StaffId, TaskAction, TaskDomainError, TaskId, TaskStatus,
    WorkflowSettings,
    otp::OtpRejection,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Result of a finalised completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The task is terminal; no further sign-off is required.
    Completed,
    /// The completion awaits administrative sign-off. The assignee sees the
    /// task as completed while the authoritative status stays `Pending`.
    AwaitingApproval,
}

/// Task aggregate root.
///
/// The `pending_completion` flag overlays the status dimension: it is set
/// only while the authoritative status is [`TaskStatus::PendingApproval`]
/// and marks "awaiting completion sign-off", a distinct gate from the
/// initial approval gate. The guards on [`Task::approve`] and
/// [`Task::reject`] keep the two gates from ever overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    assigned_to: StaffId,
    assigned_date: DateTime<Utc>,
    expected_completion_date: DateTime<Utc>,
    status: TaskStatus,
    pending_completion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reopen_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    otp: Option<OtpChallenge>,
    #[serde(default)]
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a newly assigned task.
    ///
    /// With auto-approve enabled the task skips the initial approval gate
    /// and starts at [`TaskStatus::NotYetStarted`]; otherwise it waits at
    /// [`TaskStatus::PendingApproval`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn assign(
        title: impl Into<String>,
        assigned_to: StaffId,
        expected_completion_date: DateTime<Utc>,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title_value = title.into();
        if title_value.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let status = if settings.auto_approve {
            TaskStatus::NotYetStarted
        } else {
            TaskStatus::PendingApproval
        };
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: title_value,
            assigned_to,
            assigned_date: timestamp,
            expected_completion_date,
            status,
            pending_completion: false,
            reopen_reason: None,
            otp: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the assigned staff member.
    #[must_use]
    pub const fn assigned_to(&self) -> StaffId {
        self.assigned_to
    }

    /// Returns when the task was assigned.
    #[must_use]
    pub const fn assigned_date(&self) -> DateTime<Utc> {
        self.assigned_date
    }

    /// Returns the expected completion date.
    #[must_use]
    pub const fn expected_completion_date(&self) -> DateTime<Utc> {
        self.expected_completion_date
    }

    /// Returns the authoritative lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns true while a completion awaits administrative sign-off.
    #[must_use]
    pub const fn pending_completion(&self) -> bool {
        self.pending_completion
    }

    /// Returns the reason recorded by the most recent reopen, if any.
    #[must_use]
    pub fn reopen_reason(&self) -> Option<&str> {
        self.reopen_reason.as_deref()
    }

    /// Returns the active passcode challenge, if any.
    #[must_use]
    pub const fn otp_challenge(&self) -> Option<&OtpChallenge> {
        self.otp.as_ref()
    }

    /// Returns the optimistic-concurrency version stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true when no further transitions are offered.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.status, TaskStatus::Rejected | TaskStatus::Completed)
    }

    /// Returns the assignee-facing status.
    ///
    /// A completion awaiting sign-off renders as `Completed` even though the
    /// authoritative status is still `Pending`; an in-progress task past its
    /// expected completion date renders as `Delayed`.
    #[must_use]
    pub fn display_status(&self, clock: &impl Clock) -> TaskStatus {
        if self.pending_completion {
            return TaskStatus::Completed;
        }
        if self.status == TaskStatus::InProgress && clock.utc() > self.expected_completion_date {
            return TaskStatus::Delayed;
        }
        self.status
    }

    /// Begins work on an approved or auto-approved task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAction`] unless the task is
    /// `NotYetStarted`, or `Reopened` with auto-approve enabled.
    pub fn start(
        &mut self,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let allowed = match self.status {
            TaskStatus::NotYetStarted => true,
            TaskStatus::Reopened => settings.auto_approve,
            _ => false,
        };
        if !allowed {
            return Err(self.invalid_action(TaskAction::Start));
        }
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Passes the initial approval gate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionApprovalPending`] when the task
    /// is actually waiting on completion sign-off,
    /// [`TaskDomainError::AutoApproveEnabled`] when no initial gate exists,
    /// or [`TaskDomainError::InvalidAction`] from other statuses.
    pub fn approve(
        &mut self,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_initial_gate(settings, TaskAction::Approve)?;
        self.status = TaskStatus::NotYetStarted;
        self.touch(clock);
        Ok(())
    }

    /// Refuses the initial approval gate. Terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingReason`] for a blank reason, plus
    /// the same guard errors as [`Task::approve`].
    pub fn reject(
        &mut self,
        settings: &WorkflowSettings,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if reason.trim().is_empty() {
            return Err(TaskDomainError::MissingReason);
        }
        self.check_initial_gate(settings, TaskAction::Reject)?;
        self.status = TaskStatus::Rejected;
        self.touch(clock);
        Ok(())
    }

    /// Pauses in-progress work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAction`] unless the task is in
    /// progress (or its delayed rendering).
    pub fn hold(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if !self.status.is_in_progress() {
            return Err(self.invalid_action(TaskAction::Hold));
        }
        self.status = TaskStatus::Hold;
        self.touch(clock);
        Ok(())
    }

    /// Resumes paused work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAction`] unless the task is held.
    pub fn resume(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Hold {
            return Err(self.invalid_action(TaskAction::Resume));
        }
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Marks in-progress work as finished.
    ///
    /// With the completion sign-off gate enabled the authoritative status
    /// moves back to `Pending` with `pending_completion` set; otherwise the
    /// task completes outright.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OtpVerificationRequired`] when the
    /// workflow requires passcode verification (use the OTP sub-flow), or
    /// [`TaskDomainError::InvalidAction`] when the task is not in progress.
    pub fn complete(
        &mut self,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<CompletionOutcome, TaskDomainError> {
        if !self.status.is_in_progress() {
            return Err(self.invalid_action(TaskAction::Complete));
        }
        if settings.enable_otp_verification {
            return Err(TaskDomainError::OtpVerificationRequired(self.id));
        }
        Ok(self.finish(settings, clock))
    }

    /// Issues a fresh completion passcode challenge, returning the plain
    /// code for out-of-band dispatch. Replaces any prior challenge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OtpNotEnabled`] when the workflow does not
    /// use passcodes, or [`TaskDomainError::InvalidAction`] when the task is
    /// not in progress.
    pub fn begin_otp_challenge(
        &mut self,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<OtpCode, TaskDomainError> {
        if !settings.enable_otp_verification {
            return Err(TaskDomainError::OtpNotEnabled(self.id));
        }
        if !self.status.is_in_progress() {
            return Err(self.invalid_action(TaskAction::RequestOtp));
        }
        let (challenge, code) = OtpChallenge::issue(clock);
        self.otp = Some(challenge);
        self.touch(clock);
        Ok(code)
    }

    /// Submits a completion passcode.
    ///
    /// On success the completion transition is applied exactly as
    /// [`Task::complete`] would without passcode verification. On failure
    /// the status and `pending_completion` flag are unchanged and the
    /// challenge is spent, so a fresh code must be requested.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::BlankOtpCode`],
    /// [`TaskDomainError::OtpNotRequested`], [`TaskDomainError::OtpExpired`]
    /// or [`TaskDomainError::OtpMismatch`] for the respective failures, plus
    /// the guard errors of the complete action.
    pub fn verify_otp(
        &mut self,
        code: &str,
        settings: &WorkflowSettings,
        clock: &impl Clock,
    ) -> Result<CompletionOutcome, TaskDomainError> {
        if !settings.enable_otp_verification {
            return Err(TaskDomainError::OtpNotEnabled(self.id));
        }
        if code.trim().is_empty() {
            return Err(TaskDomainError::BlankOtpCode);
        }
        if !self.status.is_in_progress() {
            return Err(self.invalid_action(TaskAction::VerifyOtp));
        }
        let task_id = self.id;
        let challenge = self
            .otp
            .as_mut()
            .ok_or(TaskDomainError::OtpNotRequested(task_id))?;
        match challenge.submit(code, clock) {
            Ok(()) => {
                self.otp = None;
                Ok(self.finish(settings, clock))
            }
            Err(OtpRejection::Spent) => Err(TaskDomainError::OtpNotRequested(task_id)),
            Err(OtpRejection::Expired) => Err(TaskDomainError::OtpExpired(task_id)),
            Err(OtpRejection::Mismatch) => Err(TaskDomainError::OtpMismatch(task_id)),
        }
    }

    /// Signs off a completion awaiting approval. Admin only. Terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] for non-admin callers or
    /// [`TaskDomainError::NoCompletionPending`] when nothing awaits
    /// sign-off.
    pub fn approve_completion(
        &mut self,
        actor: ActorRole,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_completion_gate(actor, TaskAction::ApproveCompletion)?;
        self.status = TaskStatus::Completed;
        self.pending_completion = false;
        self.touch(clock);
        Ok(())
    }

    /// Sends a completion awaiting approval back to work. Admin only.
    ///
    /// # Errors
    ///
    /// Returns the same guard errors as [`Task::approve_completion`].
    pub fn reject_completion(
        &mut self,
        actor: ActorRole,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_completion_gate(actor, TaskAction::RejectCompletion)?;
        self.status = TaskStatus::InProgress;
        self.pending_completion = false;
        self.touch(clock);
        Ok(())
    }

    /// Reopens a non-terminal task for further work, recording the reason.
    /// Admin only, regardless of settings.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] for non-admin callers,
    /// [`TaskDomainError::MissingReason`] for a blank reason, or
    /// [`TaskDomainError::InvalidAction`] from terminal statuses.
    pub fn reopen(
        &mut self,
        actor: ActorRole,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !actor.is_admin() {
            return Err(TaskDomainError::AdminRequired {
                task_id: self.id,
                action: TaskAction::Reopen,
            });
        }
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::MissingReason);
        }
        if self.is_terminal() {
            return Err(self.invalid_action(TaskAction::Reopen));
        }
        self.status = TaskStatus::Reopened;
        self.pending_completion = false;
        self.otp = None;
        self.reopen_reason = Some(trimmed.to_owned());
        self.touch(clock);
        Ok(())
    }

    /// Advances the version stamp after a successful persist.
    pub(crate) fn advance_version(&mut self) {
        self.version += 1;
    }

    /// Applies the completion transition per the sign-off setting.
    fn finish(&mut self, settings: &WorkflowSettings, clock: &impl Clock) -> CompletionOutcome {
        self.otp = None;
        let outcome = if settings.require_approval_on_complete {
            self.status = TaskStatus::PendingApproval;
            self.pending_completion = true;
            CompletionOutcome::AwaitingApproval
        } else {
            self.status = TaskStatus::Completed;
            self.pending_completion = false;
            CompletionOutcome::Completed
        };
        self.touch(clock);
        outcome
    }

    /// Guards the initial approval gate for approve/reject.
    fn check_initial_gate(
        &self,
        settings: &WorkflowSettings,
        action: TaskAction,
    ) -> Result<(), TaskDomainError> {
        if self.pending_completion {
            return Err(TaskDomainError::CompletionApprovalPending(self.id));
        }
        if settings.auto_approve {
            return Err(TaskDomainError::AutoApproveEnabled(self.id));
        }
        if !matches!(
            self.status,
            TaskStatus::PendingApproval | TaskStatus::Reopened
        ) {
            return Err(self.invalid_action(action));
        }
        Ok(())
    }

    /// Guards the completion sign-off gate for the admin pair.
    fn check_completion_gate(
        &self,
        actor: ActorRole,
        action: TaskAction,
    ) -> Result<(), TaskDomainError> {
        if !actor.is_admin() {
            return Err(TaskDomainError::AdminRequired {
                task_id: self.id,
                action,
            });
        }
        if !self.pending_completion {
            return Err(TaskDomainError::NoCompletionPending(self.id));
        }
        Ok(())
    }

    const fn invalid_action(&self, action: TaskAction) -> TaskDomainError {
        TaskDomainError::InvalidAction {
            task_id: self.id,
            status: self.status,
            action,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
