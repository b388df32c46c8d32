//! End-to-end task lifecycle scenarios over the in-memory adapters.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use crewdesk::task::{
    adapters::memory::{
        InMemoryFormResponseRepository, InMemoryTaskRepository, RecordingNotifier,
        RecordingOtpDispatcher,
    },
    domain::{ActorRole, StaffId, TaskStatus, TemplateId, WorkflowSettings},
    services::{
        AssignTaskRequest, CompletionProgress, FormResponseService, TaskLifecycleError,
        TaskLifecycleService,
    },
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;

type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    RecordingNotifier,
    RecordingOtpDispatcher,
    DefaultClock,
>;

fn service(settings: WorkflowSettings) -> (TestService, Arc<RecordingOtpDispatcher>) {
    let dispatcher = Arc::new(RecordingOtpDispatcher::new());
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(RecordingNotifier::new()),
        Arc::clone(&dispatcher),
        Arc::new(DefaultClock),
        settings,
    );
    (service, dispatcher)
}

fn request() -> AssignTaskRequest {
    AssignTaskRequest::new(
        "Complete security training",
        StaffId::new(),
        Utc::now() + Duration::days(5),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gated_completion_runs_to_admin_sign_off() -> eyre::Result<()> {
    let settings = WorkflowSettings::new().with_completion_approval(true);
    let (service, _) = service(settings);
    let clock = DefaultClock;

    // Assignment waits at the initial gate until an admin approves it.
    let assigned = service.assign(request()).await?;
    ensure!(assigned.status() == TaskStatus::PendingApproval);
    let approved = service.approve(assigned.id()).await?;
    ensure!(approved.status() == TaskStatus::NotYetStarted);

    let started = service.start(assigned.id()).await?;
    ensure!(started.status() == TaskStatus::InProgress);

    // The assignee finishes; the authoritative status returns to Pending
    // while the assignee's own view already reads Completed.
    let progress = service.complete(assigned.id()).await?;
    let CompletionProgress::AwaitingApproval(submitted) = progress else {
        bail!("expected a completion awaiting approval, got {progress:?}");
    };
    ensure!(submitted.status() == TaskStatus::PendingApproval);
    ensure!(submitted.pending_completion());
    ensure!(submitted.display_status(&clock) == TaskStatus::Completed);

    // An admin signs the completion off; the task is now terminal.
    let finished = service
        .approve_completion(assigned.id(), ActorRole::Admin)
        .await?;
    ensure!(finished.status() == TaskStatus::Completed);
    ensure!(!finished.pending_completion());
    ensure!(finished.is_terminal());

    let refused = service
        .reopen(assigned.id(), ActorRole::Admin, "second thoughts")
        .await;
    ensure!(refused.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_actions_never_reach_the_reopened_state() -> eyre::Result<()> {
    let settings = WorkflowSettings::new().with_auto_approve(true);
    let (service, _) = service(settings);

    let task = service.assign(request()).await?;
    service.start(task.id()).await?;
    service.hold(task.id()).await?;
    service.resume(task.id()).await?;

    // The only path to Reopened is the admin action.
    let refused = service
        .reopen(task.id(), ActorRole::Assignee, "want another pass")
        .await;
    ensure!(matches!(refused, Err(TaskLifecycleError::Domain(_))));

    let current = service
        .find(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    ensure!(current.status() == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_task_repeats_the_full_cycle() -> eyre::Result<()> {
    let (service, _) = service(WorkflowSettings::new());

    let finished = service.assign(request()).await?;
    service.approve(finished.id()).await?;
    service.start(finished.id()).await?;
    service.complete(finished.id()).await?;

    // Completed tasks are terminal; reopening happens from active work.
    let refused = service
        .reopen(finished.id(), ActorRole::Admin, "wrong certificate uploaded")
        .await;
    ensure!(refused.is_err());

    // A second task goes around the loop via a reopen mid-flight.
    let task = service.assign(request()).await?;
    service.approve(task.id()).await?;
    service.start(task.id()).await?;
    let reopened = service
        .reopen(task.id(), ActorRole::Admin, "wrong certificate uploaded")
        .await?;
    ensure!(reopened.status() == TaskStatus::Reopened);
    ensure!(reopened.reopen_reason() == Some("wrong certificate uploaded"));

    // The reopened task passes the initial gate again before restarting.
    let approved = service.approve(task.id()).await?;
    ensure!(approved.status() == TaskStatus::NotYetStarted);
    service.start(task.id()).await?;
    let progress = service.complete(task.id()).await?;
    ensure!(matches!(progress, CompletionProgress::Completed(_)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn otp_gated_completion_retries_with_a_fresh_code() -> eyre::Result<()> {
    let settings = WorkflowSettings::new()
        .with_auto_approve(true)
        .with_otp_verification(true);
    let (service, dispatcher) = service(settings);

    let task = service.assign(request()).await?;
    service.start(task.id()).await?;

    let first_attempt = service.complete(task.id()).await?;
    ensure!(matches!(first_attempt, CompletionProgress::OtpSent(_)));
    ensure!(dispatcher.dispatch_count() == 1);

    // A wrong submission spends the challenge.
    let refused = service.verify_completion_otp(task.id(), "000000").await;
    ensure!(refused.is_err());

    // Retry with a regenerated code succeeds.
    service.request_completion_otp(task.id()).await?;
    ensure!(dispatcher.dispatch_count() == 2);
    let code = dispatcher
        .last_code_for(task.id())
        .ok_or_else(|| eyre::eyre!("no code dispatched"))?;
    let retry = service
        .verify_completion_otp(task.id(), code.as_str())
        .await?;
    let CompletionProgress::Completed(completed) = retry else {
        bail!("expected an outright completion, got {retry:?}");
    };
    ensure!(completed.status() == TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn form_submission_is_idempotent_per_task_and_template() -> eyre::Result<()> {
    let (lifecycle, _) = service(WorkflowSettings::new().with_auto_approve(true));
    let forms = FormResponseService::new(
        Arc::new(InMemoryFormResponseRepository::new()),
        Arc::new(DefaultClock),
    );

    let task = lifecycle.assign(request()).await?;
    let template = TemplateId::new();
    let mut answers = BTreeMap::new();
    answers.insert("completed_modules".to_owned(), "5".to_owned());

    ensure!(!forms.has_response(task.id(), template).await?);
    forms
        .submit_response(task.id(), template, task.assigned_to(), answers.clone())
        .await?;

    // The existence check suppresses a second prompt; a forced second
    // submission is refused outright.
    ensure!(forms.has_response(task.id(), template).await?);
    let duplicate = forms
        .submit_response(task.id(), template, task.assigned_to(), answers)
        .await;
    ensure!(duplicate.is_err());
    Ok(())
}
