//! Service orchestration tests over the in-memory adapters.

use std::sync::Arc;

use crate::task::{
    adapters::memory::{
        InMemoryFormResponseRepository, InMemoryTaskRepository, RecordingNotifier,
        RecordingOtpDispatcher,
    },
    domain::{ActorRole, StaffId, TaskAction, TaskDomainError, TaskStatus, TemplateId,
        WorkflowSettings},
    ports::{FormResponseRepositoryError, TaskRepository, TaskRepositoryError},
    services::{
        AssignTaskRequest, CompletionProgress, FormResponseError, FormResponseService,
        TaskLifecycleError, TaskLifecycleService,
    },
};
use chrono::{Duration, Utc};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use std::collections::BTreeMap;

type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    RecordingNotifier,
    RecordingOtpDispatcher,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    repository: Arc<InMemoryTaskRepository>,
    notifier: Arc<RecordingNotifier>,
    dispatcher: Arc<RecordingOtpDispatcher>,
}

fn harness(settings: WorkflowSettings) -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let dispatcher = Arc::new(RecordingOtpDispatcher::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&notifier),
        Arc::clone(&dispatcher),
        Arc::new(DefaultClock),
        settings,
    );
    Harness {
        service,
        repository,
        notifier,
        dispatcher,
    }
}

fn request() -> AssignTaskRequest {
    AssignTaskRequest::new(
        "Collect signed contract",
        StaffId::new(),
        Utc::now() + Duration::days(3),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_persists_and_is_retrievable() -> eyre::Result<()> {
    let harness = harness(WorkflowSettings::new());

    let created = harness.service.assign(request()).await?;
    let fetched = harness.service.find(created.id()).await?;

    ensure!(fetched == Some(created.clone()));
    ensure!(created.status() == TaskStatus::PendingApproval);
    let event = harness
        .notifier
        .last_event()
        .ok_or_else(|| eyre::eyre!("no event recorded"))?;
    ensure!(event.action == TaskAction::Assign);
    ensure!(event.message == "Task assigned");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ungated_workflow_runs_assignment_to_completion() -> eyre::Result<()> {
    let harness = harness(WorkflowSettings::new().with_auto_approve(true));
    let created = harness.service.assign(request()).await?;

    harness.service.start(created.id()).await?;
    let progress = harness.service.complete(created.id()).await?;

    let CompletionProgress::Completed(task) = progress else {
        bail!("expected an outright completion, got {progress:?}");
    };
    ensure!(task.status() == TaskStatus::Completed);
    ensure!(task.version() == 2);
    let actions: Vec<TaskAction> = harness
        .notifier
        .events()
        .into_iter()
        .map(|event| event.action)
        .collect();
    ensure!(actions == vec![TaskAction::Assign, TaskAction::Start, TaskAction::Complete]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gated_completion_waits_for_an_administrator() -> eyre::Result<()> {
    let settings = WorkflowSettings::new()
        .with_auto_approve(true)
        .with_completion_approval(true);
    let harness = harness(settings);
    let created = harness.service.assign(request()).await?;
    harness.service.start(created.id()).await?;

    let progress = harness.service.complete(created.id()).await?;
    let CompletionProgress::AwaitingApproval(task) = progress else {
        bail!("expected a completion awaiting approval, got {progress:?}");
    };
    ensure!(task.status() == TaskStatus::PendingApproval);
    ensure!(task.pending_completion());

    let approved = harness
        .service
        .approve_completion(created.id(), ActorRole::Admin)
        .await?;
    ensure!(approved.status() == TaskStatus::Completed);
    ensure!(!approved.pending_completion());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_completion_returns_the_task_to_work() -> eyre::Result<()> {
    let settings = WorkflowSettings::new()
        .with_auto_approve(true)
        .with_completion_approval(true);
    let harness = harness(settings);
    let created = harness.service.assign(request()).await?;
    harness.service.start(created.id()).await?;
    harness.service.complete(created.id()).await?;

    let returned = harness
        .service
        .reject_completion(created.id(), ActorRole::Admin)
        .await?;

    ensure!(returned.status() == TaskStatus::InProgress);
    ensure!(!returned.pending_completion());
    let event = harness
        .notifier
        .last_event()
        .ok_or_else(|| eyre::eyre!("no event recorded"))?;
    ensure!(event.message == "Completion rejected; task returned to in progress");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn otp_completion_dispatches_a_code_then_finishes_on_verification() -> eyre::Result<()> {
    let settings = WorkflowSettings::new()
        .with_auto_approve(true)
        .with_otp_verification(true);
    let harness = harness(settings);
    let created = harness.service.assign(request()).await?;
    harness.service.start(created.id()).await?;

    let first_attempt = harness.service.complete(created.id()).await?;
    let CompletionProgress::OtpSent(pending) = first_attempt else {
        bail!("expected a dispatched code, got {first_attempt:?}");
    };
    ensure!(pending.status() == TaskStatus::InProgress);
    ensure!(harness.dispatcher.dispatch_count() == 1);

    let code = harness
        .dispatcher
        .last_code_for(created.id())
        .ok_or_else(|| eyre::eyre!("no code dispatched"))?;
    let verified = harness
        .service
        .verify_completion_otp(created.id(), code.as_str())
        .await?;
    let CompletionProgress::Completed(completed) = verified else {
        bail!("expected an outright completion, got {verified:?}");
    };
    ensure!(completed.status() == TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_otp_attempt_requires_a_fresh_code() -> eyre::Result<()> {
    let settings = WorkflowSettings::new()
        .with_auto_approve(true)
        .with_otp_verification(true);
    let harness = harness(settings);
    let created = harness.service.assign(request()).await?;
    harness.service.start(created.id()).await?;
    harness.service.complete(created.id()).await?;
    let stale = harness
        .dispatcher
        .last_code_for(created.id())
        .ok_or_else(|| eyre::eyre!("no code dispatched"))?;

    let refused = harness
        .service
        .verify_completion_otp(created.id(), "WRONG1")
        .await;
    ensure!(matches!(
        refused,
        Err(TaskLifecycleError::Domain(TaskDomainError::OtpMismatch(_)))
    ));

    // The spent challenge was persisted, so the stale code is dead even
    // though it was never accepted.
    let replayed = harness
        .service
        .verify_completion_otp(created.id(), stale.as_str())
        .await;
    ensure!(matches!(
        replayed,
        Err(TaskLifecycleError::Domain(TaskDomainError::OtpNotRequested(_)))
    ));

    // Requesting a new code recovers the flow.
    harness.service.request_completion_otp(created.id()).await?;
    ensure!(harness.dispatcher.dispatch_count() == 2);
    let fresh = harness
        .dispatcher
        .last_code_for(created.id())
        .ok_or_else(|| eyre::eyre!("no replacement code dispatched"))?;
    let progress = harness
        .service
        .verify_completion_otp(created.id(), fresh.as_str())
        .await?;
    ensure!(matches!(progress, CompletionProgress::Completed(_)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopen_through_the_service_is_admin_only() -> eyre::Result<()> {
    let harness = harness(WorkflowSettings::new().with_auto_approve(true));
    let created = harness.service.assign(request()).await?;
    harness.service.start(created.id()).await?;

    let refused = harness
        .service
        .reopen(created.id(), ActorRole::Assignee, "redo")
        .await;
    ensure!(matches!(
        refused,
        Err(TaskLifecycleError::Domain(TaskDomainError::AdminRequired { .. }))
    ));

    let reopened = harness
        .service
        .reopen(created.id(), ActorRole::Admin, "incomplete paperwork")
        .await?;
    ensure!(reopened.status() == TaskStatus::Reopened);
    ensure!(reopened.reopen_reason() == Some("incomplete paperwork"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_for_lists_only_the_assignees_tasks() -> eyre::Result<()> {
    let harness = harness(WorkflowSettings::new());
    let staff = StaffId::new();
    let other = StaffId::new();
    let due = Utc::now() + Duration::days(3);
    harness
        .service
        .assign(AssignTaskRequest::new("Order laptop", staff, due))
        .await?;
    harness
        .service
        .assign(AssignTaskRequest::new("Book desk", staff, due))
        .await?;
    harness
        .service
        .assign(AssignTaskRequest::new("Badge photo", other, due))
        .await?;

    let tasks = harness.service.tasks_for(staff).await?;

    ensure!(tasks.len() == 2);
    ensure!(tasks.iter().all(|task| task.assigned_to() == staff));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_writer_is_refused_by_the_version_check() -> eyre::Result<()> {
    let harness = harness(WorkflowSettings::new().with_auto_approve(true));
    let created = harness.service.assign(request()).await?;

    // Two writers start from the same version-0 snapshot.
    let snapshot = created.clone();
    harness.repository.update(&created).await?;

    let result = harness.repository.update(&snapshot).await;
    ensure!(matches!(
        result,
        Err(TaskRepositoryError::VersionConflict {
            submitted: 0,
            stored: 1,
            ..
        })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn form_responses_are_accepted_at_most_once_per_template() -> eyre::Result<()> {
    let repository = Arc::new(InMemoryFormResponseRepository::new());
    let service = FormResponseService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let task_id = crate::task::domain::TaskId::new();
    let template_id = TemplateId::new();
    let staff = StaffId::new();
    let mut answers = BTreeMap::new();
    answers.insert("badge_number".to_owned(), "0042".to_owned());

    ensure!(!service.has_response(task_id, template_id).await?);
    service
        .submit_response(task_id, template_id, staff, answers.clone())
        .await?;
    ensure!(service.has_response(task_id, template_id).await?);

    let duplicate = service
        .submit_response(task_id, template_id, staff, answers)
        .await;
    ensure!(matches!(
        duplicate,
        Err(FormResponseError::Repository(
            FormResponseRepositoryError::DuplicateResponse { .. }
        ))
    ));
    Ok(())
}
