//! Unit tests for task domain types and their wire representation.

use super::support::{FrozenClock, assigned_task, in_progress_task};
use crate::task::domain::{
    FormResponse, StaffId, Task, TaskDomainError, TaskId, TaskStatus, TemplateId,
    WorkflowSettings,
};
use chrono::Duration;
use eyre::ensure;
use rstest::{fixture, rstest};
use std::collections::BTreeMap;

#[fixture]
fn clock() -> FrozenClock {
    FrozenClock::at_epoch()
}

#[rstest]
fn assignment_without_auto_approve_waits_at_the_initial_gate(
    clock: FrozenClock,
) -> eyre::Result<()> {
    let task = assigned_task(&WorkflowSettings::new(), &clock)?;

    ensure!(task.status() == TaskStatus::PendingApproval);
    ensure!(!task.pending_completion());
    ensure!(task.reopen_reason().is_none());
    ensure!(task.version() == 0);
    Ok(())
}

#[rstest]
fn assignment_with_auto_approve_skips_the_initial_gate(clock: FrozenClock) -> eyre::Result<()> {
    let settings = WorkflowSettings::new().with_auto_approve(true);
    let task = assigned_task(&settings, &clock)?;

    ensure!(task.status() == TaskStatus::NotYetStarted);
    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
fn assignment_rejects_blank_titles(#[case] title: &str, clock: FrozenClock) {
    let result = Task::assign(
        title,
        StaffId::new(),
        clock.0 + Duration::days(7),
        &WorkflowSettings::new(),
        &clock,
    );

    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
#[case(TaskStatus::NotYetStarted, "Not yet Started")]
#[case(TaskStatus::PendingApproval, "Pending")]
#[case(TaskStatus::InProgress, "In progress")]
#[case(TaskStatus::Delayed, "Delayed Tasks")]
#[case(TaskStatus::Completed, "Completed Tasks")]
#[case(TaskStatus::Reopened, "Reopened")]
#[case(TaskStatus::Rejected, "Rejected")]
#[case(TaskStatus::Hold, "Hold")]
fn status_round_trips_through_its_wire_name(
    #[case] status: TaskStatus,
    #[case] wire: &str,
) -> eyre::Result<()> {
    ensure!(status.as_str() == wire);
    ensure!(TaskStatus::try_from(wire)? == status);
    let json = serde_json::to_string(&status)?;
    ensure!(json == format!("\"{wire}\""));
    Ok(())
}

#[rstest]
fn unknown_status_names_fail_to_parse() {
    let result = TaskStatus::try_from("Archived");

    assert!(result.is_err());
}

#[rstest]
fn display_status_reports_in_progress_before_the_due_date(clock: FrozenClock) -> eyre::Result<()> {
    let task = in_progress_task(&WorkflowSettings::new(), &clock)?;

    ensure!(task.display_status(&clock) == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
fn display_status_reports_delayed_past_the_due_date(clock: FrozenClock) -> eyre::Result<()> {
    let task = in_progress_task(&WorkflowSettings::new(), &clock)?;
    let overdue = clock.advanced(Duration::days(8));

    ensure!(task.status() == TaskStatus::InProgress);
    ensure!(task.display_status(&overdue) == TaskStatus::Delayed);
    Ok(())
}

#[rstest]
fn display_status_reports_completed_while_sign_off_is_pending(
    clock: FrozenClock,
) -> eyre::Result<()> {
    let settings = WorkflowSettings::new().with_completion_approval(true);
    let mut task = in_progress_task(&settings, &clock)?;
    task.complete(&settings, &clock)?;

    ensure!(task.status() == TaskStatus::PendingApproval);
    ensure!(task.pending_completion());
    ensure!(task.display_status(&clock) == TaskStatus::Completed);
    Ok(())
}

#[rstest]
fn task_serialises_with_camel_case_fields_and_wire_status(clock: FrozenClock) -> eyre::Result<()> {
    let task = assigned_task(&WorkflowSettings::new(), &clock)?;

    let value = serde_json::to_value(&task)?;
    ensure!(value.get("status") == Some(&serde_json::json!("Pending")));
    ensure!(value.get("pendingCompletion") == Some(&serde_json::json!(false)));
    ensure!(value.get("assignedTo").is_some());
    ensure!(value.get("expectedCompletionDate").is_some());
    // Absent optionals are omitted entirely, not serialised as null.
    ensure!(value.get("reopenReason").is_none());
    ensure!(value.get("otp").is_none());
    Ok(())
}

#[rstest]
fn task_deserialises_without_a_version_stamp(clock: FrozenClock) -> eyre::Result<()> {
    let task = assigned_task(&WorkflowSettings::new(), &clock)?;
    let mut value = serde_json::to_value(&task)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("version");
    }

    let decoded: Task = serde_json::from_value(value)?;
    ensure!(decoded.version() == 0);
    ensure!(decoded.status() == task.status());
    Ok(())
}

#[rstest]
fn form_response_records_submission_time(clock: FrozenClock) -> eyre::Result<()> {
    let mut answers = BTreeMap::new();
    answers.insert("laptop_serial".to_owned(), "XK-4411".to_owned());

    let response = FormResponse::new(
        TaskId::new(),
        TemplateId::new(),
        StaffId::new(),
        answers,
        &clock,
    );

    ensure!(response.submitted_at == clock.0);
    ensure!(response.answers.len() == 1);
    Ok(())
}
