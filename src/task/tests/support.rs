//! Shared helpers for task unit tests.

use crate::task::domain::{StaffId, Task, TaskDomainError, WorkflowSettings};
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;

/// Clock pinned to a fixed instant, advanceable by rebinding.
pub(crate) struct FrozenClock(pub(crate) DateTime<Utc>);

impl FrozenClock {
    pub(crate) fn at_epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    pub(crate) fn advanced(&self, by: Duration) -> Self {
        Self(self.0 + by)
    }
}

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Assigns a task due one week from the clock's current instant.
pub(crate) fn assigned_task(
    settings: &WorkflowSettings,
    clock: &impl Clock,
) -> Result<Task, TaskDomainError> {
    Task::assign(
        "Prepare onboarding pack",
        StaffId::new(),
        clock.utc() + Duration::days(7),
        settings,
        clock,
    )
}

/// Assigns an auto-approved task and starts work on it.
pub(crate) fn in_progress_task(
    settings: &WorkflowSettings,
    clock: &impl Clock,
) -> Result<Task, TaskDomainError> {
    let auto = settings.with_auto_approve(true);
    let mut task = assigned_task(&auto, clock)?;
    task.start(&auto, clock)?;
    Ok(task)
}
