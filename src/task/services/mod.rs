//! Orchestration services for the task context.

mod forms;
mod lifecycle;

pub use forms::{FormResponseError, FormResponseResult, FormResponseService};
pub use lifecycle::{
    AssignTaskRequest, CompletionProgress, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
