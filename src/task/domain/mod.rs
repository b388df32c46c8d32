//! Domain model for the task lifecycle.
//!
//! The task domain models assignment, the two approval gates, pause/resume,
//! OTP-gated completion, and admin reopening while keeping all transport and
//! persistence concerns outside the domain boundary.

mod error;
mod form;
mod ids;
pub(crate) mod otp;
mod settings;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use form::{FormField, FormResponse, FormTemplate};
pub use ids::{StaffId, TaskId, TemplateId};
pub use otp::{OtpChallenge, OtpCode};
pub use settings::WorkflowSettings;
pub use status::{ActorRole, TaskAction, TaskStatus};
pub use task::{CompletionOutcome, Task};
