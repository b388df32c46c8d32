//! Port contracts for the task context.

mod forms;
mod notifier;
mod otp;
mod repository;

pub use forms::{FormResponseRepository, FormResponseRepositoryError, FormResponseRepositoryResult};
pub use notifier::{TaskEvent, TaskNotifier};
pub use otp::{OtpDispatchError, OtpDispatchResult, OtpDispatcher};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
