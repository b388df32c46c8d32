//! In-memory adapters for the task context.

mod forms;
mod notifier;
mod otp;
mod task;

pub use forms::InMemoryFormResponseRepository;
pub use notifier::RecordingNotifier;
pub use otp::RecordingOtpDispatcher;
pub use task::InMemoryTaskRepository;
