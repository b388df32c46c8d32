//! Out-of-band dispatch port for completion passcodes.

use crate::task::domain::{OtpCode, Task};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for passcode dispatch.
pub type OtpDispatchResult<T> = Result<T, OtpDispatchError>;

/// Delivers a freshly issued passcode to the party who must confirm the
/// completion (for example by email). Only the plain code crosses this port;
/// the task retains a digest.
#[async_trait]
pub trait OtpDispatcher: Send + Sync {
    /// Dispatches the code for the given task.
    ///
    /// # Errors
    ///
    /// Returns [`OtpDispatchError::Delivery`] when the channel fails.
    async fn dispatch(&self, task: &Task, code: &OtpCode) -> OtpDispatchResult<()>;
}

/// Errors returned by passcode dispatch implementations.
#[derive(Debug, Clone, Error)]
pub enum OtpDispatchError {
    /// The delivery channel failed.
    #[error("passcode delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl OtpDispatchError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
