//! Single-flight coordinator for token refresh.

use crate::auth::domain::AccessToken;
use crate::auth::ports::TransportError;
use thiserror::Error;
use tokio::sync::{Mutex, oneshot};

/// Errors produced by a refresh cycle.
///
/// All variants are treated identically by the client: session teardown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// The refresh request never completed.
    #[error("token refresh transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The refresh endpoint answered with a non-success status.
    #[error("token refresh rejected with status {0}")]
    Rejected(u16),

    /// The refresh response did not contain a new access token.
    #[error("token refresh response did not contain an access token")]
    MalformedPayload,

    /// The leading refresh was dropped before producing an outcome.
    #[error("token refresh was interrupted")]
    Interrupted,
}

/// Outcome shared between the refresh leader and its followers.
pub type RefreshOutcome = Result<AccessToken, RefreshError>;

/// Ticket handed to a caller that needs a refreshed token.
#[derive(Debug)]
pub enum RefreshTicket {
    /// This caller must perform the refresh and publish the outcome via
    /// [`RefreshCoordinator::complete`].
    Leader,
    /// A refresh is already in flight; await its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Explicit single-flight refresh state.
///
/// At most one refresh is in flight process-wide; every 401 arriving during
/// that window parks as a pending waiter and is resolved exactly once by the
/// leader's outcome.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    phase: Mutex<Phase>,
}

impl RefreshCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elects a leader or parks the caller behind the in-flight refresh.
    pub async fn join(&self) -> RefreshTicket {
        let mut phase = self.phase.lock().await;
        match &mut *phase {
            Phase::Idle => {
                *phase = Phase::Refreshing(Vec::new());
                RefreshTicket::Leader
            }
            Phase::Refreshing(waiters) => {
                let (sender, receiver) = oneshot::channel();
                waiters.push(sender);
                RefreshTicket::Follower(receiver)
            }
        }
    }

    /// Publishes the leader's outcome, draining every parked waiter exactly
    /// once, and returns the coordinator to idle.
    pub async fn complete(&self, outcome: RefreshOutcome) {
        let mut phase = self.phase.lock().await;
        if let Phase::Refreshing(waiters) = std::mem::take(&mut *phase) {
            for waiter in waiters {
                if waiter.send(outcome.clone()).is_err() {
                    tracing::debug!("refresh waiter dropped before the outcome arrived");
                }
            }
        }
    }
}
