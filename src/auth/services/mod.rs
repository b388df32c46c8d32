//! Orchestration services for the auth context.

mod client;
mod refresh;
mod session;

pub use client::{
    ApiClientError, ApiClientResult, AuthenticatedClient, GENERIC_ERROR_MESSAGE, LoginCredentials,
    Registration,
};
pub use refresh::{RefreshCoordinator, RefreshError, RefreshOutcome, RefreshTicket};
pub use session::SessionHandle;
