//! Port contracts for the auth context.

mod navigator;
mod session_store;
mod transport;

pub use navigator::Navigator;
pub use session_store::SessionStore;
pub use transport::{HttpTransport, TransportError, TransportResult};

#[cfg(test)]
pub use navigator::MockNavigator;
