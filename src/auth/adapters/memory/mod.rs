//! In-memory adapters for the auth context.

mod navigator;
mod session_store;
mod transport;

pub use navigator::RecordingNavigator;
pub use session_store::InMemorySessionStore;
pub use transport::{InMemoryTransport, RecordedCall};
