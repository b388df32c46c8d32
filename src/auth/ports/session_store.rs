//! Durable key-value port mirroring in-memory session state.

/// String key-value store, the analogue of browser local storage.
///
/// Every mutation of the in-memory session is mirrored here immediately;
/// teardown clears both. Implementations must tolerate concurrent access.
pub trait SessionStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str);

    /// Removes a value if present.
    fn remove(&self, key: &str);
}
