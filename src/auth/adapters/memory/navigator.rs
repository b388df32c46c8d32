//! Recording navigator for tests and embedding.

use crate::auth::ports::Navigator;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Navigator that records redirects instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    on_auth_view: AtomicBool,
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    /// Creates a navigator positioned on a non-auth view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a navigator already positioned on an auth view.
    #[must_use]
    pub fn on_auth_view() -> Self {
        Self {
            on_auth_view: AtomicBool::new(true),
            redirects: AtomicUsize::new(0),
        }
    }

    /// Returns how many login redirects were requested.
    #[must_use]
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn is_auth_view(&self) -> bool {
        self.on_auth_view.load(Ordering::SeqCst)
    }

    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        self.on_auth_view.store(true, Ordering::SeqCst);
    }
}
