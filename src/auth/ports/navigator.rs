//! Navigation port used on terminal authentication failure.

/// View navigation hooks.
///
/// After a failed refresh or a deactivated-account response the client
/// tears the session down and, unless the user is already on an
/// authentication view, schedules a redirect to the login view.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Returns true when the current view is an authentication view.
    fn is_auth_view(&self) -> bool;

    /// Navigates to the login view.
    fn redirect_to_login(&self);
}
