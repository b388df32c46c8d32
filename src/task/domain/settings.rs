//! Workflow settings that parameterise task transition guards.

use serde::{Deserialize, Serialize};

/// Organisation-level workflow switches.
///
/// Guards are pure functions of `(task, settings, actor)`; these three
/// booleans are the only configurable inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// Newly assigned and reopened tasks skip the initial approval gate.
    pub auto_approve: bool,
    /// Completions require administrative sign-off before becoming final.
    pub require_approval_on_complete: bool,
    /// Completions must pass one-time passcode verification.
    pub enable_otp_verification: bool,
}

impl WorkflowSettings {
    /// Creates settings with every gate disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            auto_approve: false,
            require_approval_on_complete: false,
            enable_otp_verification: false,
        }
    }

    /// Enables or disables auto-approval of new and reopened tasks.
    #[must_use]
    pub const fn with_auto_approve(mut self, enabled: bool) -> Self {
        self.auto_approve = enabled;
        self
    }

    /// Enables or disables the completion sign-off gate.
    #[must_use]
    pub const fn with_completion_approval(mut self, enabled: bool) -> Self {
        self.require_approval_on_complete = enabled;
        self
    }

    /// Enables or disables one-time passcode verification on completion.
    #[must_use]
    pub const fn with_otp_verification(mut self, enabled: bool) -> Self {
        self.enable_otp_verification = enabled;
        self
    }
}
