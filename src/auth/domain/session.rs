//! Session and identity types for the authenticated client.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque short-lived bearer token.
///
/// The long-lived refresh token is never held in application memory; it
/// rides a cookie managed by the transport.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for header construction.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    /// Tokens are credentials; debug output elides the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Application role carried on the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access.
    Admin,
    /// HR staff.
    Hr,
    /// Line manager.
    Manager,
    /// Field or office staff.
    Employee,
}

impl UserRole {
    /// Returns the lowercase role name used in storage keys and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "hr",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Application role.
    pub role: UserRole,
}

/// The caller's authentication state.
///
/// A `Session` value existing implies both a token and a user profile are
/// present; absence of authentication is modelled as the absence of the
/// session value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer token.
    pub access_token: AccessToken,
    /// Authenticated user.
    pub user: UserProfile,
}

impl Session {
    /// Creates a session from a token and profile.
    #[must_use]
    pub const fn new(access_token: AccessToken, user: UserProfile) -> Self {
        Self { access_token, user }
    }
}
