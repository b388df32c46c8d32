//! One-time passcode challenge attached to a task completion.

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// How long an issued passcode remains valid.
const CODE_VALIDITY_MINUTES: i64 = 10;

/// Number of characters in a generated passcode.
const CODE_LENGTH: usize = 6;

/// A plain passcode as dispatched to the confirming party.
///
/// Only the digest is retained on the task; the plain code exists solely to
/// be delivered out-of-band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Returns the passcode characters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reason a passcode submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OtpRejection {
    /// The code's validity window has elapsed.
    Expired,
    /// The submitted code did not match the issued one.
    Mismatch,
    /// The challenge was already consumed by an earlier submission.
    Spent,
}

/// Pending passcode challenge state stored on a task.
///
/// A challenge is single-use: a rejected submission spends it, so a fresh
/// code must be generated before the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpChallenge {
    code_digest: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    spent: bool,
}

impl OtpChallenge {
    /// Issues a fresh challenge, returning it alongside the plain code to
    /// dispatch.
    #[must_use]
    pub fn issue(clock: &impl Clock) -> (Self, OtpCode) {
        let code = generate_code();
        let issued_at = clock.utc();
        let challenge = Self {
            code_digest: digest(&code),
            issued_at,
            expires_at: issued_at + Duration::minutes(CODE_VALIDITY_MINUTES),
            spent: false,
        };
        (challenge, OtpCode(code))
    }

    /// Returns when the challenge was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns when the code stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true once the challenge has been consumed by a submission.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }

    /// Returns true when the validity window has elapsed.
    #[must_use]
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        clock.utc() >= self.expires_at
    }

    /// Consumes the challenge against a submitted code.
    ///
    /// Both outcomes spend the challenge; only the success path finalises
    /// the completion transition.
    pub(crate) fn submit(&mut self, code: &str, clock: &impl Clock) -> Result<(), OtpRejection> {
        if self.spent {
            return Err(OtpRejection::Spent);
        }
        self.spent = true;
        if self.is_expired(clock) {
            return Err(OtpRejection::Expired);
        }
        if digest(code.trim()) != self.code_digest {
            return Err(OtpRejection::Mismatch);
        }
        Ok(())
    }
}

/// Hashes a code for at-rest storage on the task.
fn digest(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Generates a short uppercase code from fresh UUID entropy.
fn generate_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(CODE_LENGTH)
        .collect::<String>()
        .to_ascii_uppercase()
}
