//! Task lifecycle management for CrewDesk.
//!
//! Tasks move through an approval-gated state machine: newly assigned work
//! waits for admin approval unless auto-approval is enabled, completion can
//! require a second admin sign-off, and an optional one-time code must be
//! verified before an assignee may finish a task. The authoritative status
//! never lies about an unapproved completion; a pending completion is a
//! presentation overlay on `PendingApproval`. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
