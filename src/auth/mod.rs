//! Authenticated API access for CrewDesk.
//!
//! This module owns the session lifecycle: logging in, mirroring the session
//! to durable storage, attaching bearer tokens to outgoing requests, and
//! recovering transparently from access-token expiry. When a request comes
//! back `401`, a single refresh is performed no matter how many requests hit
//! the expiry at once; followers wait for the leader's outcome and then
//! retry exactly once. The module follows hexagonal architecture:
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
