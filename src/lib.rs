//! CrewDesk: HR task and session management core.
//!
//! This crate provides the client-side core of the CrewDesk HR platform:
//! an authenticated API client with transparent, single-flight token
//! refresh, and an approval-gated task lifecycle with optional one-time
//! code verification on completion.
//!
//! # Architecture
//!
//! CrewDesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, in-memory)
//!
//! # Modules
//!
//! - [`auth`]: Sessions, bearer authentication, and expiry recovery
//! - [`task`]: Task assignment, approvals, and lifecycle tracking

pub mod auth;
pub mod task;
