//! Adapter implementations for the authentication ports.

pub mod http;
pub mod memory;
