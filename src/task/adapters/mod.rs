//! Adapter implementations for the task ports.

pub mod memory;
pub mod rest;
