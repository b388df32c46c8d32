//! Unit tests for the task context.

mod domain_tests;
mod rest_tests;
mod service_tests;
mod support;
