//! The screening engine: configuration, pipeline tasks, failure accounting,
//! and progress reporting.
//!
//! Tasks are deliberately small and composable; the `workflows` layer wires
//! them into the per-protein pipeline. Nothing in here touches global state,
//! so every task can run against a synthetic workspace in tests.

pub mod config;
pub mod error;
pub mod progress;
pub mod report;
pub mod tasks;
