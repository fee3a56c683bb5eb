//! External process execution
//!
//! This module provides:
//! - `CommandLine`, a single external invocation with a human description
//! - The `CommandRunner` seam and `ProcessRunner`, its real implementation
//! - Fail-fast `Pipeline`s of typed steps

pub mod pipeline;
pub mod runner;

pub use pipeline::{Pipeline, Step};
pub use runner::{run_best_effort, CommandLine, CommandRunner, ProcessRunner};
