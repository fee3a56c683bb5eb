//! SDK Tasks Core - Shared library for client-library build tasks
//!
//! This library provides the build operations of a client-library project and
//! the code generator that derives its async and legacy clients from one
//! canonical client. It is designed to be used by task binaries that share the
//! same logic but describe different projects through [`ProjectConfig`].
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Code generation** - Declaration tree, rewrite rules, variant profiles
//! - **Layer 2: Process execution** - `CommandRunner` seam and fail-fast `Pipeline`s
//! - **Layer 3: Operations** - Declarative table of named operations
//!
//! # Example Usage
//!
//! ```ignore
//! use sdk_tasks_core::{commands::{Invocation, Operation}, ProjectConfig};
//!
//! let invocation = Invocation::new(Operation::UnitTests).with_test_target("web");
//! sdk_tasks_core::run(&MyProject, &invocation, PathBuf::from(".")).await?;
//! ```

pub mod codegen;
pub mod commands;
pub mod config;
pub mod error;
pub mod process;
pub mod project;
pub mod version;

#[cfg(test)]
extern crate self as sdk_tasks_core;

#[cfg(test)]
pub(crate) mod test_utils;

use std::path::PathBuf;

// Re-export main types for convenience
pub use codegen::{RewriteRule, RuleEngine, VariantOrchestrator, VariantProfile};
pub use commands::{Invocation, Operation, OPERATIONS};
pub use config::{TaskSettings, ToolsConfig};
pub use error::{TaskError, TaskResult};
pub use process::{CommandLine, CommandRunner, Pipeline, ProcessRunner};
pub use project::ProjectConfig;

/// Resolve settings under `root` and run one operation to completion
pub async fn run<C: ProjectConfig>(
    config: &C,
    invocation: &Invocation,
    root: PathBuf,
) -> TaskResult<()> {
    let settings = TaskSettings::load(config, root)?;
    tracing::info!(
        project = config.name(),
        operation = %invocation.operation,
        root = %settings.root.display(),
        "starting"
    );
    let pipeline = commands::dispatch(&settings, invocation)?;
    let runner = ProcessRunner::new(settings.root.clone());
    pipeline.run(&runner).await
}
