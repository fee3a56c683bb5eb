//! Configuration layers
//!
//! Built-in project settings come from a `ProjectConfig` implementation.
//! An optional `sdk-tools.yaml` at the project root adds to them, and an
//! environment variable can override the interpreter.

pub mod file;
pub mod settings;

pub use file::ToolsConfig;
pub use settings::TaskSettings;
