//! Project configuration trait for task binaries
//!
//! Each client-library project implements this trait to describe where its
//! canonical client lives, how the client is named, and which tools its
//! operations install and run.

use crate::codegen::{async_profile, banner, legacy_profile, ClientShape, VariantProfile};
use std::path::PathBuf;

/// Configuration trait for different client-library projects
///
/// Each project implements this trait to define:
/// - Project identity (name, display name)
/// - The canonical client and its naming
/// - Packages that are formatted and linted
/// - Dependency lists for codegen and validation
pub trait ProjectConfig: Clone + Send + Sync + 'static {
    /// Internal project name
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Names and location of the canonical client
    fn client_shape(&self) -> ClientShape;

    /// Packages run through the formatter and linter during validation
    fn packages(&self) -> Vec<String>;

    /// Dependencies needed only to regenerate the variants
    fn codegen_dependencies(&self) -> Vec<String>;

    /// Dependencies needed to validate the project
    fn validate_dependencies(&self) -> Vec<String>;

    /// Command shown in the generated-file banner
    fn regenerate_command(&self) -> &'static str;

    /// Environment variable overriding the interpreter
    fn python_env(&self) -> &'static str;

    /// Optional configuration file, relative to the project root
    fn config_file(&self) -> &'static str {
        "sdk-tools.yaml"
    }

    /// File defining `__version__`, relative to the project root
    fn version_file(&self) -> PathBuf {
        PathBuf::from(self.client_shape().package).join("version.py")
    }

    /// Variant recipes, in generation order
    fn profiles(&self) -> Vec<VariantProfile> {
        let shape = self.client_shape();
        let header = banner(&shape.canonical_path, self.regenerate_command());
        vec![
            async_profile(&shape, header.clone()),
            legacy_profile(&shape, header),
        ]
    }
}
