//! Optional per-project configuration file (`sdk-tools.yaml`)

use crate::codegen::RewriteRule;
use crate::error::{TaskError, TaskResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Overrides and additions layered on top of the built-in project settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Interpreter used to run every tool (defaults to `python3`)
    #[serde(default)]
    pub python: Option<String>,

    /// Formatter module invoked with `python -m` (defaults to `black`)
    #[serde(default)]
    pub formatter: Option<String>,

    /// Appended to the built-in codegen dependency list
    #[serde(default)]
    pub codegen_dependencies: Vec<String>,

    /// Appended to the built-in validation dependency list
    #[serde(default)]
    pub validate_dependencies: Vec<String>,

    /// Extra rules per profile name (`async`, `legacy`), applied after the built-ins
    #[serde(default)]
    pub extra_rules: BTreeMap<String, Vec<RewriteRule>>,
}

impl ToolsConfig {
    pub fn from_yaml(content: &str, path: &Path) -> TaskResult<Self> {
        serde_yaml::from_str(content).map_err(|source| TaskError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file if it exists; a missing file means no overrides
    pub fn load(path: &Path) -> TaskResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| TaskError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }
}
