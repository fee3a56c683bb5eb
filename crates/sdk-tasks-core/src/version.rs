//! Package version lookup for release builds

use crate::error::{TaskError, TaskResult};
use semver::Version;
use std::path::Path;

/// Extract the `__version__ = "..."` assignment from a version module
pub fn parse_version_module(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("__version__")?;
        let value = rest.trim_start().strip_prefix('=')?.trim();
        let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let inner = &value[1..];
        inner.find(quote).map(|end| inner[..end].to_string())
    })
}

pub fn read_package_version(path: &Path) -> TaskResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| TaskError::Version {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_version_module(&content).ok_or_else(|| TaskError::Version {
        path: path.to_path_buf(),
        reason: "no __version__ assignment found".to_string(),
    })
}

/// Returns a warning if the version is not valid semver
pub fn check_release_version(version: &str) -> Option<String> {
    let cleaned = version.strip_prefix('v').unwrap_or(version);
    match Version::parse(cleaned) {
        Ok(_) => None,
        Err(e) => Some(format!(
            "Version '{}' is not semver ({}); the package index may order it unexpectedly",
            version, e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_double_quoted() {
        let content = "# see https://pypi.org\n__version__ = \"3.19.0\"\n";
        assert_eq!(parse_version_module(content).as_deref(), Some("3.19.0"));
    }

    #[test]
    fn test_parse_single_quoted_without_spaces() {
        assert_eq!(
            parse_version_module("__version__='1.2.3rc1'").as_deref(),
            Some("1.2.3rc1")
        );
    }

    #[test]
    fn test_parse_missing_assignment() {
        assert!(parse_version_module("VERSION = '1.0.0'\n").is_none());
        assert!(parse_version_module("__version__ = get()\n").is_none());
    }

    #[test]
    fn test_semver_versions_pass() {
        assert!(check_release_version("3.19.0").is_none());
        assert!(check_release_version("v1.0.0").is_none());
    }

    #[test]
    fn test_non_semver_version_warns() {
        let warning = check_release_version("3.19.0rc1").unwrap();
        assert!(warning.contains("3.19.0rc1"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_package_version(Path::new("/nonexistent/version.py")).unwrap_err();
        assert!(matches!(err, TaskError::Version { .. }));
    }
}
