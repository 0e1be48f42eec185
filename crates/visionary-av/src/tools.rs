//! External tool detection and management.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tools the probe and remux steps shell out to.
pub const REQUIRED_TOOLS: &[&str] = &["ffprobe", "ffmpeg"];

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// FFmpeg tools take `-version` rather than `--version`.
///
/// # Example
///
/// ```no_run
/// use visionary_av::check_tool;
///
/// let info = check_tool("ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_at(name, Path::new(name))
}

/// Check a tool at an explicit location.
pub fn check_tool_at(name: &str, program: &Path) -> ToolInfo {
    match Command::new(program).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path: which::which(program).ok(),
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check ffprobe and ffmpeg on `PATH`.
pub fn check_tools() -> Vec<ToolInfo> {
    REQUIRED_TOOLS.iter().map(|name| check_tool(name)).collect()
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {:?} does not exist, searching PATH",
            name,
            path
        );
    }

    require_tool(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_check_tool_not_found() {
        let info = check_tool("nonexistent_tool_12345");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn test_require_tool_not_found() {
        assert_matches!(
            require_tool("nonexistent_tool_12345"),
            Err(Error::ToolNotFound { tool }) if tool == "nonexistent_tool_12345"
        );
    }

    #[test]
    fn test_configured_path_wins() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = get_tool_path("ffmpeg", Some(file.path())).unwrap();
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_check_tools_lists_required() {
        let names: Vec<String> = check_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["ffprobe", "ffmpeg"]);
    }
}
