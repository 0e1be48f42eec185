//! FFprobe-based media probing.

use super::{Prober, RawProbe};
use crate::tools::require_tool;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Create a prober that finds ffprobe on `PATH`.
    pub fn from_path() -> Result<Self> {
        Ok(Self::new(require_tool("ffprobe")?))
    }

    /// Path to the ffprobe executable.
    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn probe(&self, path: &Path) -> Result<RawProbe> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        tracing::debug!("Probing {:?} with {:?}", path, self.ffprobe_path);

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| Error::from_spawn("ffprobe", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("exited with status {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::tool_failed("ffprobe", message));
        }

        let json_str = String::from_utf8(output.stdout)
            .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

        RawProbe::from_json(&json_str)
    }
}
