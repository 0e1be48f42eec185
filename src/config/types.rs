use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use visionary_av::select::DEFAULT_PREFERRED_LANGUAGE;
use visionary_av::{PlanOptions, SelectionPolicy};
use visionary_common::paths::DEFAULT_MEDIA_EXTENSIONS;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub remux: RemuxConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory scanned when no root is given on the command line
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Extensions of files considered media (case-insensitive, default: mkv)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_MEDIA_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionConfig {
    /// Language tag preferred when picking the best stream (default: "eng")
    #[serde(default = "default_language")]
    pub preferred_language: String,
}

fn default_language() -> String {
    DEFAULT_PREFERRED_LANGUAGE.to_string()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            preferred_language: default_language(),
        }
    }
}

impl SelectionConfig {
    pub fn to_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            preferred_language: self.preferred_language.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemuxConfig {
    /// Where extracted streams are written (default: next to the input)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub extract_video: bool,

    #[serde(default = "default_true")]
    pub extract_audio: bool,

    /// Language written to outputs whose source stream is untagged
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_true() -> bool {
    true
}

impl Default for RemuxConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            extract_video: true,
            extract_audio: true,
            default_language: default_language(),
        }
    }
}

impl RemuxConfig {
    pub fn to_plan_options(&self) -> PlanOptions {
        PlanOptions {
            extract_video: self.extract_video,
            extract_audio: self.extract_audio,
            output_dir: self.output_dir.clone(),
            default_language: self.default_language.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Probe files on a thread pool
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
