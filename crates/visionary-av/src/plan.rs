//! Remux planning.
//!
//! Turns the best streams of a [`MediaFile`] into output directives for the
//! remux executor. Every directive copies one input stream into its own
//! output file without re-encoding; directives do not depend on each other.

use crate::media_file::MediaFile;
use crate::select::DEFAULT_PREFERRED_LANGUAGE;
use crate::stream::{MediaStream, StreamKind};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What to extract and where to put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOptions {
    /// Emit a directive for the best video stream.
    pub extract_video: bool,
    /// Emit a directive for the best audio stream.
    pub extract_audio: bool,
    /// Output directory; defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
    /// Language written to outputs whose source stream has no language tag.
    pub default_language: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            extract_video: true,
            extract_audio: true,
            output_dir: None,
            default_language: DEFAULT_PREFERRED_LANGUAGE.to_string(),
        }
    }
}

/// How the stream's payload is carried into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecMode {
    /// Stream copy, no re-encoding.
    Copy,
}

impl CodecMode {
    /// The ffmpeg `-c` value.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            CodecMode::Copy => "copy",
        }
    }
}

/// A metadata key/value written onto the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataOverride {
    pub key: String,
    pub value: String,
}

impl MetadataOverride {
    pub fn language(value: impl Into<String>) -> Self {
        Self {
            key: "language".to_string(),
            value: value.into(),
        }
    }
}

/// One input stream copied to one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: StreamKind,
    /// Index of the source stream in the input container.
    pub stream_index: u32,
    pub output: PathBuf,
    pub codec: CodecMode,
    /// Forced output format, for raw elementary streams.
    pub format: Option<String>,
    /// Bitstream filter applied while copying.
    pub bitstream_filter: Option<String>,
    pub metadata: Vec<MetadataOverride>,
}

/// All directives for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemuxPlan {
    pub input: PathBuf,
    /// Existing outputs are replaced. Always true.
    pub overwrite: bool,
    pub directives: Vec<Directive>,
}

impl RemuxPlan {
    /// True when there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Output container details for a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputTarget {
    extension: &'static str,
    format: Option<&'static str>,
    bitstream_filter: Option<&'static str>,
}

impl OutputTarget {
    const fn new(extension: &'static str) -> Self {
        Self {
            extension,
            format: None,
            bitstream_filter: None,
        }
    }

    const fn raw(extension: &'static str, format: &'static str) -> Self {
        Self {
            extension,
            format: Some(format),
            bitstream_filter: None,
        }
    }

    const fn annexb(extension: &'static str, format: &'static str, filter: &'static str) -> Self {
        Self {
            extension,
            format: Some(format),
            bitstream_filter: Some(filter),
        }
    }
}

fn video_target(codec: Option<&str>) -> OutputTarget {
    match codec.map(str::to_ascii_lowercase).as_deref() {
        Some("hevc") => OutputTarget::annexb("hevc", "hevc", "hevc_mp4toannexb"),
        Some("h264") => OutputTarget::annexb("h264", "h264", "h264_mp4toannexb"),
        _ => OutputTarget::new("mkv"),
    }
}

fn audio_target(codec: Option<&str>) -> OutputTarget {
    match codec.map(str::to_ascii_lowercase).as_deref() {
        Some("eac3") => OutputTarget::raw("eac3", "eac3"),
        Some("ac3") => OutputTarget::raw("ac3", "ac3"),
        Some("truehd") => OutputTarget::raw("thd", "truehd"),
        Some("dts") => OutputTarget::raw("dts", "dts"),
        Some("flac") => OutputTarget::raw("flac", "flac"),
        Some("aac") => OutputTarget::new("m4a"),
        _ => OutputTarget::new("mka"),
    }
}

/// Build the remux plan for a media file.
///
/// A missing best stream of a requested kind is not an error: the plan simply
/// has no directive for it.
pub fn plan_remux(media: &MediaFile, options: &PlanOptions) -> RemuxPlan {
    let mut directives = Vec::new();

    if options.extract_video {
        match media.best_video() {
            Some(video) => directives.push(directive(
                media,
                options,
                video,
                video_target(video.codec_name()),
            )),
            None => tracing::info!(
                "Filename: {}. No video stream to extract.",
                media.path().display()
            ),
        }
    }

    if options.extract_audio {
        match media.best_audio() {
            Some(audio) => directives.push(directive(
                media,
                options,
                audio,
                audio_target(audio.codec_name()),
            )),
            None => tracing::info!(
                "Filename: {}. No audio stream to extract.",
                media.path().display()
            ),
        }
    }

    RemuxPlan {
        input: media.path().to_path_buf(),
        overwrite: true,
        directives,
    }
}

fn directive<S: MediaStream>(
    media: &MediaFile,
    options: &PlanOptions,
    stream: &S,
    target: OutputTarget,
) -> Directive {
    let mut metadata = Vec::new();
    if stream.language().is_none() {
        metadata.push(MetadataOverride::language(&options.default_language));
    }

    Directive {
        kind: stream.kind(),
        stream_index: stream.index(),
        output: output_path(media, options, stream.kind(), target.extension),
        codec: CodecMode::Copy,
        format: target.format.map(str::to_string),
        bitstream_filter: target.bitstream_filter.map(str::to_string),
        metadata,
    }
}

fn output_path(
    media: &MediaFile,
    options: &PlanOptions,
    kind: StreamKind,
    extension: &str,
) -> PathBuf {
    let dir = options
        .output_dir
        .clone()
        .or_else(|| media.path().parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let output = dir.join(format!("{}.{}", media.name(), extension));
    if same_location(&output, media.path()) {
        // Never write over the input.
        dir.join(format!("{}.{}.{}", media.name(), kind, extension))
    } else {
        output
    }
}

/// True when both paths name the same file.
///
/// Parent directories are canonicalized when they exist, so a relative input
/// and an absolute output directory for the same place still compare equal.
/// The file itself need not exist.
fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    fn resolved(path: &Path) -> Option<PathBuf> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Some(parent.canonicalize().ok()?.join(path.file_name()?))
    }

    match (resolved(a), resolved(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
