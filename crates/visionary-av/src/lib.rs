//! # visionary-av
//!
//! Stream classification and selection for probed media files.
//!
//! This crate provides functionality for:
//! - Probing media files with ffprobe and keeping its JSON output
//! - Adapting probe records into typed video, audio and subtitle streams
//! - Flagging Dolby Vision videos and Atmos audio
//! - Picking the best video and audio stream per file
//! - Planning and running stream-copy extraction with ffmpeg
//!
//! ## Example
//!
//! ```no_run
//! use visionary_av::{load_media_file, FfprobeProber};
//!
//! let prober = FfprobeProber::from_path()?;
//! let media = load_media_file(&prober, "/movies/Movie.2020.mkv")?;
//! if let Some(video) = media.best_video() {
//!     println!("best video: stream {} ({:?})", video.base.index, video.base.codec_name);
//! }
//! # Ok::<(), visionary_av::Error>(())
//! ```

mod error;
pub mod adapter;
pub mod classify;
pub mod media_file;
pub mod plan;
pub mod probe;
pub mod remux;
pub mod select;
pub mod stream;
pub mod tools;

// Re-exports
pub use error::{Error, Result};
pub use media_file::{Diagnostic, MediaFile};
pub use plan::{plan_remux, PlanOptions, RemuxPlan};
pub use probe::{FfprobeProber, Prober, RawProbe};
pub use select::{select_best, select_best_with_language, Selection, SelectionPolicy};
pub use stream::{AudioStream, MediaStream, Stream, StreamBase, StreamKind, SubtitleStream, VideoStream};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};

/// Probe a file and build its [`MediaFile`] with the default policy.
pub fn load_media_file<P: AsRef<std::path::Path>>(prober: &dyn Prober, path: P) -> Result<MediaFile> {
    load_media_file_with(prober, path, &SelectionPolicy::default())
}

/// Probe a file and build its [`MediaFile`] with an explicit policy.
pub fn load_media_file_with<P: AsRef<std::path::Path>>(
    prober: &dyn Prober,
    path: P,
    policy: &SelectionPolicy,
) -> Result<MediaFile> {
    let path = path.as_ref();
    let probe = prober.probe(path)?;
    MediaFile::from_probe_with(path, &probe, policy)
}
