//! The per-file aggregate.
//!
//! A [`MediaFile`] is built in one pass from a path and its probe document:
//! streams are adapted and split by kind, capability subsets are derived,
//! and the best video and audio are selected. The result is immutable; a
//! re-probe builds a new value.

use crate::adapter::adapt_streams;
use crate::probe::RawProbe;
use crate::select::{select_best_with_language, SelectionPolicy};
use crate::stream::{AudioStream, MediaStream, Stream, StreamKind, SubtitleStream, VideoStream};
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use visionary_common::split_file_name;

/// A non-fatal finding made while building a [`MediaFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The file has no stream of this kind.
    NoStreams { kind: StreamKind },
    /// No candidate of this kind had the preferred language; the best
    /// stream was chosen from all candidates.
    NoPreferredLanguage { kind: StreamKind, language: String },
}

/// One probed media file with classified streams and best-of-kind picks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    path: PathBuf,
    name: String,
    extension: String,
    size: Option<u64>,
    stream_count: usize,

    video_streams: Vec<VideoStream>,
    dolby_vision_videos: Vec<VideoStream>,
    best_video: Option<VideoStream>,
    has_video: bool,
    has_dolby_vision: bool,

    audio_streams: Vec<AudioStream>,
    atmos_audios: Vec<AudioStream>,
    best_audio: Option<AudioStream>,
    has_audio: bool,
    has_atmos: bool,

    subtitle_streams: Vec<SubtitleStream>,
    has_subtitles: bool,

    #[serde(skip)]
    diagnostics: Vec<Diagnostic>,
}

impl MediaFile {
    /// Build a media file with the default selection policy (English preferred).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedProbe`] if the document has no `streams` list.
    pub fn from_probe(path: impl Into<PathBuf>, probe: &RawProbe) -> Result<Self> {
        Self::from_probe_with(path, probe, &SelectionPolicy::default())
    }

    /// Build a media file with an explicit selection policy.
    ///
    /// Order: videos are classified, the Dolby Vision subset derived and the
    /// best video picked from that subset (or from all videos when it is
    /// empty); audio follows the same steps with the Atmos subset; subtitles
    /// are only listed.
    pub fn from_probe_with(
        path: impl Into<PathBuf>,
        probe: &RawProbe,
        policy: &SelectionPolicy,
    ) -> Result<Self> {
        let path = path.into();
        let streams = adapt_streams(probe)?;
        let stream_count = streams.len();

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut subtitle_streams = Vec::new();
        for stream in streams {
            match stream {
                Stream::Video(s) => video_streams.push(s),
                Stream::Audio(s) => audio_streams.push(s),
                Stream::Subtitle(s) => subtitle_streams.push(s),
            }
        }

        let mut diagnostics = Vec::new();

        let dolby_vision_videos: Vec<VideoStream> = video_streams
            .iter()
            .filter(|v| v.is_dolby_vision)
            .cloned()
            .collect();
        let best_video = pick_best(
            prefer_subset(&dolby_vision_videos, &video_streams),
            StreamKind::Video,
            policy,
            &mut diagnostics,
        );

        let atmos_audios: Vec<AudioStream> = audio_streams
            .iter()
            .filter(|a| a.is_atmos)
            .cloned()
            .collect();
        let best_audio = pick_best(
            prefer_subset(&atmos_audios, &audio_streams),
            StreamKind::Audio,
            policy,
            &mut diagnostics,
        );

        if subtitle_streams.is_empty() {
            diagnostics.push(Diagnostic::NoStreams {
                kind: StreamKind::Subtitle,
            });
        }

        let (name, extension) = split_file_name(&path);

        Ok(Self {
            path,
            name,
            extension,
            size: probe.format_size(),
            stream_count,
            has_video: !video_streams.is_empty(),
            has_dolby_vision: !dolby_vision_videos.is_empty(),
            video_streams,
            dolby_vision_videos,
            best_video,
            has_audio: !audio_streams.is_empty(),
            has_atmos: !atmos_audios.is_empty(),
            audio_streams,
            atmos_audios,
            best_audio,
            has_subtitles: !subtitle_streams.is_empty(),
            subtitle_streams,
            diagnostics,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without the extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Container size in bytes, when the probe reported it.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Number of video, audio and subtitle streams.
    pub fn stream_count(&self) -> usize {
        self.stream_count
    }

    pub fn video_streams(&self) -> &[VideoStream] {
        &self.video_streams
    }

    pub fn dolby_vision_videos(&self) -> &[VideoStream] {
        &self.dolby_vision_videos
    }

    pub fn best_video(&self) -> Option<&VideoStream> {
        self.best_video.as_ref()
    }

    pub fn has_video(&self) -> bool {
        self.has_video
    }

    pub fn has_dolby_vision(&self) -> bool {
        self.has_dolby_vision
    }

    pub fn audio_streams(&self) -> &[AudioStream] {
        &self.audio_streams
    }

    pub fn atmos_audios(&self) -> &[AudioStream] {
        &self.atmos_audios
    }

    pub fn best_audio(&self) -> Option<&AudioStream> {
        self.best_audio.as_ref()
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    pub fn has_atmos(&self) -> bool {
        self.has_atmos
    }

    pub fn subtitle_streams(&self) -> &[SubtitleStream] {
        &self.subtitle_streams
    }

    pub fn has_subtitles(&self) -> bool {
        self.has_subtitles
    }

    /// Non-fatal findings, in video, audio, subtitle order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn prefer_subset<'a, S>(subset: &'a [S], all: &'a [S]) -> &'a [S] {
    if subset.is_empty() {
        all
    } else {
        subset
    }
}

fn pick_best<S: MediaStream + Clone>(
    candidates: &[S],
    kind: StreamKind,
    policy: &SelectionPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<S> {
    match select_best_with_language(candidates, &policy.preferred_language) {
        Some(selection) => {
            if !selection.language_matched {
                diagnostics.push(Diagnostic::NoPreferredLanguage {
                    kind,
                    language: policy.preferred_language.clone(),
                });
            }
            Some(selection.stream.clone())
        }
        None => {
            diagnostics.push(Diagnostic::NoStreams { kind });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;
    use serde_json::{json, Value};

    fn video(index: u32, dv: bool, language: Option<&str>, bytes: u64) -> Value {
        let mut stream = json!({
            "index": index,
            "codec_type": "video",
            "codec_name": "hevc",
            "codec_long_name": "H.265 / HEVC (High Efficiency Video Coding)",
            "codec_tag_string": "[0][0][0][0]",
            "codec_tag": "0x0000",
            "display_aspect_ratio": "16:9",
            "tags": { "NUMBER_OF_BYTES": bytes.to_string() }
        });
        if let Some(lang) = language {
            stream["tags"]["language"] = json!(lang);
        }
        if dv {
            stream["side_data_list"] =
                json!([{ "side_data_type": "DOVI configuration record", "dv_profile": 8 }]);
        }
        stream
    }

    fn audio(index: u32, codec: &str, language: Option<&str>, bytes: u64) -> Value {
        let mut stream = json!({
            "index": index,
            "codec_type": "audio",
            "codec_name": codec,
            "codec_long_name": codec,
            "codec_tag_string": "[0][0][0][0]",
            "codec_tag": "0x0000",
            "sample_rate": "48000",
            "tags": { "NUMBER_OF_BYTES": bytes.to_string() }
        });
        if let Some(lang) = language {
            stream["tags"]["language"] = json!(lang);
        }
        stream
    }

    fn subtitle(index: u32, language: &str) -> Value {
        json!({
            "index": index,
            "codec_type": "subtitle",
            "codec_name": "subrip",
            "tags": { "language": language }
        })
    }

    fn probe(streams: Vec<Value>) -> RawProbe {
        RawProbe::new(json!({
            "streams": streams,
            "format": { "size": "1073741824" }
        }))
    }

    #[test]
    fn test_dolby_vision_video() {
        let media = MediaFile::from_probe(
            "/movies/Dune.2021.mkv",
            &probe(vec![video(0, true, Some("eng"), 100)]),
        )
        .unwrap();

        assert!(media.has_video());
        assert!(media.has_dolby_vision());
        assert_eq!(media.dolby_vision_videos().len(), 1);
        assert_eq!(media.best_video().unwrap().index(), 0);
        assert_eq!(media.best_video().unwrap().dv_profile, Some(8));
    }

    #[test]
    fn test_atmos_subset() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![
                video(0, false, None, 0),
                audio(1, "eac3", Some("eng"), 100),
                audio(2, "aac", Some("eng"), 200),
            ]),
        )
        .unwrap();

        assert!(media.has_atmos());
        assert_eq!(media.atmos_audios().len(), 1);
        assert_eq!(media.atmos_audios()[0].index(), 1);
        assert_eq!(media.audio_streams().len(), 2);
        // Atmos subset wins even though the aac stream is larger.
        assert_eq!(media.best_audio().unwrap().index(), 1);
    }

    #[test]
    fn test_best_audio_by_size() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![
                audio(1, "aac", Some("eng"), 1000),
                audio(2, "aac", Some("eng"), 5000),
            ]),
        )
        .unwrap();

        assert_eq!(media.best_audio().unwrap().index(), 2);
        assert_eq!(media.best_audio().unwrap().size_proxy(), 5000);
    }

    #[test]
    fn test_no_subtitles() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![video(0, false, Some("eng"), 1), audio(1, "aac", Some("eng"), 1)]),
        )
        .unwrap();

        assert!(!media.has_subtitles());
        assert!(media.subtitle_streams().is_empty());
        assert_eq!(
            media.diagnostics(),
            &[Diagnostic::NoStreams {
                kind: StreamKind::Subtitle
            }]
        );
    }

    #[test]
    fn test_missing_streams_key() {
        let raw = RawProbe::new(json!({ "format": { "size": "10" } }));
        assert_matches!(
            MediaFile::from_probe("/movies/broken.mkv", &raw),
            Err(Error::MalformedProbe(_))
        );
    }

    #[test]
    fn test_empty_file() {
        let media = MediaFile::from_probe("/movies/empty.mkv", &probe(vec![])).unwrap();

        assert!(!media.has_video());
        assert!(!media.has_dolby_vision());
        assert!(!media.has_audio());
        assert!(!media.has_atmos());
        assert!(!media.has_subtitles());
        assert!(media.best_video().is_none());
        assert!(media.best_audio().is_none());
        assert_eq!(media.stream_count(), 0);
        assert_eq!(
            media.diagnostics(),
            &[
                Diagnostic::NoStreams {
                    kind: StreamKind::Video
                },
                Diagnostic::NoStreams {
                    kind: StreamKind::Audio
                },
                Diagnostic::NoStreams {
                    kind: StreamKind::Subtitle
                },
            ]
        );
    }

    #[test]
    fn test_dolby_vision_subset_preferred_over_larger_sdr() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![
                video(0, false, Some("eng"), 90_000),
                video(1, true, Some("eng"), 10),
            ]),
        )
        .unwrap();

        assert_eq!(media.best_video().unwrap().index(), 1);
    }

    #[test]
    fn test_language_applies_within_capability_subset() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![
                audio(1, "eac3", Some("fre"), 9000),
                audio(2, "aac", Some("eng"), 9999),
                audio(3, "eac3", Some("ger"), 100),
            ]),
        )
        .unwrap();

        // No English stream among the Atmos candidates: rank all Atmos
        // candidates, never fall back to the English aac stream.
        assert_eq!(media.best_audio().unwrap().index(), 1);
        assert!(media.diagnostics().contains(&Diagnostic::NoPreferredLanguage {
            kind: StreamKind::Audio,
            language: "eng".to_string(),
        }));
    }

    #[test]
    fn test_custom_policy() {
        let policy = SelectionPolicy {
            preferred_language: "jpn".to_string(),
        };
        let media = MediaFile::from_probe_with(
            "/anime/show.mkv",
            &probe(vec![
                audio(1, "flac", Some("jpn"), 10),
                audio(2, "flac", Some("eng"), 20),
            ]),
            &policy,
        )
        .unwrap();

        assert_eq!(media.best_audio().unwrap().index(), 1);
    }

    #[test]
    fn test_name_extension_and_size() {
        let media = MediaFile::from_probe(
            "/movies/Blade.Runner.2049.mkv",
            &probe(vec![subtitle(0, "eng")]),
        )
        .unwrap();

        assert_eq!(media.path(), Path::new("/movies/Blade.Runner.2049.mkv"));
        assert_eq!(media.name(), "Blade.Runner.2049");
        assert_eq!(media.extension(), "mkv");
        assert_eq!(media.size(), Some(1_073_741_824));
        assert_eq!(media.stream_count(), 1);
        assert!(media.has_subtitles());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let raw = probe(vec![
            video(0, true, Some("eng"), 500),
            video(1, false, None, 900),
            audio(2, "eac3", None, 100),
            audio(3, "truehd", Some("eng"), 800),
            subtitle(4, "eng"),
        ]);

        let first = MediaFile::from_probe("/movies/movie.mkv", &raw).unwrap();
        let second = MediaFile::from_probe("/movies/movie.mkv", &raw).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.diagnostics(), second.diagnostics());
    }

    #[test]
    fn test_serializes_flags() {
        let media = MediaFile::from_probe(
            "/movies/movie.mkv",
            &probe(vec![video(0, true, Some("eng"), 1)]),
        )
        .unwrap();
        let json = serde_json::to_value(&media).unwrap();

        assert_eq!(json["name"], "movie");
        assert_eq!(json["has_dolby_vision"], true);
        assert_eq!(json["has_atmos"], false);
        assert_eq!(json["best_video"]["index"], 0);
        assert!(json.get("diagnostics").is_none());
    }
}
