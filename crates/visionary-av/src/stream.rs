//! Typed stream representations.
//!
//! Every stream carries a [`StreamBase`] payload; the variant structs add the
//! attributes that only make sense for their kind. [`Stream`] is the sum type
//! produced by the adapter, and [`MediaStream`] gives uniform access to the
//! shared payload for code that works on "any stream" (selection, planning).

use serde::Serialize;

/// The kind of an elementary stream, as named by the probe tool's `codec_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

impl StreamKind {
    /// Map a `codec_type` value to a kind. Other types (data, attachment) are `None`.
    pub fn from_codec_type(codec_type: &str) -> Option<Self> {
        match codec_type {
            "video" => Some(StreamKind::Video),
            "audio" => Some(StreamKind::Audio),
            "subtitle" => Some(StreamKind::Subtitle),
            _ => None,
        }
    }

    /// The `codec_type` spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
        }
    }

    /// Stream specifier letter used in ffmpeg options (`-bsf:v`, `-c:a`).
    pub fn specifier(&self) -> &'static str {
        match self {
            StreamKind::Video => "v",
            StreamKind::Audio => "a",
            StreamKind::Subtitle => "s",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamBase {
    /// Position of the stream within its container.
    pub index: u32,
    /// Byte-count hint used only for ranking (`tags.NUMBER_OF_BYTES`).
    pub size_proxy: u64,
    /// Short codec name (e.g., "hevc", "eac3").
    pub codec_name: Option<String>,
    /// Long codec name.
    pub codec_long_name: Option<String>,
    /// Codec tag as a string (e.g., "[0][0][0][0]").
    pub codec_tag_string: Option<String>,
    /// Codec tag as a hex string (e.g., "0x0000").
    pub codec_tag: Option<String>,
    /// Language tag (e.g., "eng").
    pub language: Option<String>,
}

/// A video stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStream {
    #[serde(flatten)]
    pub base: StreamBase,
    /// Display aspect ratio (e.g., "16:9").
    pub aspect_ratio: Option<String>,
    /// Whether a Dolby Vision configuration record is attached.
    pub is_dolby_vision: bool,
    /// Dolby Vision profile from the configuration record, if reported.
    pub dv_profile: Option<u8>,
}

/// An audio stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioStream {
    #[serde(flatten)]
    pub base: StreamBase,
    /// Sample rate as reported by the probe tool (e.g., "48000").
    pub sample_rate: Option<String>,
    /// Channel count.
    pub channels: Option<u32>,
    /// Codec-based Atmos guess; see [`crate::classify::is_atmos`].
    pub is_atmos: bool,
}

/// A subtitle stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleStream {
    #[serde(flatten)]
    pub base: StreamBase,
}

/// Any stream, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "codec_type", rename_all = "snake_case")]
pub enum Stream {
    Video(VideoStream),
    Audio(AudioStream),
    Subtitle(SubtitleStream),
}

/// Uniform read access to the shared stream payload.
pub trait MediaStream {
    /// The shared payload.
    fn base(&self) -> &StreamBase;

    /// The kind of this stream.
    fn kind(&self) -> StreamKind;

    fn index(&self) -> u32 {
        self.base().index
    }

    fn language(&self) -> Option<&str> {
        self.base().language.as_deref()
    }

    fn size_proxy(&self) -> u64 {
        self.base().size_proxy
    }

    fn codec_name(&self) -> Option<&str> {
        self.base().codec_name.as_deref()
    }
}

impl MediaStream for VideoStream {
    fn base(&self) -> &StreamBase {
        &self.base
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Video
    }
}

impl MediaStream for AudioStream {
    fn base(&self) -> &StreamBase {
        &self.base
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Audio
    }
}

impl MediaStream for SubtitleStream {
    fn base(&self) -> &StreamBase {
        &self.base
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Subtitle
    }
}

impl MediaStream for Stream {
    fn base(&self) -> &StreamBase {
        match self {
            Stream::Video(s) => &s.base,
            Stream::Audio(s) => &s.base,
            Stream::Subtitle(s) => &s.base,
        }
    }

    fn kind(&self) -> StreamKind {
        match self {
            Stream::Video(_) => StreamKind::Video,
            Stream::Audio(_) => StreamKind::Audio,
            Stream::Subtitle(_) => StreamKind::Subtitle,
        }
    }
}
