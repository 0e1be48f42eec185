//! Probe result adapter.
//!
//! Turns the per-stream records of a [`RawProbe`] into typed [`Stream`]
//! values. Each output attribute is looked up by canonical name in
//! [`BASE_FIELDS`] and the table of the stream's kind, and read through the
//! [`FieldAlias`] found there: the record fields it may come from, tried in
//! order. Dotted sources (`tags.language`) address nested mappings. An
//! attribute with no resolvable source is `None`; adaptation never fails on
//! a missing field.

use crate::classify;
use crate::probe::RawProbe;
use crate::stream::{
    AudioStream, Stream, StreamBase, StreamKind, SubtitleStream, VideoStream,
};
use crate::Result;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A canonical attribute and the record fields it is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    /// Canonical attribute name.
    pub field: &'static str,
    /// Source fields in priority order.
    pub sources: &'static [&'static str],
}

impl FieldAlias {
    /// The first source present (and not null) in the record.
    pub fn resolve<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        self.sources
            .iter()
            .find_map(|source| lookup(record, source))
    }

    /// The first resolvable source rendered as a string.
    ///
    /// Numbers and booleans are rendered in their JSON form; mappings and
    /// lists do not count as a value.
    pub fn resolve_string(&self, record: &Map<String, Value>) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| lookup(record, source))
            .find_map(scalar_to_string)
    }
}

pub const CODEC_NAME: FieldAlias = FieldAlias {
    field: "codec_name",
    sources: &["codec_name"],
};

pub const CODEC_LONG_NAME: FieldAlias = FieldAlias {
    field: "codec_long_name",
    sources: &["codec_long_name"],
};

pub const CODEC_TAG_STRING: FieldAlias = FieldAlias {
    field: "codec_tag_string",
    sources: &["codec_tag_string"],
};

pub const CODEC_TAG: FieldAlias = FieldAlias {
    field: "codec_tag",
    sources: &["codec_tag"],
};

pub const LANGUAGE: FieldAlias = FieldAlias {
    field: "language",
    sources: &["language", "tags.language"],
};

pub const ASPECT_RATIO: FieldAlias = FieldAlias {
    field: "aspect_ratio",
    sources: &["aspect_ratio", "display_aspect_ratio"],
};

pub const SAMPLE_RATE: FieldAlias = FieldAlias {
    field: "sample_rate",
    sources: &["sample_rate"],
};

pub const CHANNELS: FieldAlias = FieldAlias {
    field: "channels",
    sources: &["channels"],
};

/// Fields every stream kind resolves into its [`StreamBase`].
pub const BASE_FIELDS: &[FieldAlias] = &[
    CODEC_NAME,
    CODEC_LONG_NAME,
    CODEC_TAG_STRING,
    CODEC_TAG,
    LANGUAGE,
];

/// Fields specific to video streams.
pub const VIDEO_FIELDS: &[FieldAlias] = &[ASPECT_RATIO];

/// Fields specific to audio streams.
pub const AUDIO_FIELDS: &[FieldAlias] = &[SAMPLE_RATE, CHANNELS];

/// Fields specific to subtitle streams.
pub const SUBTITLE_FIELDS: &[FieldAlias] = &[];

/// The alias table of a stream kind, base fields excluded.
pub fn fields_for(kind: StreamKind) -> &'static [FieldAlias] {
    match kind {
        StreamKind::Video => VIDEO_FIELDS,
        StreamKind::Audio => AUDIO_FIELDS,
        StreamKind::Subtitle => SUBTITLE_FIELDS,
    }
}

/// The alias for a canonical attribute, searched in the base table and then
/// in the table of `kind`.
pub fn alias_for(kind: StreamKind, field: &str) -> Option<&'static FieldAlias> {
    find_alias(&[BASE_FIELDS, fields_for(kind)], field)
}

fn find_alias<'t>(tables: &[&'t [FieldAlias]], field: &str) -> Option<&'t FieldAlias> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|alias| alias.field == field)
}

/// Resolve a base attribute, one every stream kind shares, as a string.
pub fn resolve_base_string(record: &Map<String, Value>, field: &str) -> Option<String> {
    find_alias(&[BASE_FIELDS], field)?.resolve_string(record)
}

/// Resolve a canonical attribute of a `kind` record through its alias table.
pub fn resolve_field<'a>(
    kind: StreamKind,
    record: &'a Map<String, Value>,
    field: &str,
) -> Option<&'a Value> {
    alias_for(kind, field)?.resolve(record)
}

/// Resolve a canonical attribute of a `kind` record as a string.
pub fn resolve_field_string(
    kind: StreamKind,
    record: &Map<String, Value>,
    field: &str,
) -> Option<String> {
    alias_for(kind, field)?.resolve_string(record)
}

/// Look up a possibly dotted field path. Null counts as absent.
pub(crate) fn lookup<'a>(record: &'a Map<String, Value>, source: &str) -> Option<&'a Value> {
    let mut parts = source.split('.');
    let mut value = record.get(parts.next()?)?;
    for part in parts {
        value = value.as_object()?.get(part)?;
    }
    (!value.is_null()).then_some(value)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn explicit_index(record: &Value) -> Option<u32> {
    record
        .get("index")
        .and_then(Value::as_u64)
        .and_then(|i| u32::try_from(i).ok())
}

/// Adapt one per-stream record.
///
/// `fallback_index` is used when the record carries no `index` of its own.
/// Returns `None` for records that are not mappings or whose `codec_type` is
/// not video, audio or subtitle.
pub fn adapt_stream(fallback_index: u32, record: &Value) -> Option<Stream> {
    let index = explicit_index(record).unwrap_or(fallback_index);
    let record = record.as_object()?;
    let kind = record
        .get("codec_type")
        .and_then(Value::as_str)
        .and_then(StreamKind::from_codec_type)?;

    let base = adapt_base(kind, index, record);

    let stream = match kind {
        StreamKind::Video => Stream::Video(VideoStream {
            aspect_ratio: resolve_field_string(kind, record, "aspect_ratio"),
            is_dolby_vision: classify::is_dolby_vision(record),
            dv_profile: classify::dv_profile(record),
            base,
        }),
        StreamKind::Audio => Stream::Audio(AudioStream {
            sample_rate: resolve_field_string(kind, record, "sample_rate"),
            channels: resolve_field(kind, record, "channels")
                .and_then(Value::as_u64)
                .and_then(|c| u32::try_from(c).ok()),
            is_atmos: base.codec_name.as_deref().is_some_and(classify::is_atmos),
            base,
        }),
        StreamKind::Subtitle => Stream::Subtitle(SubtitleStream { base }),
    };

    Some(stream)
}

/// Adapt every stream record of a probe document, in probe order.
///
/// A record without an `index` gets its list position, or the next number
/// after it that no other record claims, so indices stay unique per file.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedProbe`] if the document has no `streams` list.
pub fn adapt_streams(probe: &RawProbe) -> Result<Vec<Stream>> {
    let records = probe.streams()?;
    let mut taken: HashSet<u32> = records.iter().filter_map(explicit_index).collect();

    let mut streams = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let fallback = match explicit_index(record) {
            Some(index) => index,
            None => {
                let mut candidate = u32::try_from(position).unwrap_or(u32::MAX);
                while taken.contains(&candidate) && candidate < u32::MAX {
                    candidate += 1;
                }
                taken.insert(candidate);
                candidate
            }
        };
        if let Some(stream) = adapt_stream(fallback, record) {
            streams.push(stream);
        }
    }

    Ok(streams)
}

fn adapt_base(kind: StreamKind, index: u32, record: &Map<String, Value>) -> StreamBase {
    StreamBase {
        index,
        size_proxy: classify::size_proxy(record),
        codec_name: resolve_field_string(kind, record, "codec_name"),
        codec_long_name: resolve_field_string(kind, record, "codec_long_name"),
        codec_tag_string: resolve_field_string(kind, record, "codec_tag_string"),
        codec_tag: resolve_field_string(kind, record, "codec_tag"),
        language: classify::language(record),
    }
}
