//! Best-stream selection.
//!
//! Among same-kind candidates, prefer streams in the preferred language and,
//! within those, the one with the largest size hint. Callers that want a
//! capability filter (Dolby Vision videos, Atmos audios) apply it first and
//! pass the filtered slice.

use crate::stream::MediaStream;
use serde::Serialize;

/// Language preferred when nothing else is configured.
pub const DEFAULT_PREFERRED_LANGUAGE: &str = "eng";

/// Parameters of the selection heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionPolicy {
    /// Language tag matched exactly (case-sensitive).
    pub preferred_language: String,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_string(),
        }
    }
}

/// The outcome of a selection.
#[derive(Debug, PartialEq, Eq)]
pub struct Selection<'a, S> {
    /// The chosen stream, always a member of the input.
    pub stream: &'a S,
    /// False when no candidate had the preferred language and the whole
    /// input was ranked instead.
    pub language_matched: bool,
}

/// Select the best stream, preferring English.
pub fn select_best<S: MediaStream>(streams: &[S]) -> Option<Selection<'_, S>> {
    select_best_with_language(streams, DEFAULT_PREFERRED_LANGUAGE)
}

/// Select the best stream with an explicit preferred language.
///
/// 1. Keep the streams whose language equals `language`; if none do, keep all.
/// 2. Stable-sort the kept streams ascending by `size_proxy`.
/// 3. Take the last one: the largest hint, and among equal maxima the one
///    that came last in input order.
///
/// Returns `None` only for an empty input.
pub fn select_best_with_language<'a, S: MediaStream>(
    streams: &'a [S],
    language: &str,
) -> Option<Selection<'a, S>> {
    let preferred: Vec<&S> = streams
        .iter()
        .filter(|s| s.language() == Some(language))
        .collect();

    let language_matched = !preferred.is_empty();
    let mut candidates = if language_matched {
        preferred
    } else {
        streams.iter().collect()
    };

    candidates.sort_by_key(|s| s.size_proxy());

    candidates.last().map(|&stream| Selection {
        stream,
        language_matched,
    })
}
