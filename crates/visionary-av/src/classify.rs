//! Stream classification.
//!
//! Semantic flags derived from a raw stream record: Dolby Vision presence,
//! the Atmos guess, language and the ranking size hint.

use crate::adapter::{lookup, resolve_base_string};
use serde_json::{Map, Value};

/// `side_data_type` of the record ffprobe attaches to Dolby Vision streams.
pub const DOVI_SIDE_DATA_TYPE: &str = "DOVI configuration record";

/// Codec name treated as carrying Atmos.
pub const ATMOS_CODEC: &str = "eac3";

/// Tag holding the muxer's byte count for the stream.
pub const SIZE_PROXY_TAG: &str = "tags.NUMBER_OF_BYTES";

fn side_data(record: &Map<String, Value>) -> impl Iterator<Item = &Map<String, Value>> {
    record
        .get("side_data_list")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// True iff some side-data entry is a Dolby Vision configuration record.
///
/// A missing `side_data_list` simply means no Dolby Vision.
pub fn is_dolby_vision(record: &Map<String, Value>) -> bool {
    side_data(record).any(|sd| {
        sd.get("side_data_type").and_then(Value::as_str) == Some(DOVI_SIDE_DATA_TYPE)
    })
}

/// The first `dv_profile` value found in the side data.
pub fn dv_profile(record: &Map<String, Value>) -> Option<u8> {
    side_data(record)
        .filter_map(|sd| sd.get("dv_profile"))
        .find_map(|profile| match profile {
            Value::Number(n) => n.as_u64().and_then(|p| u8::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

/// Atmos guess: the codec is E-AC-3.
///
/// This only looks at the codec name. E-AC-3 often carries Atmos (JOC) but
/// not always, and TrueHD Atmos is not detected.
pub fn is_atmos(codec_name: &str) -> bool {
    codec_name.eq_ignore_ascii_case(ATMOS_CODEC)
}

/// The stream's language tag, verbatim.
pub fn language(record: &Map<String, Value>) -> Option<String> {
    resolve_base_string(record, "language")
}

/// Ranking size hint from `tags.NUMBER_OF_BYTES`, 0 when absent or unparsable.
pub fn size_proxy(record: &Map<String, Value>) -> u64 {
    match lookup(record, SIZE_PROXY_TAG) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_dolby_vision_detected() {
        let record = object(json!({
            "side_data_list": [
                { "side_data_type": "Mastering display metadata" },
                { "side_data_type": "DOVI configuration record", "dv_profile": 7 }
            ]
        }));
        assert!(is_dolby_vision(&record));
        assert_eq!(dv_profile(&record), Some(7));
    }

    #[test]
    fn test_dolby_vision_exact_match_only() {
        let record = object(json!({
            "side_data_list": [{ "side_data_type": "dovi configuration record" }]
        }));
        assert!(!is_dolby_vision(&record));
    }

    #[test]
    fn test_no_side_data_is_not_dolby_vision() {
        let record = object(json!({ "codec_name": "hevc" }));
        assert!(!is_dolby_vision(&record));
        assert_eq!(dv_profile(&record), None);

        let record = object(json!({ "side_data_list": [] }));
        assert!(!is_dolby_vision(&record));
    }

    #[test]
    fn test_dv_profile_as_string() {
        let record = object(json!({
            "side_data_list": [{ "side_data_type": "DOVI configuration record", "dv_profile": "5" }]
        }));
        assert_eq!(dv_profile(&record), Some(5));
    }

    #[test]
    fn test_atmos_is_eac3_case_insensitive() {
        assert!(is_atmos("eac3"));
        assert!(is_atmos("EAC3"));
        assert!(is_atmos("EaC3"));
    }

    #[test]
    fn test_atmos_heuristic_ignores_other_codecs() {
        // TrueHD can carry Atmos too, but the heuristic only looks for E-AC-3.
        assert!(!is_atmos("truehd"));
        assert!(!is_atmos("ac3"));
        assert!(!is_atmos("aac"));
        assert!(!is_atmos("e-ac-3"));
    }

    #[test]
    fn test_language_is_verbatim() {
        let record = object(json!({ "tags": { "language": "ENG" } }));
        assert_eq!(language(&record).as_deref(), Some("ENG"));

        let record = object(json!({ "tags": {} }));
        assert_eq!(language(&record), None);
    }

    #[test]
    fn test_size_proxy() {
        let record = object(json!({ "tags": { "NUMBER_OF_BYTES": "5000" } }));
        assert_eq!(size_proxy(&record), 5000);

        let record = object(json!({ "tags": { "NUMBER_OF_BYTES": 1000 } }));
        assert_eq!(size_proxy(&record), 1000);

        let record = object(json!({ "tags": { "NUMBER_OF_BYTES": "lots" } }));
        assert_eq!(size_proxy(&record), 0);

        let record = object(json!({ "tags": { "NUMBER_OF_BYTES": "-5" } }));
        assert_eq!(size_proxy(&record), 0);

        let record = object(json!({ "tags": { "language": "eng" } }));
        assert_eq!(size_proxy(&record), 0);

        let record = object(json!({}));
        assert_eq!(size_proxy(&record), 0);
    }
}
