//! Media file probing.
//!
//! Probing is delegated to an external tool. A [`Prober`] runs it and hands
//! back the tool's structured output untouched as a [`RawProbe`]; turning
//! that document into typed streams is the adapter's job
//! ([`crate::adapter`]).

mod ffprobe;

pub use ffprobe::FfprobeProber;

use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// A media file prober.
///
/// Implementations must be safe to share across threads (`Send + Sync`) so
/// that a batch can probe files on separate workers.
pub trait Prober: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Probe a media file and return the tool's structured output.
    fn probe(&self, path: &Path) -> Result<RawProbe>;
}

/// The probe tool's output for one file, as a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProbe {
    document: Value,
}

impl RawProbe {
    /// Wrap an already-parsed document.
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// The top-level `streams` list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedProbe`] if `streams` is missing or is not a list.
    pub fn streams(&self) -> Result<&[Value]> {
        match self.document.get("streams") {
            Some(Value::Array(streams)) => Ok(streams.as_slice()),
            Some(_) => Err(Error::malformed_probe("`streams` is not a list")),
            None => Err(Error::malformed_probe("missing top-level `streams` list")),
        }
    }

    /// Container size in bytes from `format.size`, when reported.
    pub fn format_size(&self) -> Option<u64> {
        match self.document.get("format")?.get("size")? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}
