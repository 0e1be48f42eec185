//! Scan event reporting.
//!
//! The scanner does not log on its own; it hands every finding to the
//! [`Reporter`] it was built with. [`TracingReporter`] forwards events to
//! `tracing`, and any `Fn(&ScanEvent)` closure is a reporter too.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::Level;
use visionary_av::{Diagnostic, StreamKind};

/// Something the scanner wants the user to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Discovery finished under a root.
    Discovered { root: PathBuf, count: usize },
    /// Discovery found nothing to scan.
    NoFiles { root: PathBuf },
    /// The probe failed or returned something unusable; the file is skipped.
    ProbeFailed { path: PathBuf, reason: String },
    /// A non-fatal finding while building a media file.
    Finding {
        path: PathBuf,
        diagnostic: Diagnostic,
    },
}

impl ScanEvent {
    /// The level the event is logged at.
    ///
    /// Missing video or audio is an error, a missing subtitle or a fallback
    /// from the preferred language is only debug output.
    pub fn level(&self) -> Level {
        match self {
            ScanEvent::Discovered { .. } => Level::INFO,
            ScanEvent::NoFiles { .. } => Level::WARN,
            ScanEvent::ProbeFailed { .. } => Level::ERROR,
            ScanEvent::Finding { diagnostic, .. } => match diagnostic {
                Diagnostic::NoStreams {
                    kind: StreamKind::Subtitle,
                } => Level::DEBUG,
                Diagnostic::NoStreams { .. } => Level::ERROR,
                Diagnostic::NoPreferredLanguage { .. } => Level::DEBUG,
            },
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::Discovered { count, .. } => write!(f, "Number of files: {}.", count),
            ScanEvent::NoFiles { root } => {
                write!(f, "No files to process under {}.", root.display())
            }
            ScanEvent::ProbeFailed { path, reason } => write!(
                f,
                "Filename: {}. Unable to parse. Reason: {}.",
                file_name(path),
                reason
            ),
            ScanEvent::Finding { path, diagnostic } => match diagnostic {
                Diagnostic::NoStreams { kind } => {
                    write!(f, "Filename: {}. No {} stream found.", file_name(path), kind)
                }
                Diagnostic::NoPreferredLanguage { kind, language } => write!(
                    f,
                    "Filename: {}. No {} {} stream found.",
                    file_name(path),
                    language,
                    kind
                ),
            },
        }
    }
}

/// Receiver of scan events.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ScanEvent);
}

impl<F> Reporter for F
where
    F: Fn(&ScanEvent) + Send + Sync,
{
    fn report(&self, event: &ScanEvent) {
        self(event)
    }
}

/// Logs every event through `tracing` at the event's level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &ScanEvent) {
        match event.level() {
            Level::ERROR => tracing::error!("{}", event),
            Level::WARN => tracing::warn!("{}", event),
            Level::INFO => tracing::info!("{}", event),
            Level::DEBUG => tracing::debug!("{}", event),
            _ => tracing::trace!("{}", event),
        }
    }
}
