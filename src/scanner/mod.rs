//! Media library scanner.
//!
//! Walks a library root, probes every file whose extension is in the
//! configured set and builds a [`MediaFile`] for each. A file that cannot be
//! probed is reported and skipped; the batch always runs to the end.

mod reporter;

pub use reporter::{Reporter, ScanEvent, TracingReporter};

use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use visionary_av::{MediaFile, Prober, SelectionPolicy};
use visionary_common::ExtensionSet;
use walkdir::WalkDir;

/// Scanner for discovering and classifying media files.
pub struct Scanner {
    prober: Arc<dyn Prober>,
    reporter: Arc<dyn Reporter>,
    extensions: ExtensionSet,
    policy: SelectionPolicy,
    parallel: bool,
}

/// Result of scanning a library root.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files whose extension matched.
    pub considered: usize,
    /// Successfully built media files, in traversal order.
    pub media_files: Vec<MediaFile>,
    /// Files skipped because the probe failed.
    pub failed: Vec<PathBuf>,
}

impl Scanner {
    /// Create a scanner with the default extension set and selection policy.
    pub fn new(prober: Arc<dyn Prober>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            prober,
            reporter,
            extensions: ExtensionSet::default(),
            policy: SelectionPolicy::default(),
            parallel: false,
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Probe files on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// List the files under `root` whose extension is in the set.
    ///
    /// Links are followed and entries come back sorted by file name within
    /// each directory, so the order is stable between runs.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            if self.extensions.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }

    /// Scan every matching file under `root`.
    pub fn scan(&self, root: &Path) -> Result<ScanSummary> {
        if !root.is_dir() {
            anyhow::bail!("Library root is not a directory: {:?}", root);
        }

        info!("Scanning directory: {:?}", root);
        let paths = self.discover(root);
        self.reporter.report(&ScanEvent::Discovered {
            root: root.to_path_buf(),
            count: paths.len(),
        });

        if paths.is_empty() {
            self.reporter.report(&ScanEvent::NoFiles {
                root: root.to_path_buf(),
            });
            return Ok(ScanSummary::default());
        }

        let results: Vec<(PathBuf, Option<MediaFile>)> = if self.parallel {
            paths
                .into_par_iter()
                .map(|path| {
                    let media = self.scan_file(&path);
                    (path, media)
                })
                .collect()
        } else {
            paths
                .into_iter()
                .map(|path| {
                    let media = self.scan_file(&path);
                    (path, media)
                })
                .collect()
        };

        let mut summary = ScanSummary {
            considered: results.len(),
            ..Default::default()
        };
        for (path, media) in results {
            match media {
                Some(media) => summary.media_files.push(media),
                None => summary.failed.push(path),
            }
        }

        info!(
            "Scan complete: {} of {} files classified from {:?}",
            summary.media_files.len(),
            summary.considered,
            root
        );
        Ok(summary)
    }

    /// Probe and classify one file, reporting what was found.
    ///
    /// Returns `None` when the probe failed; the failure has been reported.
    pub fn scan_file(&self, path: &Path) -> Option<MediaFile> {
        debug!("Probing {:?} with {}", path, self.prober.name());

        let media = self
            .prober
            .probe(path)
            .and_then(|probe| MediaFile::from_probe_with(path, &probe, &self.policy));

        match media {
            Ok(media) => {
                for diagnostic in media.diagnostics() {
                    self.reporter.report(&ScanEvent::Finding {
                        path: path.to_path_buf(),
                        diagnostic: diagnostic.clone(),
                    });
                }
                Some(media)
            }
            Err(e) => {
                self.reporter.report(&ScanEvent::ProbeFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}
