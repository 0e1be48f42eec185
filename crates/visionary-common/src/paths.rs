//! Path utilities for selecting media files by extension.
//!
//! The scanner never hardcodes which containers it looks at: callers build an
//! [`ExtensionSet`] from configuration (or use the default, Matroska only) and
//! test each traversed path against it.

use std::path::Path;

use crate::{Error, Result};

/// Extensions scanned when nothing else is configured.
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["mkv"];

/// A non-empty set of file extensions, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    /// Build a set from extension strings.
    ///
    /// Leading dots are stripped and entries are lowercased, so `".MKV"` and
    /// `"mkv"` are the same entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no usable extension remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use visionary_common::paths::ExtensionSet;
    ///
    /// let set = ExtensionSet::new([".MKV", "mp4"]).unwrap();
    /// assert!(set.matches(Path::new("movie.mkv")));
    /// assert!(set.matches(Path::new("/path/to/video.MP4")));
    /// assert!(!set.matches(Path::new("subtitle.srt")));
    /// ```
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }

        if normalized.is_empty() {
            return Err(Error::invalid_input("extension set must not be empty"));
        }

        Ok(Self {
            extensions: normalized,
        })
    }

    /// Check if a path ends in one of the extensions of this set.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Iterate over the normalized extensions.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Split the final segment of a path into name and extension.
///
/// The extension is everything after the last `.`; the name is everything
/// before it. A segment without a `.` has an empty extension.
///
/// Inner dots are kept in the name (`Heat.1995`) instead of being dropped,
/// and a dotless segment is all name rather than an empty name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use visionary_common::paths::split_file_name;
///
/// let (name, ext) = split_file_name(Path::new("/movies/Heat.1995.mkv"));
/// assert_eq!(name, "Heat.1995");
/// assert_eq!(ext, "mkv");
/// ```
pub fn split_file_name(path: &Path) -> (String, String) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match file_name.rsplit_once('.') {
        Some((name, ext)) => (name.to_string(), ext.to_string()),
        None => (file_name, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_is_matroska_only() {
        let set = ExtensionSet::default();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["mkv"]);

        assert!(set.matches(Path::new("movie.mkv")));
        assert!(set.matches(Path::new("movie.MKV")));
        assert!(!set.matches(Path::new("movie.mp4")));
    }

    #[test]
    fn test_custom_set() {
        let set = ExtensionSet::new(["mkv", ".mp4", " M4V "]).unwrap();

        assert!(set.matches(Path::new("/path/to/movie.mkv")));
        assert!(set.matches(Path::new("relative/path/movie.mp4")));
        assert!(set.matches(Path::new("movie.m4v")));

        assert!(!set.matches(Path::new("subtitle.srt")));
        assert!(!set.matches(Path::new("no_extension")));
        assert!(!set.matches(Path::new("")));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = ExtensionSet::new(["mkv", "MKV", ".mkv"]).unwrap();
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(ExtensionSet::new(Vec::<String>::new()).is_err());
        assert!(ExtensionSet::new(["", "."]).is_err());
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(
            split_file_name(Path::new("movie.mkv")),
            ("movie".to_string(), "mkv".to_string())
        );
        assert_eq!(
            split_file_name(Path::new("/a/b/Movie.2160p.DV.mkv")),
            ("Movie.2160p.DV".to_string(), "mkv".to_string())
        );
        assert_eq!(
            split_file_name(Path::new("no_extension")),
            ("no_extension".to_string(), String::new())
        );
        // Hidden files
        assert_eq!(
            split_file_name(Path::new(".hidden")),
            (String::new(), "hidden".to_string())
        );
    }
}
