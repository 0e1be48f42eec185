//! Visionary-Common: shared utilities.
//!
//! - **Path Utilities**: extension-set filtering for library traversal and
//!   splitting file names into name and extension
//! - **Size Formatting**: human-readable byte counts for reports
//! - **Error Handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use visionary_common::paths::ExtensionSet;
//! use visionary_common::size::format_size;
//!
//! let extensions = ExtensionSet::default();
//! assert!(extensions.matches(Path::new("movie.mkv")));
//! assert_eq!(format_size(2048), "2.0 KB");
//! ```

pub mod error;
pub mod paths;
pub mod size;

pub use error::{Error, Result};
pub use paths::{split_file_name, ExtensionSet};
pub use size::format_size;
