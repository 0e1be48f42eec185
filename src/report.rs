//! Library report rendering.

use serde::Serialize;
use visionary_av::MediaFile;
use visionary_common::format_size;

/// Which files a report lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    /// Only files with a Dolby Vision video stream.
    pub dolby_vision: bool,
    /// Only files with an Atmos audio stream.
    pub atmos: bool,
}

impl LibraryFilter {
    pub fn matches(&self, media: &MediaFile) -> bool {
        (!self.dolby_vision || media.has_dolby_vision()) && (!self.atmos || media.has_atmos())
    }

    pub fn apply<'a>(&self, files: &'a [MediaFile]) -> Vec<&'a MediaFile> {
        files.iter().filter(|m| self.matches(m)).collect()
    }
}

/// One row of the library report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryRow {
    pub name: String,
    pub extension: String,
    pub size: String,
    pub has_dolby_vision: bool,
    pub has_atmos: bool,
    pub has_subtitles: bool,
}

impl From<&MediaFile> for LibraryRow {
    fn from(media: &MediaFile) -> Self {
        Self {
            name: media.name().to_string(),
            extension: media.extension().to_string(),
            size: media.size().map(format_size).unwrap_or_else(|| "-".to_string()),
            has_dolby_vision: media.has_dolby_vision(),
            has_atmos: media.has_atmos(),
            has_subtitles: media.has_subtitles(),
        }
    }
}

const HEADERS: [&str; 6] = ["NAME", "EXT", "SIZE", "DV", "ATMOS", "SUBS"];

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Render rows as a left-aligned, space-padded table with a header line.
pub fn render_table(rows: &[LibraryRow]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                row.extension.clone(),
                row.size.clone(),
                yes_no(row.has_dolby_vision),
                yes_no(row.has_atmos),
                yes_no(row.has_subtitles),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    for line in std::iter::once(&header).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}
