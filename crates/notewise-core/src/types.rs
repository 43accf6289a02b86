use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// File kinds
// =============================================================================

/// Broad category of an uploaded source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Plain text or markdown, read as UTF-8.
    Text,
    /// PDF or DOCX document.
    Document,
    /// Raster image, routed through OCR.
    Image,
    /// Recorded speech, routed through transcription.
    Audio,
}

impl FileKind {
    pub const ALL: [FileKind; 4] = [
        FileKind::Text,
        FileKind::Document,
        FileKind::Image,
        FileKind::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Document => "document",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    /// Lower-case extensions accepted for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt", "md", "rtf"],
            Self::Document => &["pdf", "docx"],
            Self::Image => &["png", "jpg", "jpeg", "gif", "bmp"],
            Self::Audio => &["mp3", "wav", "ogg", "m4a"],
        }
    }

    /// Classify an extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    /// Classify a filename by its final extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(Self::from_extension)
    }

    /// The full extension table, keyed by kind name.
    pub fn table() -> BTreeMap<&'static str, Vec<&'static str>> {
        Self::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), kind.extensions().to_vec()))
            .collect()
    }
}

/// Return the text after the last `.` in a filename, if any.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Reduce an uploaded filename to a safe, flat ASCII name.
///
/// Path components are dropped, whitespace becomes `_`, and anything other
/// than ASCII alphanumerics, `.`, `-` and `_` is removed. Leading dots and
/// underscores are stripped so the result can never be a hidden file or a
/// relative path.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}
