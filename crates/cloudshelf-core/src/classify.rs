//! File category detection.
//!
//! One classifier serves both the selection preview (which knows the MIME
//! type reported by the browser) and the server file table (which only
//! knows the file name).

/// Display category of a file, used to pick its icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Pdf,
    Archive,
    Document,
    Spreadsheet,
    Presentation,
    Generic,
}

impl FileCategory {
    /// Detect category from the file name extension (case-insensitive).
    pub fn from_extension(filename: &str) -> Self {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return Self::Generic;
        };
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => Self::Image,
            "mp4" | "avi" | "mkv" | "mov" | "webm" => Self::Video,
            "mp3" | "wav" | "ogg" | "flac" => Self::Audio,
            "pdf" => Self::Pdf,
            "zip" | "rar" | "7z" | "tar" | "gz" => Self::Archive,
            "doc" | "docx" => Self::Document,
            "xls" | "xlsx" => Self::Spreadsheet,
            "ppt" | "pptx" => Self::Presentation,
            _ => Self::Generic,
        }
    }

    /// Detect category from a MIME type prefix. Only media types are recognized.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let (top, _) = mime.split_once('/')?;
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }

    /// Human-readable label, used for accessibility text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Pdf => "PDF document",
            Self::Archive => "Archive",
            Self::Document => "Document",
            Self::Spreadsheet => "Spreadsheet",
            Self::Presentation => "Presentation",
            Self::Generic => "File",
        }
    }
}

/// Classify a file by name and, when known, MIME type.
///
/// Precedence: a `pdf` or archive extension wins over the MIME type, a
/// media MIME type wins over any other extension, and the extension alone
/// decides otherwise.
pub fn classify(filename: &str, mime: Option<&str>) -> FileCategory {
    let by_extension = FileCategory::from_extension(filename);
    if matches!(by_extension, FileCategory::Pdf | FileCategory::Archive) {
        return by_extension;
    }
    mime.and_then(FileCategory::from_mime)
        .unwrap_or(by_extension)
}
