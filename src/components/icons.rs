//! Centralized icon definitions.
//!
//! Maps semantic icon names to Bootstrap icons, and file categories to
//! their row icon.

use icondata::Icon;

use cloudshelf_core::FileCategory;

mod bootstrap {
    pub use icondata::{
        BsCheckCircle as Success, BsCloudArrowUp as Upload, BsDownload as Download,
        BsExclamationTriangle as Warning, BsFileEarmark as File,
        BsFileEarmarkExcel as FileSpreadsheet, BsFileEarmarkImage as FileImage,
        BsFileEarmarkMusic as FileAudio, BsFileEarmarkPdf as FilePdf,
        BsFileEarmarkPlay as FileVideo, BsFileEarmarkPpt as FilePresentation,
        BsFileEarmarkWord as FileDocument, BsFileEarmarkZip as FileArchive, BsTrash as Delete,
        BsXLg as Close,
    };
}

pub const UPLOAD: Icon = bootstrap::Upload;
pub const DOWNLOAD: Icon = bootstrap::Download;
pub const DELETE: Icon = bootstrap::Delete;
pub const CLOSE: Icon = bootstrap::Close;
pub const SUCCESS: Icon = bootstrap::Success;
pub const WARNING: Icon = bootstrap::Warning;

/// Icon shown next to a file of the given category.
pub fn category_icon(category: FileCategory) -> Icon {
    match category {
        FileCategory::Image => bootstrap::FileImage,
        FileCategory::Video => bootstrap::FileVideo,
        FileCategory::Audio => bootstrap::FileAudio,
        FileCategory::Pdf => bootstrap::FilePdf,
        FileCategory::Archive => bootstrap::FileArchive,
        FileCategory::Document => bootstrap::FileDocument,
        FileCategory::Spreadsheet => bootstrap::FileSpreadsheet,
        FileCategory::Presentation => bootstrap::FilePresentation,
        FileCategory::Generic => bootstrap::File,
    }
}
