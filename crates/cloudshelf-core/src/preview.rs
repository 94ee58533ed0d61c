//! Selection preview rows.

use crate::classify::{FileCategory, classify};
use crate::format::format_bytes;
use crate::selection::{LocalFile, SelectionSet};

/// One row of the selection preview.
///
/// `name` is raw user input; the UI must render it as text, never as markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRow {
    /// Position in the selection, bound to the row's remove control.
    pub index: usize,
    pub name: String,
    pub size: String,
    pub category: FileCategory,
}

/// Build the preview for the current selection.
///
/// Returns `None` for an empty selection: the preview region is hidden
/// rather than rendered as an empty list.
pub fn render_preview<F: LocalFile>(selection: &SelectionSet<F>) -> Option<Vec<PreviewRow>> {
    if selection.is_empty() {
        return None;
    }

    let rows = selection
        .files()
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let name = file.name();
            let mime = file.mime_type();
            PreviewRow {
                index,
                category: classify(&name, mime.as_deref()),
                size: format_bytes(file.size()),
                name,
            }
        })
        .collect();
    Some(rows)
}
