//! The file manager: selection, upload, file table and status notice.
//!
//! [`FileManager`] owns all client state and is the only thing the UI talks
//! to. It is single-threaded: state sits behind `Cell`/`RefCell`, every
//! method takes `&self`, and no borrow is held across an `.await`, so one
//! instance can be shared (e.g. in an `Rc`) between event handlers and
//! spawned tasks.

use std::cell::{Cell, RefCell};

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::api::{AbortHandle, Backend, Clock, Endpoints, UploadResponse};
use crate::config::ClientConfig;
use crate::error::{ApiError, UploadError};
use crate::files::{FileTable, check_delete, parse_listing};
use crate::preview::{PreviewRow, render_preview};
use crate::selection::SelectionSet;
use crate::upload::{ProgressStream, UploadUpdate, UploadView};

// =============================================================================
// Notifications
// =============================================================================

/// Region of the UI whose data changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// The selection (and therefore the preview) changed.
    Selection,
    /// The file input control must be reset.
    ResetInput,
    /// The upload panel changed.
    Upload,
    /// The file table was replaced.
    Files,
    /// The status notice changed.
    Notice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// The single status line shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

// =============================================================================
// FileManager
// =============================================================================

/// Client state and operations.
///
/// Every mutation is followed by a [`Change`] notification to the observer
/// installed with [`FileManager::on_change`].
pub struct FileManager<B: Backend, C: Clock> {
    backend: B,
    clock: C,
    config: ClientConfig,
    endpoints: Endpoints,
    selection: RefCell<SelectionSet<B::File>>,
    upload: Cell<UploadView>,
    uploading: Cell<bool>,
    /// Bumped on every upload start; a stale hide timer must not hide a newer upload.
    upload_generation: Cell<u64>,
    abort: RefCell<Option<B::Abort>>,
    files: RefCell<Option<FileTable>>,
    notice: RefCell<Option<Notice>>,
    observer: Box<dyn Fn(Change)>,
}

impl<B: Backend, C: Clock> FileManager<B, C> {
    pub fn new(config: ClientConfig, backend: B, clock: C) -> Self {
        Self {
            endpoints: Endpoints::new(&config.base_url),
            backend,
            clock,
            config,
            selection: RefCell::new(SelectionSet::new()),
            upload: Cell::new(UploadView::default()),
            uploading: Cell::new(false),
            upload_generation: Cell::new(0),
            abort: RefCell::new(None),
            files: RefCell::new(None),
            notice: RefCell::new(None),
            observer: Box::new(|_| {}),
        }
    }

    /// Install the change observer, replacing any previous one.
    pub fn on_change(mut self, observer: impl Fn(Change) + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    fn emit(&self, change: Change) {
        (self.observer)(change);
    }

    // -------------------------------------------------------------------------
    // Read Access
    // -------------------------------------------------------------------------

    /// Preview rows, or `None` when nothing is selected.
    pub fn preview(&self) -> Option<Vec<PreviewRow>> {
        render_preview(&self.selection.borrow())
    }

    pub fn selection_len(&self) -> usize {
        self.selection.borrow().len()
    }

    pub fn input_generation(&self) -> u64 {
        self.selection.borrow().input_generation()
    }

    pub fn upload_view(&self) -> UploadView {
        self.upload.get()
    }

    /// Whether an upload is running. The upload trigger is disabled meanwhile.
    pub fn is_uploading(&self) -> bool {
        self.uploading.get()
    }

    /// The last loaded file table, or `None` before the first successful load.
    pub fn file_table(&self) -> Option<FileTable> {
        self.files.borrow().clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.borrow().clone()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the selection. Ignored when `files` is empty.
    pub fn select(&self, files: Vec<B::File>) {
        let changed = self.selection.borrow_mut().select(files);
        if changed {
            self.emit(Change::Selection);
        }
    }

    /// Remove one selected file. Out-of-range indices are ignored.
    pub fn remove_at(&self, index: usize) {
        let removed = self.selection.borrow_mut().remove_at(index);
        if removed.is_some() {
            self.emit(Change::Selection);
        }
    }

    /// Empty the selection and reset the file input.
    pub fn clear_selection(&self) {
        self.selection.borrow_mut().clear();
        self.emit(Change::ResetInput);
        self.emit(Change::Selection);
    }

    // -------------------------------------------------------------------------
    // Upload
    // -------------------------------------------------------------------------

    /// Upload the whole selection in one multipart request.
    ///
    /// On success the selection is cleared and the file table reloaded after
    /// `clear_after_ms`; the progress panel hides `hide_after_ms` later. A
    /// selection made while the upload ran is not cleared. On failure the
    /// panel stays visible and the selection is kept.
    pub async fn upload(&self) -> Result<UploadResponse, UploadError> {
        if self.uploading.get() {
            warn!("upload requested while another upload is running");
            return Err(self.report_upload_error(UploadError::Busy));
        }

        let (files, bytes, revision) = {
            let selection = self.selection.borrow();
            (selection.files().to_vec(), selection.total_bytes(), selection.revision())
        };
        if files.is_empty() {
            return Err(self.report_upload_error(UploadError::EmptySelection));
        }

        self.uploading.set(true);
        let generation = self.upload_generation.get() + 1;
        self.upload_generation.set(generation);
        self.update_upload(|view| *view = UploadView::started(files.len()));
        self.set_notice(None);

        info!(files = files.len(), bytes, "upload started");

        match self.transfer(&files).await {
            Ok(response) => {
                self.complete_upload(&response, generation, revision).await;
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "upload failed");
                self.uploading.set(false);
                self.update_upload(UploadView::fail);
                Err(self.report_upload_error(err))
            }
        }
    }

    /// Abort the running upload. Returns `false` if none is running.
    pub fn cancel_upload(&self) -> bool {
        match self.abort.borrow().as_ref() {
            Some(handle) => {
                info!("cancelling upload");
                handle.abort();
                true
            }
            None => false,
        }
    }

    async fn transfer(&self, files: &[B::File]) -> Result<UploadResponse, UploadError> {
        let (handle, events) = self.backend.send_files(&self.endpoints.upload(), files)?;
        *self.abort.borrow_mut() = Some(handle);

        let mut progress = ProgressStream::new(events, &self.clock);
        let mut outcome = Err(UploadError::Network);
        while let Some(update) = progress.next().await {
            match update {
                UploadUpdate::Progress(sample) => self.update_upload(|view| view.apply(&sample)),
                UploadUpdate::Finished(result) => outcome = result,
            }
        }

        self.abort.borrow_mut().take();
        let elapsed_ms = progress.session().elapsed_ms(self.clock.now_ms());
        debug!(elapsed_ms, ok = outcome.is_ok(), "transfer ended");
        outcome
    }

    async fn complete_upload(&self, response: &UploadResponse, generation: u64, revision: u64) {
        info!(stored = ?response.files, "upload finished");
        self.update_upload(UploadView::succeed);
        self.set_notice(Some(Notice::success(response.message.clone())));

        self.clock.sleep(self.config.clear_after_ms).await;
        if self.selection.borrow().revision() == revision {
            self.clear_selection();
        } else {
            info!("selection changed during upload, keeping it");
        }
        // reload failures are already reported as a notice
        let _ = self.load_files().await;
        self.uploading.set(false);
        self.emit(Change::Upload);

        self.clock.sleep(self.config.hide_after_ms).await;
        if self.upload_generation.get() == generation {
            self.update_upload(|view| view.visible = false);
        }
    }

    fn update_upload(&self, f: impl FnOnce(&mut UploadView)) {
        let mut view = self.upload.get();
        f(&mut view);
        self.upload.set(view);
        self.emit(Change::Upload);
    }

    fn report_upload_error(&self, err: UploadError) -> UploadError {
        self.set_notice(Some(Notice::error(err.to_string())));
        err
    }

    // -------------------------------------------------------------------------
    // File Table
    // -------------------------------------------------------------------------

    /// Fetch the file inventory and replace the table with it.
    ///
    /// On failure the previous table stays and an error notice is shown.
    pub async fn load_files(&self) -> Result<(), ApiError> {
        let listing = self
            .backend
            .get(&self.endpoints.files())
            .await
            .and_then(|reply| parse_listing(&reply));

        match listing {
            Ok(records) => {
                info!(count = records.len(), "file list loaded");
                let table = FileTable::from_records(&records, &self.endpoints);
                *self.files.borrow_mut() = Some(table);
                self.emit(Change::Files);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "file list failed to load");
                self.set_notice(Some(Notice::error(format!("Error loading files: {}", err))));
                Err(err)
            }
        }
    }

    /// Delete a stored file and reload the table.
    ///
    /// The caller is responsible for asking the user to confirm first.
    pub async fn delete_file(&self, filename: &str) -> Result<(), ApiError> {
        let result = self
            .backend
            .delete(&self.endpoints.delete(filename))
            .await
            .and_then(|reply| check_delete(&reply));

        match result {
            Ok(()) => {
                info!(filename, "file deleted");
                self.set_notice(Some(Notice::success(format!("Deleted \"{}\"", filename))));
                let _ = self.load_files().await;
                Ok(())
            }
            Err(err) => {
                warn!(filename, error = %err, kind = ?err.kind(), "delete failed");
                self.set_notice(Some(Notice::error(format!("Error: {}", err))));
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Notice
    // -------------------------------------------------------------------------

    fn set_notice(&self, notice: Option<Notice>) {
        *self.notice.borrow_mut() = notice;
        self.emit(Change::Notice);
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::api::{HttpReply, TransportEvent};
    use crate::mock::{Call, ManualClock, MemoryFile, MockBackend, new_log};

    fn manager() -> FileManager<MockBackend, ManualClock> {
        let log = new_log();
        FileManager::new(
            ClientConfig::default(),
            MockBackend::new(log.clone()),
            ManualClock::with_log(log),
        )
    }

    #[test]
    fn test_select_and_remove_notify() {
        let log = new_log();
        let sink = log.clone();
        let manager = FileManager::new(
            ClientConfig::default(),
            MockBackend::new(log.clone()),
            ManualClock::new(),
        )
        .on_change(move |change| sink.borrow_mut().push(Call::Notified(change)));

        manager.select(Vec::new());
        manager.select(vec![MemoryFile::new("a", 1), MemoryFile::new("b", 2)]);
        manager.remove_at(7);
        manager.remove_at(0);

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Notified(Change::Selection),
                Call::Notified(Change::Selection),
            ]
        );
        assert_eq!(manager.selection_len(), 1);
    }

    #[test]
    fn test_clear_resets_input() {
        let manager = manager();
        manager.select(vec![MemoryFile::new("a", 1)]);
        let generation = manager.input_generation();

        manager.clear_selection();
        assert_eq!(manager.preview(), None);
        assert_eq!(manager.input_generation(), generation + 1);
    }

    #[test]
    fn test_upload_progress_updates_view() {
        let manager = manager();
        manager.backend.push_upload(vec![
            TransportEvent::Progress {
                loaded: 25,
                total: Some(100),
            },
            TransportEvent::Completed(HttpReply::new(500, "")),
        ]);
        manager.select(vec![MemoryFile::new("a", 100)]);

        let result = block_on(manager.upload());
        assert_eq!(result, Err(UploadError::Server(500)));

        let view = manager.upload_view();
        assert_eq!(view.percent, 25);
        assert!(view.visible);
        assert!(!manager.is_uploading());
    }

    #[test]
    fn test_cancel_without_upload() {
        assert!(!manager().cancel_upload());
    }
}
