//! In-memory test doubles for the [`Backend`] and [`Clock`] seams.
//!
//! Every request, sleep and abort is appended to a shared [`CallLog`] so
//! tests can assert on the exact order of side effects.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use futures::channel::oneshot;

use crate::api::{AbortHandle, Backend, Clock, HttpReply, TransportEvent};
use crate::error::{ApiError, UploadError};
use crate::manager::Change;
use crate::selection::LocalFile;

/// A side effect observed by a test double.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Upload { url: String, files: Vec<String> },
    Get(String),
    Delete(String),
    Sleep(u32),
    Abort,
    /// Recorded by a test's change observer.
    Notified(Change),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

// =============================================================================
// MemoryFile
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    size: u64,
    mime: Option<String>,
}

impl MemoryFile {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime = Some(mime.to_string());
        self
    }
}

impl LocalFile for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> Option<String> {
        self.mime.clone()
    }
}

// =============================================================================
// MockBackend
// =============================================================================

/// Backend answering from scripted queues.
///
/// Each upload replays the next script pushed with [`push_upload`]. A script
/// without a terminal event leaves the upload pending until it is aborted.
/// GET and DELETE answer from [`push_reply`], defaulting to `200 []`.
///
/// [`push_upload`]: MockBackend::push_upload
/// [`push_reply`]: MockBackend::push_reply
pub struct MockBackend {
    log: CallLog,
    uploads: RefCell<VecDeque<Vec<TransportEvent>>>,
    replies: RefCell<VecDeque<Result<HttpReply, ApiError>>>,
    refuse_uploads: Cell<bool>,
}

impl MockBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            uploads: RefCell::new(VecDeque::new()),
            replies: RefCell::new(VecDeque::new()),
            refuse_uploads: Cell::new(false),
        }
    }

    pub fn push_upload(&self, events: Vec<TransportEvent>) {
        self.uploads.borrow_mut().push_back(events);
    }

    pub fn push_reply(&self, reply: Result<HttpReply, ApiError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// Make `send_files` fail as if the request could not be built.
    pub fn refuse_uploads(&self) {
        self.refuse_uploads.set(true);
    }

    fn next_reply(&self) -> Result<HttpReply, ApiError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpReply::new(200, "[]")))
    }
}

/// Abort handle of a mock upload: feeds [`TransportEvent::Aborted`] into its stream.
pub struct MockAbort {
    sender: UnboundedSender<TransportEvent>,
    log: CallLog,
}

impl AbortHandle for MockAbort {
    fn abort(&self) {
        self.log.borrow_mut().push(Call::Abort);
        let _ = self.sender.unbounded_send(TransportEvent::Aborted);
    }
}

impl Backend for MockBackend {
    type File = MemoryFile;
    type Abort = MockAbort;
    type Events = UnboundedReceiver<TransportEvent>;

    fn send_files(
        &self,
        url: &str,
        files: &[MemoryFile],
    ) -> Result<(MockAbort, UnboundedReceiver<TransportEvent>), UploadError> {
        if self.refuse_uploads.get() {
            return Err(UploadError::Transport("refused".to_string()));
        }
        self.log.borrow_mut().push(Call::Upload {
            url: url.to_string(),
            files: files.iter().map(LocalFile::name).collect(),
        });

        let (sender, receiver) = unbounded();
        let script = self.uploads.borrow_mut().pop_front().unwrap_or_default();
        for event in script {
            let _ = sender.unbounded_send(event);
        }
        let handle = MockAbort {
            sender,
            log: self.log.clone(),
        };
        Ok((handle, receiver))
    }

    async fn get(&self, url: &str) -> Result<HttpReply, ApiError> {
        self.log.borrow_mut().push(Call::Get(url.to_string()));
        self.next_reply()
    }

    async fn delete(&self, url: &str) -> Result<HttpReply, ApiError> {
        self.log.borrow_mut().push(Call::Delete(url.to_string()));
        self.next_reply()
    }
}

// =============================================================================
// ManualClock
// =============================================================================

/// Clock that only moves when told to. Sleeping advances it instantly.
pub struct ManualClock {
    now: Cell<f64>,
    log: Option<CallLog>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            log: None,
        }
    }

    /// Clock that records each sleep in `log`.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            now: Cell::new(0.0),
            log: Some(log),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        if let Some(log) = &self.log {
            log.borrow_mut().push(Call::Sleep(ms));
        }
        self.advance(f64::from(ms));
        std::future::ready(())
    }
}

// =============================================================================
// GatedClock
// =============================================================================

/// Clock whose sleeps only finish when the test releases them, oldest first.
///
/// Clones share the same gates, so a test keeps one clone and hands the other
/// to the manager.
#[derive(Clone, Default)]
pub struct GatedClock {
    gates: Rc<RefCell<VecDeque<oneshot::Sender<()>>>>,
    log: Option<CallLog>,
}

impl GatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that records each sleep in `log`.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            gates: Rc::default(),
            log: Some(log),
        }
    }

    /// Number of sleeps still waiting.
    pub fn pending(&self) -> usize {
        self.gates.borrow().len()
    }

    /// Finish the oldest waiting sleep. Returns `false` if none is waiting.
    pub fn release(&self) -> bool {
        let gate = self.gates.borrow_mut().pop_front();
        gate.is_some_and(|sender| sender.send(()).is_ok())
    }
}

impl Clock for GatedClock {
    fn now_ms(&self) -> f64 {
        0.0
    }

    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        if let Some(log) = &self.log {
            log.borrow_mut().push(Call::Sleep(ms));
        }
        let (sender, receiver) = oneshot::channel();
        self.gates.borrow_mut().push_back(sender);
        async move {
            // a dropped clock ends the sleep as well
            let _ = receiver.await;
        }
    }
}
