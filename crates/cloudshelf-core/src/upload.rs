//! Upload progress tracking.
//!
//! An upload is observed through a [`ProgressStream`]: a lazy, finite stream
//! that turns raw [`TransportEvent`]s into [`UploadUpdate`]s. It yields any
//! number of progress samples and ends right after exactly one
//! [`UploadUpdate::Finished`].

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream, StreamExt};
use tracing::debug;

use crate::api::{Clock, HttpReply, TransportEvent, UploadResponse};
use crate::config::SPEED_SAMPLE_INTERVAL_MS;
use crate::error::UploadError;

// =============================================================================
// TransferSpeed
// =============================================================================

/// Upload speed in whole kilobytes (1024 bytes) per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferSpeed {
    kb_per_sec: u64,
}

impl TransferSpeed {
    pub fn from_kb_per_sec(kb_per_sec: u64) -> Self {
        Self { kb_per_sec }
    }

    /// Speed of `bytes` transferred over `elapsed_ms`, rounded to whole KB/s.
    pub fn from_rate(bytes: u64, elapsed_ms: f64) -> Self {
        if elapsed_ms <= 0.0 {
            return Self::from_kb_per_sec(0);
        }
        let bytes_per_sec = bytes as f64 / (elapsed_ms / 1000.0);
        Self::from_kb_per_sec((bytes_per_sec / 1024.0).round() as u64)
    }

    pub fn kb_per_sec(self) -> u64 {
        self.kb_per_sec
    }
}

impl fmt::Display for TransferSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kb_per_sec < 1024 {
            write!(f, "{} KB/s", self.kb_per_sec)
        } else {
            write!(f, "{:.1} MB/s", self.kb_per_sec as f64 / 1024.0)
        }
    }
}

// =============================================================================
// UploadSession
// =============================================================================

/// One progress observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSample {
    pub loaded: u64,
    pub total: u64,
    /// `round(loaded / total * 100)`, capped at 100.
    pub percent: u8,
    /// Most recent speed sample, if one has been taken yet.
    pub speed: Option<TransferSpeed>,
}

/// Timing and byte counters of a single upload.
///
/// Speed is resampled only when more than [`SPEED_SAMPLE_INTERVAL_MS`] has
/// passed since the previous sample; events in between reuse the last value.
#[derive(Clone, Debug)]
pub struct UploadSession {
    started_at: f64,
    last_sample_at: f64,
    last_sample_bytes: u64,
    speed: Option<TransferSpeed>,
}

impl UploadSession {
    pub fn new(started_at_ms: f64) -> Self {
        Self {
            started_at: started_at_ms,
            last_sample_at: started_at_ms,
            last_sample_bytes: 0,
            speed: None,
        }
    }

    /// Record that `loaded` of `total` bytes were sent at `now_ms`.
    pub fn record(&mut self, loaded: u64, total: u64, now_ms: f64) -> ProgressSample {
        let percent = if total == 0 {
            100
        } else {
            ((loaded as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };

        let elapsed = now_ms - self.last_sample_at;
        if elapsed > SPEED_SAMPLE_INTERVAL_MS {
            let sent = loaded.saturating_sub(self.last_sample_bytes);
            let speed = TransferSpeed::from_rate(sent, elapsed);
            debug!(loaded, total, %speed, "upload speed sampled");
            self.speed = Some(speed);
            self.last_sample_at = now_ms;
            self.last_sample_bytes = loaded;
        }

        ProgressSample {
            loaded,
            total,
            percent,
            speed: self.speed,
        }
    }

    /// Milliseconds since the upload started.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.started_at
    }
}

// =============================================================================
// ProgressStream
// =============================================================================

/// Item of a [`ProgressStream`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadUpdate {
    Progress(ProgressSample),
    /// Terminal item: the parsed server response or the reason of failure.
    Finished(Result<UploadResponse, UploadError>),
}

/// Stream of upload updates over the transport's raw events.
///
/// Progress events without a computable length are skipped. If the
/// transport closes without a terminal event, the upload is reported as a
/// network failure.
pub struct ProgressStream<'c, S, C> {
    events: S,
    clock: &'c C,
    session: UploadSession,
    finished: bool,
}

impl<'c, S, C> ProgressStream<'c, S, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: Clock,
{
    /// Start tracking; the session clock starts now.
    pub fn new(events: S, clock: &'c C) -> Self {
        Self {
            events,
            clock,
            session: UploadSession::new(clock.now_ms()),
            finished: false,
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    fn finish(&mut self, result: Result<UploadResponse, UploadError>) -> UploadUpdate {
        self.finished = true;
        UploadUpdate::Finished(result)
    }
}

impl<S, C> Stream for ProgressStream<'_, S, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: Clock,
{
    type Item = UploadUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            let update = match ready!(this.events.poll_next_unpin(cx)) {
                Some(TransportEvent::Progress {
                    loaded,
                    total: Some(total),
                }) => {
                    let now = this.clock.now_ms();
                    UploadUpdate::Progress(this.session.record(loaded, total, now))
                }
                Some(TransportEvent::Progress { total: None, .. }) => continue,
                Some(TransportEvent::Completed(reply)) => this.finish(interpret_reply(&reply)),
                Some(TransportEvent::NetworkError) | None => this.finish(Err(UploadError::Network)),
                Some(TransportEvent::Aborted) => this.finish(Err(UploadError::Aborted)),
            };
            return Poll::Ready(Some(update));
        }
    }
}

impl<S, C> FusedStream for ProgressStream<'_, S, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: Clock,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

/// Turn the server's answer to an upload into its outcome.
fn interpret_reply(reply: &HttpReply) -> Result<UploadResponse, UploadError> {
    if !reply.is_success() {
        return Err(UploadError::Server(reply.status));
    }
    serde_json::from_str(&reply.body).map_err(|_| UploadError::InvalidResponse)
}

// =============================================================================
// UploadView
// =============================================================================

/// Lifecycle of the upload panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Everything the progress panel displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadView {
    pub visible: bool,
    pub phase: UploadPhase,
    pub percent: u8,
    pub file_count: usize,
    pub speed: Option<TransferSpeed>,
}

impl UploadView {
    /// Fresh panel for an upload of `file_count` files.
    pub fn started(file_count: usize) -> Self {
        Self {
            visible: true,
            phase: UploadPhase::InFlight,
            percent: 0,
            file_count,
            speed: None,
        }
    }

    pub fn apply(&mut self, sample: &ProgressSample) {
        self.percent = sample.percent;
        self.speed = sample.speed;
    }

    pub fn succeed(&mut self) {
        self.phase = UploadPhase::Succeeded;
        self.percent = 100;
    }

    /// Mark as failed; the panel keeps its last progress and stays visible.
    pub fn fail(&mut self) {
        self.phase = UploadPhase::Failed;
    }

    pub fn title(&self) -> &'static str {
        match self.phase {
            UploadPhase::Idle => "",
            UploadPhase::InFlight if self.percent == 0 => "Preparing upload...",
            UploadPhase::InFlight => "Uploading...",
            UploadPhase::Succeeded => "Upload complete!",
            UploadPhase::Failed => "Upload failed!",
        }
    }

    pub fn files_label(&self) -> String {
        let done = match self.phase {
            UploadPhase::Succeeded => self.file_count,
            _ => 0,
        };
        format!("{} of {} files", done, self.file_count)
    }

    pub fn speed_label(&self) -> String {
        self.speed
            .unwrap_or(TransferSpeed::from_kb_per_sec(0))
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use futures::stream;

    use super::*;
    use crate::mock::ManualClock;

    // =========================================================================
    // Speed Tests
    // =========================================================================

    #[test]
    fn test_speed_display() {
        assert_eq!(TransferSpeed::from_kb_per_sec(0).to_string(), "0 KB/s");
        assert_eq!(TransferSpeed::from_kb_per_sec(1023).to_string(), "1023 KB/s");
        assert_eq!(TransferSpeed::from_kb_per_sec(1024).to_string(), "1.0 MB/s");
        assert_eq!(TransferSpeed::from_kb_per_sec(2560).to_string(), "2.5 MB/s");
    }

    #[test]
    fn test_speed_from_rate() {
        // 512 KiB over one second
        assert_eq!(TransferSpeed::from_rate(524_288, 1000.0).kb_per_sec(), 512);
        // 1 MiB over half a second
        assert_eq!(TransferSpeed::from_rate(1_048_576, 500.0).kb_per_sec(), 2048);
        assert_eq!(TransferSpeed::from_rate(1000, 0.0).kb_per_sec(), 0);
    }

    // =========================================================================
    // Session Tests
    // =========================================================================

    #[test]
    fn test_percent_rounding() {
        let mut session = UploadSession::new(0.0);
        assert_eq!(session.record(0, 1000, 0.0).percent, 0);
        assert_eq!(session.record(334, 1000, 0.0).percent, 33);
        assert_eq!(session.record(336, 1000, 0.0).percent, 34);
        assert_eq!(session.record(1000, 1000, 0.0).percent, 100);
        assert_eq!(session.record(0, 0, 0.0).percent, 100);
    }

    #[test]
    fn test_speed_sampled_after_interval() {
        let mut session = UploadSession::new(1_000.0);

        // within the sampling interval: no speed yet
        let sample = session.record(100_000, 1_000_000, 1_400.0);
        assert_eq!(sample.speed, None);

        // exactly at the interval boundary is still too early
        let sample = session.record(200_000, 1_000_000, 1_500.0);
        assert_eq!(sample.speed, None);

        // 300 KiB-ish since start over 0.6 s
        let sample = session.record(307_200, 1_000_000, 1_600.0);
        assert_eq!(sample.speed, Some(TransferSpeed::from_kb_per_sec(500)));

        // next event 100 ms later keeps the previous sample
        let sample = session.record(600_000, 1_000_000, 1_700.0);
        assert_eq!(sample.speed, Some(TransferSpeed::from_kb_per_sec(500)));

        // measured from the last sample, not from start: 102400 bytes over 1 s
        let sample = session.record(409_600, 1_000_000, 2_600.0);
        assert_eq!(sample.speed, Some(TransferSpeed::from_kb_per_sec(100)));
        assert_eq!(session.elapsed_ms(2_600.0), 1_600.0);
    }

    // =========================================================================
    // Stream Tests
    // =========================================================================

    fn collect(events: Vec<TransportEvent>, clock: &ManualClock) -> Vec<UploadUpdate> {
        let progress = ProgressStream::new(stream::iter(events), clock);
        block_on(progress.collect::<Vec<_>>())
    }

    #[test]
    fn test_stream_success() {
        let clock = ManualClock::new();
        let updates = collect(
            vec![
                TransportEvent::Progress {
                    loaded: 50,
                    total: Some(100),
                },
                TransportEvent::Progress {
                    loaded: 100,
                    total: Some(100),
                },
                TransportEvent::Completed(HttpReply::new(200, r#"{"message":"OK"}"#)),
            ],
            &clock,
        );

        assert_eq!(updates.len(), 3);
        assert!(matches!(&updates[0], UploadUpdate::Progress(s) if s.percent == 50));
        assert!(matches!(&updates[1], UploadUpdate::Progress(s) if s.percent == 100));
        match &updates[2] {
            UploadUpdate::Finished(Ok(response)) => assert_eq!(response.message, "OK"),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_stream_skips_uncomputable_progress() {
        let clock = ManualClock::new();
        let updates = collect(
            vec![
                TransportEvent::Progress {
                    loaded: 10,
                    total: None,
                },
                TransportEvent::Completed(HttpReply::new(200, r#"{"message":"OK"}"#)),
            ],
            &clock,
        );
        assert_eq!(updates.len(), 1);
    }

    #[test]
    fn test_stream_failures() {
        let clock = ManualClock::new();
        let cases = [
            (
                TransportEvent::Completed(HttpReply::new(500, "boom")),
                UploadError::Server(500),
            ),
            (
                TransportEvent::Completed(HttpReply::new(200, "<html>")),
                UploadError::InvalidResponse,
            ),
            (TransportEvent::NetworkError, UploadError::Network),
            (TransportEvent::Aborted, UploadError::Aborted),
        ];

        for (event, expected) in cases {
            let updates = collect(vec![event], &clock);
            assert_eq!(updates, vec![UploadUpdate::Finished(Err(expected))]);
        }
    }

    #[test]
    fn test_stream_ends_after_terminal_event() {
        let clock = ManualClock::new();
        let updates = collect(
            vec![
                TransportEvent::Aborted,
                TransportEvent::Progress {
                    loaded: 1,
                    total: Some(1),
                },
            ],
            &clock,
        );
        assert_eq!(updates, vec![UploadUpdate::Finished(Err(UploadError::Aborted))]);
    }

    #[test]
    fn test_stream_closed_without_terminal_event() {
        let clock = ManualClock::new();
        let updates = collect(Vec::new(), &clock);
        assert_eq!(updates, vec![UploadUpdate::Finished(Err(UploadError::Network))]);
    }

    // =========================================================================
    // View Tests
    // =========================================================================

    #[test]
    fn test_view_labels() {
        let mut view = UploadView::started(3);
        assert_eq!(view.title(), "Preparing upload...");
        assert_eq!(view.files_label(), "0 of 3 files");
        assert_eq!(view.speed_label(), "0 KB/s");

        view.apply(&ProgressSample {
            loaded: 10,
            total: 20,
            percent: 50,
            speed: Some(TransferSpeed::from_kb_per_sec(2048)),
        });
        assert_eq!(view.title(), "Uploading...");
        assert_eq!(view.speed_label(), "2.0 MB/s");

        view.succeed();
        assert_eq!(view.percent, 100);
        assert_eq!(view.title(), "Upload complete!");
        assert_eq!(view.files_label(), "3 of 3 files");
    }

    #[test]
    fn test_view_failure_keeps_progress() {
        let mut view = UploadView::started(1);
        view.percent = 40;
        view.fail();
        assert!(view.visible);
        assert_eq!(view.percent, 40);
        assert_eq!(view.title(), "Upload failed!");
    }
}
