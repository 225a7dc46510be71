//! Progress notifications for a submission
//!
//! The percentages are cosmetic: a ticker advances them on a timer while the
//! request and the upload are in flight. They say nothing about bytes sent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Interval between cosmetic progress steps
pub const DEFAULT_PROGRESS_TICK: Duration = Duration::from_millis(100);

const PROGRESS_STEP: u8 = 10;
const PROGRESS_CAP: u8 = 90;

/// What a subscriber is told about a running submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The submission began
    Started,
    /// Cosmetic percentage, never above 90
    InProgress(u8),
    /// The upload succeeded
    Complete,
    /// The submission ended in failure
    Failed,
}

/// Receives progress events, e.g. to drive a progress bar
pub trait ProgressReporter: Send + Sync {
    /// Called for every event, in order
    fn report(&self, event: ProgressEvent);
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes events to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started => tracing::info!("Uploading..."),
            ProgressEvent::InProgress(percent) => tracing::debug!("Uploading... {percent}%"),
            ProgressEvent::Complete => tracing::info!("Complete!"),
            ProgressEvent::Failed => tracing::warn!("Upload failed"),
        }
    }
}

/// Forwards events to an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelReporter {
    /// Creates a reporter and the receiving end of its channel
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.sender.send(event);
    }
}

/// Timer driven progress for one submission
///
/// All events after `Started` are emitted from the ticker task, so the final
/// event is always the last one a reporter sees.
pub struct CosmeticProgress {
    finish: Option<oneshot::Sender<ProgressEvent>>,
    handle: Option<JoinHandle<()>>,
}

impl CosmeticProgress {
    /// Reports `Started` and spawns the ticker
    #[must_use]
    pub fn start(reporter: Arc<dyn ProgressReporter>, tick: Duration) -> Self {
        reporter.report(ProgressEvent::Started);

        let (finish, mut finished) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick completes immediately
            interval.tick().await;

            let mut percent = 0;
            loop {
                tokio::select! {
                    outcome = &mut finished => {
                        if let Ok(event) = outcome {
                            reporter.report(event);
                        }
                        break;
                    }
                    _ = interval.tick(), if percent < PROGRESS_CAP => {
                        percent = (percent + PROGRESS_STEP).min(PROGRESS_CAP);
                        reporter.report(ProgressEvent::InProgress(percent));
                    }
                }
            }
        });

        Self {
            finish: Some(finish),
            handle: Some(handle),
        }
    }

    /// Stops the ticker after reporting `Complete`
    pub async fn complete(self) {
        self.finish_with(ProgressEvent::Complete).await;
    }

    /// Stops the ticker after reporting `Failed`
    pub async fn fail(self) {
        self.finish_with(ProgressEvent::Failed).await;
    }

    async fn finish_with(mut self, event: ProgressEvent) {
        if let Some(finish) = self.finish.take() {
            let _ = finish.send(event);
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Progress ticker ended abnormally: {e}");
            }
        }
    }
}

impl Drop for CosmeticProgress {
    /// A submission abandoned before it finished counts as failed: the ticker
    /// is told to report `Failed` and then exits on its own.
    fn drop(&mut self) {
        if let Some(finish) = self.finish.take() {
            let _ = finish.send(ProgressEvent::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(mut receiver: mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_climbs_and_caps_at_ninety() {
        let (reporter, receiver) = ChannelReporter::new();
        let progress = CosmeticProgress::start(Arc::new(reporter), DEFAULT_PROGRESS_TICK);

        tokio::time::sleep(Duration::from_secs(5)).await;
        progress.complete().await;

        let events = drain(receiver).await;
        let mut expected = vec![ProgressEvent::Started];
        expected.extend((1..=9).map(|step| ProgressEvent::InProgress(step * 10)));
        expected.push(ProgressEvent::Complete);
        assert_eq!(events, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_the_last_event() {
        let (reporter, receiver) = ChannelReporter::new();
        let progress = CosmeticProgress::start(Arc::new(reporter), DEFAULT_PROGRESS_TICK);

        tokio::time::sleep(Duration::from_millis(250)).await;
        progress.fail().await;

        let events = drain(receiver).await;
        assert_eq!(events.first(), Some(&ProgressEvent::Started));
        assert_eq!(events.last(), Some(&ProgressEvent::Failed));
        assert!(events.contains(&ProgressEvent::InProgress(20)));
        assert!(!events.contains(&ProgressEvent::Complete));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_progress_reports_failure() {
        let (reporter, receiver) = ChannelReporter::new();
        let progress = CosmeticProgress::start(Arc::new(reporter), DEFAULT_PROGRESS_TICK);

        tokio::time::sleep(Duration::from_millis(350)).await;
        drop(progress);

        let events = drain(receiver).await;
        assert_eq!(events.first(), Some(&ProgressEvent::Started));
        assert_eq!(events.last(), Some(&ProgressEvent::Failed));
        assert_eq!(
            events.iter().filter(|e| **e == ProgressEvent::Failed).count(),
            1
        );
        assert!(!events.contains(&ProgressEvent::Complete));
    }

    #[tokio::test]
    async fn test_immediate_completion() {
        let (reporter, receiver) = ChannelReporter::new();
        let progress = CosmeticProgress::start(Arc::new(reporter), Duration::from_secs(60));

        progress.complete().await;

        assert_eq!(
            drain(receiver).await,
            vec![ProgressEvent::Started, ProgressEvent::Complete]
        );
    }
}
