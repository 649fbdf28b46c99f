use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::time::{Duration, interval};

use crate::core::EmbeddedTags;

/// Interval between simulated progress advances
pub const PROGRESS_TICK: Duration = Duration::from_millis(300);
/// Simulated progress never passes this until the real response arrives
const SIMULATED_CAP: u8 = 90;
/// Varying step sizes so the simulated progress reads naturally
const STEPS: [u8; 8] = [3, 5, 2, 6, 4, 7, 3, 5];

/// Download lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    Complete,
    Failed,
}

/// One in-flight or completed download. Created per trigger, reset when the
/// input changes or a new download starts.
#[derive(Debug, Default)]
pub struct DownloadSession {
    pub state: DownloadState,
    progress: Arc<AtomicU8>,
    pub artifact: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub tags: Option<EmbeddedTags>,
}

impl DownloadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    /// Shared progress cell, for tickers and UI surfaces observing the session
    pub fn progress_handle(&self) -> Arc<AtomicU8> {
        self.progress.clone()
    }

    /// Back to a fresh idle session. The progress cell is zeroed, not
    /// replaced, so observers holding a handle keep seeing the session.
    pub fn reset(&mut self) {
        self.state = DownloadState::Idle;
        self.progress.store(0, Ordering::Relaxed);
        self.artifact = None;
        self.filename = None;
        self.tags = None;
    }

    pub(crate) fn fail(&mut self) {
        self.state = DownloadState::Failed;
        self.artifact = None;
        self.filename = None;
    }

    pub(crate) fn complete(
        &mut self,
        artifact: Vec<u8>,
        filename: String,
        tags: Option<EmbeddedTags>,
    ) {
        self.artifact = Some(artifact);
        self.filename = Some(filename);
        self.tags = tags;
        self.progress.store(100, Ordering::Relaxed);
        self.state = DownloadState::Complete;
    }
}

/// Advances a shared progress percentage on a timer while the network does the
/// real work. Cancelled on every exit path; dropping it stops the task too.
pub(crate) struct ProgressTicker {
    stop: Arc<AtomicBool>,
    progress: Arc<AtomicU8>,
}

impl ProgressTicker {
    pub fn start(progress: Arc<AtomicU8>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let task_stop = stop.clone();
        let task_progress = progress.clone();

        tokio::spawn(async move {
            let mut ticker = interval(PROGRESS_TICK);
            // The first tick of a tokio interval fires immediately
            ticker.tick().await;
            let mut ticks = 0usize;
            loop {
                ticker.tick().await;
                if task_stop.load(Ordering::Relaxed) {
                    break;
                }
                let step = STEPS[ticks % STEPS.len()];
                ticks += 1;
                let current = task_progress.load(Ordering::Relaxed);
                if current < SIMULATED_CAP {
                    let next = current.saturating_add(step).min(SIMULATED_CAP);
                    task_progress.store(next, Ordering::Relaxed);
                }
            }
        });

        Self { stop, progress }
    }

    /// The real response arrived: stop simulating and jump to 100
    pub fn finish(self) {
        self.stop.store(true, Ordering::Relaxed);
        self.progress.store(100, Ordering::Relaxed);
    }

    /// Stop simulating, leaving the percentage where it is
    pub fn cancel(self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
