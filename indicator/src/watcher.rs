use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use notify::event::{AccessKind, AccessMode};
use notify::{Config as NotifyConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outcome of one blocking wait on the watcher.
#[derive(Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A filesystem event marked the activity flag.
    Woken,
    /// Nothing happened within the poll interval; the caller scans anyway,
    /// which is how long-running processes that predate the watch get caught.
    TimedOut,
    /// The cancellation signal fired mid-wait.
    Cancelled,
}

/// Watches the target executable for access events and folds them into a
/// single shared "activity observed" flag plus a wake-up nudge.
///
/// The notify backend delivers events on its own thread; the flag carries the
/// signal across to the monitor task, and the channel interrupts its wait.
/// The flag is reset only before a wait is armed and read only after it
/// returns, so writer and reader never overlap on the same cycle.
pub struct ChangeWatcher {
    watcher: RecommendedWatcher,
    wake_rx: mpsc::Receiver<()>,
    activity: Arc<AtomicBool>,
    armed: Option<PathBuf>,
}

impl ChangeWatcher {
    pub fn new() -> Result<Self> {
        let activity = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&activity);
        let (wake_tx, wake_rx) = mpsc::channel::<()>(16);

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| record_event(&flag, &wake_tx, res),
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        Ok(Self { watcher, wake_rx, activity, armed: None })
    }

    /// Starts (or re-targets) the watch on `path`. No-op when already armed
    /// on the same path.
    pub fn arm(&mut self, path: &Path) -> Result<()> {
        if self.armed.as_deref() == Some(path) {
            return Ok(());
        }
        if let Some(old) = self.armed.take() {
            let _ = self.watcher.unwatch(&old);
        }
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
        debug!("Started watching: {}", path.display());
        self.armed = Some(path.to_path_buf());
        Ok(())
    }

    /// Clears the activity flag and drains stale wake-ups, so the next read
    /// only reflects events observed during the upcoming wait.
    pub fn reset(&mut self) {
        self.activity.store(false, Ordering::Release);
        while self.wake_rx.try_recv().is_ok() {}
    }

    /// Reads and clears the activity flag.
    pub fn take_activity(&self) -> bool {
        self.activity.swap(false, Ordering::AcqRel)
    }

    /// Suspends the current task until an event arrives, `poll_interval`
    /// elapses, or `cancel` fires — whichever comes first.
    pub async fn wait(
        &mut self,
        cancel: &CancellationToken,
        poll_interval: Duration,
    ) -> WaitOutcome {
        tokio::select! {
            _ = cancel.cancelled() => WaitOutcome::Cancelled,
            _ = self.wake_rx.recv() => WaitOutcome::Woken,
            _ = tokio::time::sleep(poll_interval) => WaitOutcome::TimedOut,
        }
    }
}

/// Callback body, kept free-standing so the classification and flag
/// semantics are unit-testable without a live inotify session.
fn record_event(
    flag: &AtomicBool,
    wake_tx: &mpsc::Sender<()>,
    res: notify::Result<notify::Event>,
) {
    match res {
        Ok(event) if is_activity(&event.kind) => {
            debug!("Executable activity: {:?} on {:?}", event.kind, event.paths);
            flag.store(true, Ordering::Release);
            // A full channel is fine: the flag already holds the signal.
            let _ = wake_tx.try_send(());
        }
        Ok(_) => {}
        Err(e) => warn!("Watch error: {e}"),
    }
}

/// Event kinds treated as "this executable just ran": opened for read or
/// execute, read, or closed without having been written to. Writes and
/// metadata churn (e.g. a package upgrade touching the binary) are ignored.
pub fn is_activity(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Access(
            AccessKind::Any
                | AccessKind::Read
                | AccessKind::Open(_)
                | AccessKind::Close(AccessMode::Any | AccessMode::Read | AccessMode::Execute)
        )
    )
}
