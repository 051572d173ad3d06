use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{debug, error, info, warn};
use sysinfo::Pid;
use tokio_util::sync::CancellationToken;

use crate::procs::ProcessMatcher;
use crate::shutdown;
use crate::tray::Indicator;
use crate::watcher::{ChangeWatcher, WaitOutcome};

/// How often liveness is re-evaluated when no filesystem event arrives.
/// Also bounds how long a shutdown request can go unobserved.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Liveness verdict shown in the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Before the first evaluation; never re-entered.
    None,
    /// At least one matching process is alive.
    Up,
    /// No matching process exists.
    Down,
}

/// Side effects one evaluation asks the caller to perform.
pub struct CycleEffects {
    /// `Some` when the icon must be swapped to the new status.
    pub icon: Option<Status>,
    /// Pids first seen during the current UP period, one notification each.
    pub new_pids: Vec<u32>,
}

/// The UP/DOWN state machine: turns a scan result into a verdict and tracks
/// which pids were already announced during the current UP period.
///
/// Owned exclusively by the monitor loop; nothing else reads or writes the
/// status.
pub struct StatusController {
    status: Status,
    seen: HashSet<u32>,
}

impl StatusController {
    pub fn new() -> Self {
        Self { status: Status::None, seen: HashSet::new() }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Folds one scan result into the state machine.
    ///
    /// Repeated identical results are idempotent: no icon swap, no duplicate
    /// notification for an already-known pid. The seen-pid set is cleared on
    /// every entry into [`Status::Up`], so a DOWN→UP cycle re-announces
    /// survivors even if the OS reused a pid in between.
    pub fn evaluate(&mut self, found: &[Pid]) -> CycleEffects {
        let next = if found.is_empty() { Status::Down } else { Status::Up };
        let icon = (next != self.status).then_some(next);

        if next == Status::Up && self.status != Status::Up {
            self.seen.clear();
        }

        let mut new_pids = Vec::new();
        if next == Status::Up {
            for pid in found {
                let raw = pid.as_u32();
                if self.seen.insert(raw) {
                    new_pids.push(raw);
                }
            }
        }

        self.status = next;
        CycleEffects { icon, new_pids }
    }
}

/// Entry point of the monitor worker task. Runs until `cancel` fires.
///
/// Combines two detection signals per cycle: filesystem access events on the
/// target binary catch transient executions shorter than the poll interval,
/// while the periodic process scan catches long-running processes whose start
/// the watch missed. Neither alone is sufficient.
pub async fn run(process_name: String, indicator: Arc<dyn Indicator>, cancel: CancellationToken) {
    let mut matcher = ProcessMatcher::new();
    let mut controller = StatusController::new();
    let mut watcher = match ChangeWatcher::new() {
        Ok(w) => Some(w),
        Err(e) => {
            warn!("File watching unavailable, polling only: {e:#}");
            None
        }
    };
    let mut watch_failed = false;

    info!("Detecting process: {process_name}");

    while !cancel.is_cancelled() {
        let cycle = run_cycle(
            &process_name,
            &mut matcher,
            &mut controller,
            watcher.as_mut(),
            &mut watch_failed,
            indicator.as_ref(),
            &cancel,
        )
        .await;

        if let Err(e) = cycle {
            // Anything unexpected escaping a cycle requests the same orderly
            // shutdown as the Exit menu item instead of dying silently.
            error!("Monitor cycle failed: {e:#}");
            shutdown::request(&cancel, indicator.as_ref());
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }

    info!("Monitor loop stopped");
}

/// One watch-scan-toggle iteration.
async fn run_cycle(
    process_name: &str,
    matcher: &mut ProcessMatcher,
    controller: &mut StatusController,
    watcher: Option<&mut ChangeWatcher>,
    watch_failed: &mut bool,
    indicator: &dyn Indicator,
    cancel: &CancellationToken,
) -> Result<()> {
    if let Some(watcher) = watcher {
        watcher.reset();
        arm_on_target(watcher, process_name, watch_failed);

        if watcher.wait(cancel, POLL_INTERVAL).await == WaitOutcome::Cancelled {
            return Ok(());
        }
        if watcher.take_activity() {
            info!("Executable activity observed for: {process_name}");
        }
    }

    debug!("Detecting process: {process_name} | {:?}", controller.status());
    let found = matcher.find(process_name);
    let effects = controller.evaluate(&found);
    apply_effects(process_name, &effects, indicator);

    Ok(())
}

/// Applies one cycle's side effects: swaps the icon on a transition and
/// announces each newly seen pid. Notifications are capability-gated; a
/// toolkit without popup support still gets the icon swap and the log lines.
fn apply_effects(process_name: &str, effects: &CycleEffects, indicator: &dyn Indicator) {
    if let Some(status) = effects.icon {
        indicator.set_status(status);
        if status == Status::Down {
            info!("Process NOT found: {process_name}");
        }
    }
    for pid in &effects.new_pids {
        info!("Process found: {process_name} with PID {pid}");
        if indicator.has_notifications() {
            indicator.notify(&format!("{process_name} with PID: {pid} detected!"));
        }
    }
}

/// Resolves the target name on PATH and (re-)arms the watch on the binary.
///
/// Failure is non-fatal: the cycle continues in poll-only mode. The failure
/// is logged once per streak rather than once per second.
fn arm_on_target(watcher: &mut ChangeWatcher, process_name: &str, watch_failed: &mut bool) {
    let outcome = which::which(process_name)
        .map_err(anyhow::Error::from)
        .and_then(|path| watcher.arm(&path));

    match outcome {
        Ok(()) => *watch_failed = false,
        Err(e) => {
            if !*watch_failed {
                warn!("Could not arm watch for '{process_name}': {e:#}");
                *watch_failed = true;
            }
        }
    }
}
