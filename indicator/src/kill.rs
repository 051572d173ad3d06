use std::time::Duration;

use log::info;

use crate::procs::ProcessMatcher;
use crate::tray::Indicator;

/// Pause between kill passes, giving the OS time to reap before rescanning.
const RESCAN_DELAY: Duration = Duration::from_secs(1);

/// Terminates every process matching `target`, rescanning until none remain.
///
/// Pids accumulate across passes, so a process that relaunches itself during
/// teardown is killed again and still reported once. Kill requests are
/// fire-and-forget; a failed kill simply leaves the process visible to the
/// next scan. Emits a single notification listing all terminated pids.
pub async fn kill_all(target: &str, indicator: &dyn Indicator) -> Vec<u32> {
    let mut matcher = ProcessMatcher::new();
    let mut killed: Vec<u32> = Vec::new();

    loop {
        let found = matcher.find(target);
        if found.is_empty() {
            break;
        }
        for pid in found {
            info!("Killing process: {target} with PID: {pid}");
            if matcher.kill(pid) {
                info!("Done!");
            }
            let raw = pid.as_u32();
            if !killed.contains(&raw) {
                killed.push(raw);
            }
        }
        tokio::time::sleep(RESCAN_DELAY).await;
    }

    if killed.is_empty() {
        info!("Process '{target}' not found. Continuing watching...");
    } else {
        info!("Killed {} process(es) named '{target}'", killed.len());
        if indicator.has_notifications() {
            indicator.notify(&kill_notification(target, &killed));
        }
    }
    killed
}

/// The single post-teardown notification listing every terminated pid.
fn kill_notification(target: &str, killed: &[u32]) -> String {
    let pids = killed
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Killed process: {target} with PID(s): {pids}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tray::test_support::RecordingIndicator;

    #[tokio::test]
    async fn kill_all_with_no_matches_returns_empty_and_stays_quiet() {
        let indicator = RecordingIndicator::new();
        let killed = kill_all("definitely-not-a-real-process-1f2e3d", &indicator).await;
        assert!(killed.is_empty());
        assert!(indicator.notifications.lock().unwrap().is_empty());
        assert!(indicator.icons.lock().unwrap().is_empty());
    }

    // ── kill_notification ─────────────────────────────────────────────────────

    #[test]
    fn notification_lists_both_pids_when_two_processes_share_the_name() {
        assert_eq!(
            kill_notification("firefox", &[101, 202]),
            "Killed process: firefox with PID(s): 101, 202"
        );
    }

    #[test]
    fn notification_for_a_single_pid_has_no_trailing_separator() {
        assert_eq!(
            kill_notification("firefox", &[42]),
            "Killed process: firefox with PID(s): 42"
        );
    }
}
