use log::info;
use tokio_util::sync::CancellationToken;

use crate::tray::Indicator;

/// Requests an orderly stop: hides the tray icon, then fires the cancellation
/// signal observed by the monitor loop and any in-flight watcher wait.
///
/// Idempotent: only the first call does anything. The token is never reset;
/// a later run of the monitor needs a fresh one.
pub fn request(cancel: &CancellationToken, indicator: &dyn Indicator) {
    if cancel.is_cancelled() {
        return;
    }
    info!("Stopping monitor...");
    indicator.hide();
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tray::test_support::RecordingIndicator;
    use std::sync::atomic::Ordering;

    #[test]
    fn request_cancels_token_and_hides_indicator() {
        let cancel = CancellationToken::new();
        let indicator = RecordingIndicator::new();

        request(&cancel, &indicator);

        assert!(cancel.is_cancelled());
        assert_eq!(indicator.hide_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn request_is_idempotent() {
        let cancel = CancellationToken::new();
        let indicator = RecordingIndicator::new();

        request(&cancel, &indicator);
        request(&cancel, &indicator);

        assert!(cancel.is_cancelled());
        assert_eq!(indicator.hide_calls.load(Ordering::SeqCst), 1);
    }
}
