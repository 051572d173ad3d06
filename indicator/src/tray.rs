use log::info;

use crate::monitor::Status;

/// Interface to the tray toolkit.
///
/// The toolkit owns its own event loop and may invoke menu callbacks on any
/// thread, so implementations must be `Send + Sync`. The monitor only ever
/// asks for an icon swap, a notification, or to disappear.
pub trait Indicator: Send + Sync {
    /// Swaps the displayed status icon: green-up for [`Status::Up`],
    /// red-down for [`Status::Down`].
    fn set_status(&self, status: Status);

    /// Whether the toolkit can show notification popups. Callers must check
    /// this before calling [`Indicator::notify`].
    fn has_notifications(&self) -> bool;

    /// Shows a one-line notification popup.
    fn notify(&self, message: &str);

    /// Hides the tray icon. Called once during shutdown.
    fn hide(&self);
}

/// Frontend used when no tray toolkit is wired in: icon swaps and
/// notifications become log lines.
pub struct ConsoleIndicator;

impl Indicator for ConsoleIndicator {
    fn set_status(&self, status: Status) {
        match status {
            Status::Up => info!("Icon: green arrow up"),
            Status::Down => info!("Icon: red arrow down"),
            Status::None => {}
        }
    }

    fn has_notifications(&self) -> bool {
        true
    }

    fn notify(&self, message: &str) {
        info!("Notification: {message}");
    }

    fn hide(&self) {
        info!("Icon hidden");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every call so tests can assert on icon swaps and notifications.
    pub struct RecordingIndicator {
        notifications_supported: bool,
        pub icons: Mutex<Vec<Status>>,
        pub notifications: Mutex<Vec<String>>,
        pub hide_calls: AtomicUsize,
    }

    impl RecordingIndicator {
        pub fn new() -> Self {
            Self {
                notifications_supported: true,
                icons: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
                hide_calls: AtomicUsize::new(0),
            }
        }

        pub fn without_notifications() -> Self {
            Self { notifications_supported: false, ..Self::new() }
        }
    }

    impl Indicator for RecordingIndicator {
        fn set_status(&self, status: Status) {
            self.icons.lock().unwrap().push(status);
        }

        fn has_notifications(&self) -> bool {
            self.notifications_supported
        }

        fn notify(&self, message: &str) {
            self.notifications.lock().unwrap().push(message.to_string());
        }

        fn hide(&self) {
            self.hide_calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}
