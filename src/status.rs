//! Visible status of the current app: a heartbeat while healthy, an error
//! indicator and message once an error is latched.

use crate::time::TimeInstant;
use crate::types::AppResult;

/// Trait for abstracting the status display and the two signaling LEDs.
///
/// Implement this for the board's OLED and indicator LEDs. None of the
/// methods can fail; handle hardware errors internally.
pub trait StatusIndicator {
    /// Shows the app's display label and the labels of the X and Y buttons.
    fn show_app(&mut self, label: &str, hint_x: &str, hint_y: &str);

    /// Switches the heartbeat (green) indicator on or off.
    fn set_heartbeat(&mut self, on: bool);

    /// Flips the heartbeat indicator.
    fn toggle_heartbeat(&mut self);

    /// Switches the error (red) indicator on or off.
    fn set_error(&mut self, on: bool);

    /// Shows a short error message on the display.
    fn show_error(&mut self, message: &str);
}

/// Heartbeat and error bookkeeping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusPresenter<I: TimeInstant> {
    heartbeat_ms: u64,
    last_heartbeat: I,
    last_error: I,
}

impl<I: TimeInstant> StatusPresenter<I> {
    pub(crate) fn new(heartbeat_ms: u64, now: I) -> Self {
        Self {
            heartbeat_ms,
            last_heartbeat: now,
            last_error: now,
        }
    }

    /// Shows a freshly started app with both indicators reset and the first heartbeat on.
    pub(crate) fn announce<S: StatusIndicator>(
        &mut self,
        indicator: &mut S,
        now: I,
        label: &str,
        hints: (&str, &str),
    ) {
        indicator.show_app(label, hints.0, hints.1);
        indicator.set_heartbeat(false);
        indicator.set_error(false);
        indicator.set_heartbeat(true);
        self.last_heartbeat = now;
    }

    /// Presents the outcome of a start or step.
    ///
    /// Never changes `result`; only records when an error was last seen.
    pub(crate) fn present<S: StatusIndicator>(
        &mut self,
        indicator: &mut S,
        now: I,
        name: &str,
        result: AppResult,
    ) {
        if let Err(err) = result {
            self.last_error = now;
            indicator.set_heartbeat(false);
            indicator.set_error(true);
            error!("apps: ERROR in app '{}': {}", name, err);
            indicator.show_error(err.short());
            return;
        }

        if now.elapsed_more_than(self.last_heartbeat, self.heartbeat_ms) {
            indicator.toggle_heartbeat();
            self.last_heartbeat = now;
        }
    }

    /// Returns true when the latched error is older than `timeout_ms`.
    pub(crate) fn error_expired(&self, now: I, timeout_ms: u64) -> bool {
        now.elapsed_more_than(self.last_error, timeout_ms)
    }
}
