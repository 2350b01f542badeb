//! Application and panel lifecycle events.
//!
//! Panels report visibility flips here so every panel logs them with the
//! same event names.

use tracing::{debug, error, info};

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

pub fn log_panel_visibility(panel: &'static str, visible: bool) {
    if visible {
        debug!(event = "core.panel.shown", panel = panel);
    } else {
        debug!(event = "core.panel.hidden", panel = panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_events() {
        log_app_startup();
        log_app_shutdown();

        let test_error = std::io::Error::other("orders endpoint unreachable");
        log_app_error(&test_error);
    }

    #[test]
    fn test_panel_events() {
        log_panel_visibility("order_display", true);
        log_panel_visibility("order_display", false);
    }
}
