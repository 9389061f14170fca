use crate::app::DesktopNotice;

/// Pop a desktop notification for a finished test run.
#[cfg(feature = "desktop-notify")]
pub fn send_desktop(notice: &DesktopNotice) {
    use notify_rust::{Notification, Urgency};

    let (icon, urgency) = if notice.success {
        ("dialog-information", Urgency::Normal)
    } else {
        ("dialog-error", Urgency::Critical)
    };

    if let Err(e) = Notification::new()
        .summary(&notice.title)
        .body(&notice.body)
        .icon(icon)
        .urgency(urgency)
        .show()
    {
        tracing::debug!("desktop notification failed: {e}");
    }
}

#[cfg(not(feature = "desktop-notify"))]
pub fn send_desktop(notice: &DesktopNotice) {
    tracing::debug!(title = %notice.title, "desktop notifications not compiled in");
}
