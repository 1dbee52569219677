//! Desktop notifications via notify-rust

use notify_rust::Notification;
use tidings_core::reminder::{NotificationOptions, Notifier, NotifyError, Permission};
use tracing::debug;

const APP_NAME: &str = "Tidings";

/// Shows reminders as native desktop notifications
///
/// Desktop notification servers have no permission prompt, so permission
/// comes from the user's configuration.
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn show(&self, title: &str, options: &NotificationOptions) -> Result<(), NotifyError> {
        let mut notification = Notification::new();
        notification.appname(APP_NAME).summary(title).body(&options.body);
        if let Some(icon) = &options.icon {
            notification.icon(icon);
        }

        debug!(tag = %options.tag, "showing desktop notification");
        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::from(e.to_string()))
    }
}
