//! Notifier that writes alerts to the tracing log.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use mumii_core::geofence::Notification;
use mumii_core::ports::{Notifier, Permission};

/// Logs every notification and keeps a history of what was sent.
///
/// The permission prompt is simulated: `grant_on_request` decides the
/// outcome of [`Notifier::request_permission`].
pub struct TracingNotifier {
    permission: Mutex<Permission>,
    grant_on_request: bool,
    history: Mutex<Vec<Notification>>,
}

impl TracingNotifier {
    pub fn new(permission: Permission, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Already granted, as on a device where the user accepted earlier.
    pub fn granted() -> Self {
        Self::new(Permission::Granted, true)
    }

    /// Notifications sent so far, oldest first.
    pub fn history(&self) -> Vec<Notification> {
        lock(&self.history).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Notifier for TracingNotifier {
    fn permission(&self) -> Permission {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> Permission {
        let mut permission = lock(&self.permission);
        if *permission == Permission::Default {
            *permission = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
        }
        tracing::debug!(permission = ?*permission, "Notification permission resolved");
        *permission
    }

    fn notify(&self, notification: Notification) {
        if self.permission() != Permission::Granted {
            tracing::debug!(tag = %notification.tag, "Dropping notification without permission");
            return;
        }

        tracing::info!(
            title = %notification.title,
            tag = %notification.tag,
            url = %notification.url,
            "Notification"
        );
        lock(&self.history).push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            title: "You're near Madame Hiên!".to_string(),
            body: "Discover amazing food just 12m away. Tap to explore!".to_string(),
            tag: "restaurant-2".to_string(),
            url: "/explore?restaurant=2".to_string(),
            restaurant_id: "2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_request_resolves_default_only() {
        let notifier = TracingNotifier::new(Permission::Default, true);
        assert_eq!(notifier.request_permission().await, Permission::Granted);

        let denied = TracingNotifier::new(Permission::Denied, true);
        assert_eq!(denied.request_permission().await, Permission::Denied);
    }

    #[test]
    fn test_notify_requires_permission() {
        let notifier = TracingNotifier::new(Permission::Default, false);
        notifier.notify(notification());
        assert!(notifier.history().is_empty());

        let notifier = TracingNotifier::granted();
        notifier.notify(notification());
        assert_eq!(notifier.history(), vec![notification()]);
    }
}
