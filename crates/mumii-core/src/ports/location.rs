//! Platform ports for notifications and position watching.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::geo::{GeoSample, GeolocationError, WatchOptions};
use crate::geofence::Notification;

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Never asked.
    Default,
    Granted,
    Denied,
}

/// Permission-gated notification emitter.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Current permission without prompting.
    fn permission(&self) -> Permission;

    /// Prompt for permission and return the outcome.
    async fn request_permission(&self) -> Permission;

    /// Show a notification. Fire-and-forget: delivery is not confirmed.
    fn notify(&self, notification: Notification);
}

/// A position fix or an acquisition failure.
pub type PositionUpdate = Result<GeoSample, GeolocationError>;

/// Continuous stream of position updates from one watch.
pub type PositionStream = BoxStream<'static, PositionUpdate>;

/// Continuous position watching.
pub trait PositionWatcher: Send + Sync {
    /// Start watching. The stream ends once the watch is cleared.
    fn watch(&self, options: WatchOptions) -> PositionStream;

    /// Stop the active watch, if any.
    fn clear_watch(&self);
}
