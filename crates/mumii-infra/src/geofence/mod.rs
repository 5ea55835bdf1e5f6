//! Platform adapters for the geofence coordinator.

mod notifier;
mod watcher;

pub use notifier::TracingNotifier;
pub use watcher::ChannelPositionWatcher;
