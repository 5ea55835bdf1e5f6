//! Position watcher fed through a channel.

use std::sync::{Mutex, MutexGuard};

use futures::StreamExt;
use tokio::sync::mpsc;

use mumii_core::geo::WatchOptions;
use mumii_core::ports::{PositionStream, PositionUpdate, PositionWatcher};

/// Relays position updates pushed by the host (a platform callback or a
/// background-sync message) into the coordinator's watch stream.
///
/// Only one watch is active at a time; starting a new one ends the previous
/// stream.
#[derive(Default)]
pub struct ChannelPositionWatcher {
    sender: Mutex<Option<mpsc::UnboundedSender<PositionUpdate>>>,
    last_options: Mutex<Option<WatchOptions>>,
}

impl ChannelPositionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward an update to the active watch. Returns false when nothing is
    /// watching.
    pub fn push(&self, update: PositionUpdate) -> bool {
        match lock(&self.sender).as_ref() {
            Some(tx) => tx.send(update).is_ok(),
            None => false,
        }
    }

    pub fn is_watching(&self) -> bool {
        lock(&self.sender).as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Options of the most recent watch.
    pub fn last_options(&self) -> Option<WatchOptions> {
        *lock(&self.last_options)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PositionWatcher for ChannelPositionWatcher {
    fn watch(&self, options: WatchOptions) -> PositionStream {
        let (tx, rx) = mpsc::unbounded_channel();
        *lock(&self.sender) = Some(tx);

        tracing::debug!(
            high_accuracy = options.high_accuracy,
            timeout_ms = options.timeout.as_millis() as u64,
            "Position watch started"
        );
        *lock(&self.last_options) = Some(options);

        futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|update| (update, rx))
        })
        .boxed()
    }

    fn clear_watch(&self) {
        if lock(&self.sender).take().is_some() {
            tracing::debug!("Position watch cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mumii_core::geo::{GeoSample, GeolocationError};

    fn sample() -> GeoSample {
        GeoSample {
            latitude: 21.0285,
            longitude: 105.8542,
            accuracy: 5.0,
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_push_reaches_stream_until_cleared() {
        let watcher = ChannelPositionWatcher::new();
        assert!(!watcher.push(Ok(sample())));

        let mut stream = watcher.watch(WatchOptions::default());
        assert!(watcher.is_watching());
        assert!(watcher.push(Ok(sample())));
        assert!(watcher.push(Err(GeolocationError::Timeout)));

        watcher.clear_watch();

        assert_eq!(stream.next().await, Some(Ok(sample())));
        assert_eq!(stream.next().await, Some(Err(GeolocationError::Timeout)));
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn test_records_options() {
        let watcher = ChannelPositionWatcher::new();
        let _stream = watcher.watch(WatchOptions::default());
        assert_eq!(watcher.last_options(), Some(WatchOptions::default()));
    }
}
