//! Proximity alerts: an edge-triggered geofence over a fixed set of points,
//! and the coordinator that ties it to notification permission and the
//! platform position watcher.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoSample, GeolocationError, PointOfInterest, WatchOptions, haversine_distance};
use crate::ports::{Notifier, Permission, PositionStream, PositionUpdate, PositionWatcher};

/// Demo points around Hoan Kiem, Hanoi.
pub fn default_points() -> Vec<PointOfInterest> {
    vec![
        PointOfInterest::new("1", "Bún Chả Hương Liên", 21.0285, 105.8542, 100.0),
        PointOfInterest::new("2", "Madame Hiên", 21.0245, 105.8412, 150.0),
        PointOfInterest::new("3", "Phở Gà Nghĩa Tân", 21.0375, 105.8485, 80.0),
    ]
}

/// Notification payload handed to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Platform tag; a newer notification with the same tag replaces the old one.
    pub tag: String,
    pub url: String,
    pub restaurant_id: String,
}

/// A point that was just entered.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityAlert {
    pub point: PointOfInterest,
    pub distance_m: f64,
}

impl ProximityAlert {
    pub fn notification(&self) -> Notification {
        Notification {
            title: format!("You're near {}!", self.point.name),
            body: format!(
                "Discover amazing food just {}m away. Tap to explore!",
                self.distance_m.round()
            ),
            tag: format!("restaurant-{}", self.point.id),
            url: format!("/explore?restaurant={}", self.point.id),
            restaurant_id: self.point.id.clone(),
        }
    }
}

/// Edge-triggered geofence.
///
/// A point alerts once when entered and stays silent until the position
/// leaves its radius again.
#[derive(Debug, Clone)]
pub struct GeofenceTracker {
    points: Vec<PointOfInterest>,
    nearby: HashSet<String>,
}

impl GeofenceTracker {
    pub fn new(points: Vec<PointOfInterest>) -> Self {
        Self {
            points,
            nearby: HashSet::new(),
        }
    }

    /// Update the nearby set for a new position, returning newly entered points.
    pub fn observe(&mut self, sample: &GeoSample) -> Vec<ProximityAlert> {
        let here = sample.coordinates();
        let mut alerts = Vec::new();

        for point in &self.points {
            let distance_m = haversine_distance(here, point.coordinates);

            if distance_m <= point.radius_m {
                if self.nearby.insert(point.id.clone()) {
                    alerts.push(ProximityAlert {
                        point: point.clone(),
                        distance_m,
                    });
                }
            } else {
                self.nearby.remove(&point.id);
            }
        }

        alerts
    }

    pub fn is_nearby(&self, id: &str) -> bool {
        self.nearby.contains(id)
    }

    /// Ids of the points currently inside their radius.
    pub fn nearby(&self) -> impl Iterator<Item = &str> {
        self.nearby.iter().map(String::as_str)
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn reset(&mut self) {
        self.nearby.clear();
    }
}

impl Default for GeofenceTracker {
    fn default() -> Self {
        Self::new(default_points())
    }
}

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Disabled,
    RequestingPermission,
    Tracking,
}

/// Coordinator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("Please enable notifications to receive restaurant alerts")]
    PermissionDenied,
}

/// Restaurant alerts: notification permission, position watching, and the
/// geofence, driven one position update at a time.
pub struct GeofenceCoordinator {
    notifier: Arc<dyn Notifier>,
    watcher: Arc<dyn PositionWatcher>,
    tracker: GeofenceTracker,
    state: AlertState,
    stream: Option<PositionStream>,
    last_sample: Option<GeoSample>,
    last_error: Option<GeolocationError>,
}

impl GeofenceCoordinator {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        watcher: Arc<dyn PositionWatcher>,
        tracker: GeofenceTracker,
    ) -> Self {
        Self {
            notifier,
            watcher,
            tracker,
            state: AlertState::Disabled,
            stream: None,
            last_sample: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.state == AlertState::Tracking
    }

    pub fn last_sample(&self) -> Option<&GeoSample> {
        self.last_sample.as_ref()
    }

    /// Human-readable message for the most recent acquisition failure.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.map(|e| e.to_string())
    }

    pub fn tracker(&self) -> &GeofenceTracker {
        &self.tracker
    }

    /// Ask for notification permission if needed, then start watching.
    pub async fn enable(&mut self) -> Result<(), CoordinatorError> {
        if self.is_tracking() && self.stream.is_some() {
            return Ok(());
        }

        if self.notifier.permission() != Permission::Granted {
            self.state = AlertState::RequestingPermission;

            if self.notifier.request_permission().await != Permission::Granted {
                self.state = AlertState::Disabled;
                tracing::warn!("Notification permission denied, alerts stay disabled");
                return Err(CoordinatorError::PermissionDenied);
            }
        }

        self.stream = Some(self.watcher.watch(WatchOptions::default()));
        self.last_error = None;
        self.state = AlertState::Tracking;
        tracing::info!(points = self.tracker.points().len(), "Restaurant alerts enabled");

        Ok(())
    }

    /// Stop watching and forget which points were nearby.
    pub fn disable(&mut self) {
        self.watcher.clear_watch();
        self.stream = None;
        self.tracker.reset();
        self.state = AlertState::Disabled;
        tracing::info!("Restaurant alerts disabled");
    }

    /// Process one update from the watcher; returns the alerts it fired.
    pub fn handle_update(&mut self, update: PositionUpdate) -> Vec<ProximityAlert> {
        if !self.is_tracking() {
            return Vec::new();
        }

        match update {
            Ok(sample) => {
                self.last_sample = Some(sample);
                self.last_error = None;

                let alerts = self.tracker.observe(&sample);
                for alert in &alerts {
                    tracing::debug!(
                        point = %alert.point.id,
                        distance_m = alert.distance_m,
                        "Entered restaurant zone"
                    );
                    self.notifier.notify(alert.notification());
                }
                alerts
            }
            Err(e) => {
                tracing::warn!(error = %e, "Position acquisition failed, still tracking");
                self.last_error = Some(e);
                Vec::new()
            }
        }
    }

    /// Consume the active watch until it ends. Returns immediately when not
    /// tracking. A watch that ends on its own disables the coordinator, so a
    /// later `enable()` starts a fresh one.
    pub async fn run(&mut self) {
        loop {
            let next = match self.stream.as_mut() {
                Some(stream) => stream.next().await,
                None => break,
            };

            match next {
                Some(update) => {
                    self.handle_update(update);
                }
                None => {
                    tracing::debug!("Position watch ended");
                    self.disable();
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::channel::mpsc;

    const POI: (f64, f64) = (21.0285, 105.8542);

    fn sample(lat: f64, lng: f64) -> GeoSample {
        GeoSample {
            latitude: lat,
            longitude: lng,
            accuracy: 5.0,
            timestamp: 0,
        }
    }

    fn single_point() -> GeofenceTracker {
        GeofenceTracker::new(vec![PointOfInterest::new("1", "Bún Chả", POI.0, POI.1, 100.0)])
    }

    #[test]
    fn test_alert_once_per_dwell() {
        let mut tracker = single_point();

        let alerts = tracker.observe(&sample(POI.0, POI.1));
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].distance_m < 1.0);

        assert!(tracker.observe(&sample(POI.0, POI.1)).is_empty());
        assert!(tracker.observe(&sample(POI.0, POI.1)).is_empty());
        assert!(tracker.is_nearby("1"));
    }

    #[test]
    fn test_reentry_alerts_again() {
        let mut tracker = single_point();

        assert_eq!(tracker.observe(&sample(POI.0, POI.1)).len(), 1);
        assert!(tracker.observe(&sample(21.05, 105.90)).is_empty());
        assert!(!tracker.is_nearby("1"));
        assert_eq!(tracker.observe(&sample(POI.0, POI.1)).len(), 1);
    }

    #[test]
    fn test_overlapping_points_each_alert() {
        let mut tracker = GeofenceTracker::new(vec![
            PointOfInterest::new("a", "A", 21.0, 105.0, 200.0),
            PointOfInterest::new("b", "B", 21.0005, 105.0, 200.0),
        ]);

        let alerts = tracker.observe(&sample(21.00025, 105.0));
        assert_eq!(alerts.len(), 2);
        assert_eq!(tracker.nearby().count(), 2);
    }

    #[test]
    fn test_notification_text() {
        let alert = ProximityAlert {
            point: PointOfInterest::new("2", "Madame Hiên", 21.0245, 105.8412, 150.0),
            distance_m: 42.4,
        };
        let notification = alert.notification();

        assert_eq!(notification.title, "You're near Madame Hiên!");
        assert_eq!(
            notification.body,
            "Discover amazing food just 42m away. Tap to explore!"
        );
        assert_eq!(notification.tag, "restaurant-2");
        assert_eq!(notification.url, "/explore?restaurant=2");
    }

    struct FakeNotifier {
        permission: Mutex<Permission>,
        grant_on_request: bool,
        sent: Mutex<Vec<Notification>>,
    }

    impl FakeNotifier {
        fn new(permission: Permission, grant_on_request: bool) -> Arc<Self> {
            Arc::new(Self {
                permission: Mutex::new(permission),
                grant_on_request,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        fn permission(&self) -> Permission {
            *self.permission.lock().unwrap()
        }

        async fn request_permission(&self) -> Permission {
            let outcome = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
            *self.permission.lock().unwrap() = outcome;
            outcome
        }

        fn notify(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    #[derive(Default)]
    struct FakeWatcher {
        sender: Mutex<Option<mpsc::UnboundedSender<PositionUpdate>>>,
        watches: Mutex<Vec<WatchOptions>>,
    }

    impl FakeWatcher {
        fn push(&self, update: PositionUpdate) {
            if let Some(tx) = self.sender.lock().unwrap().as_ref() {
                tx.unbounded_send(update).unwrap();
            }
        }
    }

    impl PositionWatcher for FakeWatcher {
        fn watch(&self, options: WatchOptions) -> PositionStream {
            let (tx, rx) = mpsc::unbounded();
            *self.sender.lock().unwrap() = Some(tx);
            self.watches.lock().unwrap().push(options);
            rx.boxed()
        }

        fn clear_watch(&self) {
            self.sender.lock().unwrap().take();
        }
    }

    fn coordinator(
        notifier: Arc<FakeNotifier>,
        watcher: Arc<FakeWatcher>,
    ) -> GeofenceCoordinator {
        GeofenceCoordinator::new(notifier, watcher, single_point())
    }

    #[tokio::test]
    async fn test_enable_requests_permission_then_tracks() {
        let notifier = FakeNotifier::new(Permission::Default, true);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier.clone(), watcher.clone());

        coordinator.enable().await.unwrap();

        assert_eq!(coordinator.state(), AlertState::Tracking);
        assert_eq!(notifier.permission(), Permission::Granted);
        assert_eq!(*watcher.watches.lock().unwrap(), vec![WatchOptions::default()]);
    }

    #[tokio::test]
    async fn test_enable_denied_does_not_track() {
        let notifier = FakeNotifier::new(Permission::Default, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier, watcher.clone());

        let result = coordinator.enable().await;

        assert_eq!(result, Err(CoordinatorError::PermissionDenied));
        assert_eq!(coordinator.state(), AlertState::Disabled);
        assert!(watcher.watches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_updates_notify_on_entry_only() {
        let notifier = FakeNotifier::new(Permission::Granted, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier.clone(), watcher.clone());
        coordinator.enable().await.unwrap();

        coordinator.handle_update(Ok(sample(POI.0, POI.1)));
        coordinator.handle_update(Ok(sample(POI.0, POI.1)));
        assert_eq!(notifier.sent(), 1);

        coordinator.handle_update(Ok(sample(21.05, 105.90)));
        coordinator.handle_update(Ok(sample(POI.0, POI.1)));
        assert_eq!(notifier.sent(), 2);
    }

    #[tokio::test]
    async fn test_acquisition_error_keeps_tracking() {
        let notifier = FakeNotifier::new(Permission::Granted, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier, watcher);
        coordinator.enable().await.unwrap();

        coordinator.handle_update(Err(GeolocationError::Timeout));

        assert!(coordinator.is_tracking());
        assert_eq!(
            coordinator.last_error().as_deref(),
            Some("Location request timed out")
        );

        coordinator.handle_update(Ok(sample(0.0, 0.0)));
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn test_disable_clears_nearby_and_ignores_updates() {
        let notifier = FakeNotifier::new(Permission::Granted, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier.clone(), watcher.clone());
        coordinator.enable().await.unwrap();
        coordinator.handle_update(Ok(sample(POI.0, POI.1)));

        coordinator.disable();

        assert_eq!(coordinator.state(), AlertState::Disabled);
        assert!(!coordinator.tracker().is_nearby("1"));
        assert!(watcher.sender.lock().unwrap().is_none());
        assert!(coordinator.handle_update(Ok(sample(POI.0, POI.1))).is_empty());

        coordinator.enable().await.unwrap();
        coordinator.handle_update(Ok(sample(POI.0, POI.1)));
        assert_eq!(notifier.sent(), 2);
    }

    #[tokio::test]
    async fn test_run_drains_watch_until_cleared() {
        let notifier = FakeNotifier::new(Permission::Granted, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier.clone(), watcher.clone());
        coordinator.enable().await.unwrap();

        watcher.push(Ok(sample(POI.0, POI.1)));
        watcher.push(Err(GeolocationError::PositionUnavailable));
        watcher.push(Ok(sample(POI.0, POI.1)));
        watcher.clear_watch();

        coordinator.run().await;

        assert_eq!(notifier.sent(), 1);
        assert_eq!(coordinator.last_sample().map(|s| s.latitude), Some(POI.0));
    }

    #[tokio::test]
    async fn test_ended_watch_can_be_restarted() {
        let notifier = FakeNotifier::new(Permission::Granted, false);
        let watcher = Arc::new(FakeWatcher::default());
        let mut coordinator = coordinator(notifier.clone(), watcher.clone());
        coordinator.enable().await.unwrap();
        coordinator.handle_update(Ok(sample(POI.0, POI.1)));

        watcher.clear_watch();
        coordinator.run().await;

        assert_eq!(coordinator.state(), AlertState::Disabled);
        assert!(!coordinator.tracker().is_nearby("1"));

        coordinator.enable().await.unwrap();
        assert_eq!(coordinator.state(), AlertState::Tracking);
        assert_eq!(watcher.watches.lock().unwrap().len(), 2);

        watcher.push(Ok(sample(POI.0, POI.1)));
        watcher.clear_watch();
        coordinator.run().await;
        assert_eq!(notifier.sent(), 2);
    }
}
