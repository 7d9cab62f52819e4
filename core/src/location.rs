//! Device location: a continuously updated "latest fix" that camera
//! captures stamp their photos with.

use tokio::sync::watch;
use tracing::debug;

use crate::model::geo::GeoCoordinate;

/// Read access to a current-location source.
///
/// The resolver takes this as an injected dependency, so tests (and the
/// CLI's simulated device) can substitute a fixed value for a real sensor
/// loop.
pub trait LocationProvider {
    /// Latest known fix, if any. `None` covers both "permission denied"
    /// and "no fix acquired yet"; the two are indistinguishable on purpose,
    /// a denied permission simply means no data.
    fn current_location(&self) -> Option<GeoCoordinate>;
}

/// Continuously updated device location. A platform sensor loop publishes
/// readings into the feed; any number of subscribers read the latest one.
#[derive(Debug)]
pub struct DeviceLocationFeed {
    tx: watch::Sender<Option<GeoCoordinate>>,
}

impl DeviceLocationFeed {
    /// A feed that has not acquired a fix yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// A feed holding an initial fix.
    pub fn with_fix(fix: GeoCoordinate) -> Self {
        let (tx, _rx) = watch::channel(Some(fix));
        Self { tx }
    }

    /// Publishes a new reading, replacing the previous one. `None` models a
    /// lost fix.
    pub fn publish(&self, fix: Option<GeoCoordinate>) {
        debug!(?fix, "device location update");
        self.tx.send_replace(fix);
    }

    /// Hands out a reader over the latest value.
    pub fn subscribe(&self) -> LocationWatch {
        LocationWatch {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for DeviceLocationFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap cloneable view of the feed's latest value.
#[derive(Debug, Clone)]
pub struct LocationWatch {
    rx: watch::Receiver<Option<GeoCoordinate>>,
}

impl LocationProvider for LocationWatch {
    fn current_location(&self) -> Option<GeoCoordinate> {
        *self.rx.borrow()
    }
}
