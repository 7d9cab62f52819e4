//! Per-source location resolution, run once at photo acquisition time.

use tracing::debug;

use crate::location::LocationProvider;
use crate::metadata;
use crate::model::geo::GeoCoordinate;
use crate::model::photo::{Photo, PhotoSource};

/// Derives a best-effort location for a freshly acquired photo.
///
/// The two acquisition paths resolve differently and are never mixed:
/// library picks use the positioning metadata embedded in the image, camera
/// captures use the device's latest fix. A library photo without metadata
/// resolves to no location even when the device currently has a fix, and a
/// camera capture never reads image metadata.
pub struct LocationResolver<P: LocationProvider> {
    device_location: P,
}

impl<P: LocationProvider> LocationResolver<P> {
    pub fn new(device_location: P) -> Self {
        Self { device_location }
    }

    /// Resolves a photo's location. `None` is a normal outcome, not a
    /// failure.
    pub fn resolve(&self, photo: &Photo) -> Option<GeoCoordinate> {
        let location = match photo.source() {
            PhotoSource::Library => metadata::photo_location(photo.data()),
            PhotoSource::Camera => self.device_location.current_location(),
        };
        debug!(source = %photo.source(), ?location, "resolved photo location");
        location
    }
}
