//! Positioning metadata extraction for library photos.
//!
//! Library picks carry their location (if any) inside the image's EXIF
//! block. Extraction is strictly best-effort: most screenshots, edited
//! exports and messenger-shared images have no GPS block at all, and that
//! is a normal outcome rather than a failure.

use std::io::Cursor;

use exif::{In, Tag, Value};
use tracing::debug;

use crate::model::geo::GeoCoordinate;

/// Reads the embedded GPS position from a JPEG or TIFF payload.
///
/// Returns `None` when the payload has no readable EXIF block, when either
/// coordinate is missing or malformed, or when the recorded values fall
/// outside the valid degree ranges.
pub fn photo_location(data: &[u8]) -> Option<GeoCoordinate> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok()?;

    let latitude = dms_degrees(exif.get_field(Tag::GPSLatitude, In::PRIMARY)?)?;
    let longitude = dms_degrees(exif.get_field(Tag::GPSLongitude, In::PRIMARY)?)?;

    // Hemisphere markers are optional in the wild; readers conventionally
    // assume N and E when they are absent.
    let south = hemisphere(exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY)) == Some('S');
    let west = hemisphere(exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY)) == Some('W');

    let latitude = if south { -latitude } else { latitude };
    let longitude = if west { -longitude } else { longitude };

    let location = GeoCoordinate::checked(latitude, longitude);
    if location.is_none() {
        debug!(latitude, longitude, "discarding out-of-range gps metadata");
    }
    location
}

/// Folds an EXIF degree/minute/second rational triplet into decimal
/// degrees. Encoders that write fewer than three components get the missing
/// ones counted as zero; a zero denominator makes the field malformed.
fn dms_degrees(field: &exif::Field) -> Option<f64> {
    let parts = match field.value {
        Value::Rational(ref parts) => parts,
        _ => return None,
    };
    if parts.is_empty() {
        return None;
    }

    const SCALE: [f64; 3] = [1.0, 60.0, 3600.0];
    let mut degrees = 0.0;
    for (part, scale) in parts.iter().zip(SCALE) {
        if part.denom == 0 {
            return None;
        }
        degrees += part.to_f64() / scale;
    }
    Some(degrees)
}

/// First character of a hemisphere reference field ("N", "S", "E" or "W").
fn hemisphere(field: Option<&exif::Field>) -> Option<char> {
    match field?.value {
        Value::Ascii(ref text) => text
            .first()
            .and_then(|s| s.first())
            .map(|b| b.to_ascii_uppercase() as char),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::testdata::{dms, tiff_without_gps, GpsExif};
    use super::*;

    #[test]
    fn extracts_north_east_coordinates() {
        let image = GpsExif::full(dms(35, 0, 0, 1), b'N', dms(139, 0, 0, 1), b'E').to_tiff();
        let location = photo_location(&image).unwrap();
        assert_eq!(location.latitude, 35.0);
        assert_eq!(location.longitude, 139.0);
    }

    #[test]
    fn hemisphere_refs_set_the_sign_per_axis() {
        let image = GpsExif::full(dms(37, 0, 0, 1), b'N', dms(122, 0, 0, 1), b'W').to_tiff();
        let location = photo_location(&image).unwrap();
        assert_eq!(location.latitude, 37.0);
        assert_eq!(location.longitude, -122.0);

        let image = GpsExif::full(dms(37, 0, 0, 1), b'S', dms(122, 0, 0, 1), b'E').to_tiff();
        let location = photo_location(&image).unwrap();
        assert_eq!(location.latitude, -37.0);
        assert_eq!(location.longitude, 122.0);
    }

    #[test]
    fn southern_and_western_hemispheres_negate() {
        let image = GpsExif::full(dms(33, 52, 0, 1), b'S', dms(151, 12, 0, 1), b'W').to_tiff();
        let location = photo_location(&image).unwrap();
        assert!(location.latitude < 0.0);
        assert!(location.longitude < 0.0);
        assert!((location.latitude + 33.0 + 52.0 / 60.0).abs() < 1e-9);
        assert!((location.longitude + 151.2).abs() < 1e-9);
    }

    #[test]
    fn folds_minutes_and_seconds_into_degrees() {
        let image = GpsExif::full(dms(47, 36, 54, 1), b'N', dms(122, 19, 59, 2), b'E').to_tiff();
        let location = photo_location(&image).unwrap();
        assert!((location.latitude - (47.0 + 36.0 / 60.0 + 54.0 / 3600.0)).abs() < 1e-9);
        assert!((location.longitude - (122.0 + 19.0 / 60.0 + 29.5 / 3600.0)).abs() < 1e-9);
    }

    #[test]
    fn missing_hemisphere_refs_default_to_north_east() {
        let block = GpsExif {
            latitude: Some(dms(10, 30, 0, 1)),
            longitude: Some(dms(20, 0, 0, 1)),
            ..GpsExif::default()
        };
        let location = photo_location(&block.to_tiff()).unwrap();
        assert!((location.latitude - 10.5).abs() < 1e-9);
        assert_eq!(location.longitude, 20.0);
    }

    #[test]
    fn lowercase_refs_are_accepted() {
        let image = GpsExif::full(dms(10, 0, 0, 1), b's', dms(20, 0, 0, 1), b'w').to_tiff();
        let location = photo_location(&image).unwrap();
        assert_eq!(location.latitude, -10.0);
        assert_eq!(location.longitude, -20.0);
    }

    #[test]
    fn reads_jpeg_containers_too() {
        let image = GpsExif::full(dms(35, 0, 0, 1), b'N', dms(139, 0, 0, 1), b'E').to_jpeg();
        let location = photo_location(&image).unwrap();
        assert_eq!(location.latitude, 35.0);
        assert_eq!(location.longitude, 139.0);
    }

    #[test]
    fn image_without_gps_block_has_no_location() {
        assert_eq!(photo_location(&tiff_without_gps()), None);
    }

    #[test]
    fn missing_longitude_yields_none() {
        let block = GpsExif {
            latitude: Some(dms(35, 0, 0, 1)),
            latitude_ref: Some(b'N'),
            ..GpsExif::default()
        };
        assert_eq!(photo_location(&block.to_tiff()), None);
    }

    #[test]
    fn zero_denominator_is_malformed() {
        let image = GpsExif::full(dms(35, 0, 0, 0), b'N', dms(139, 0, 0, 1), b'E').to_tiff();
        assert_eq!(photo_location(&image), None);
    }

    #[test]
    fn out_of_range_coordinates_are_discarded() {
        let image = GpsExif::full(dms(91, 0, 0, 1), b'N', dms(10, 0, 0, 1), b'E').to_tiff();
        assert_eq!(photo_location(&image), None);

        let image = GpsExif::full(dms(10, 0, 0, 1), b'N', dms(181, 0, 0, 1), b'E').to_tiff();
        assert_eq!(photo_location(&image), None);
    }

    #[test]
    fn non_image_bytes_yield_none() {
        assert_eq!(photo_location(b"definitely not an image"), None);
        assert_eq!(photo_location(&[]), None);
    }

    #[test]
    fn truncated_image_yields_none() {
        let image = GpsExif::full(dms(35, 0, 0, 1), b'N', dms(139, 0, 0, 1), b'E').to_tiff();
        assert_eq!(photo_location(&image[..20]), None);
    }
}
