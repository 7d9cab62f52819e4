use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// How a photo entered the app. The acquisition path decides how its
/// location gets resolved, so the provenance travels with the payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    /// Picked from the photo library. Positioning metadata may be embedded
    /// in the image itself.
    Library,
    /// Freshly captured by the camera. Carries no trustworthy positioning
    /// metadata of its own.
    Camera,
}

impl fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhotoSource::Library => "library",
            PhotoSource::Camera => "camera",
        })
    }
}

/// An owned binary image payload together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    data: Bytes,
    source: PhotoSource,
}

impl Photo {
    pub fn from_library(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            source: PhotoSource::Library,
        }
    }

    pub fn from_camera(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            source: PhotoSource::Camera,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn source(&self) -> PhotoSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_payload_and_provenance() {
        let photo = Photo::from_library(vec![1u8, 2, 3]);
        assert_eq!(photo.data(), &[1, 2, 3]);
        assert_eq!(photo.source(), PhotoSource::Library);
        assert_eq!(photo.len(), 3);
        assert!(!photo.is_empty());
    }

    #[test]
    fn camera_photos_are_tagged_as_such() {
        let photo = Photo::from_camera(Bytes::from_static(b"jpeg"));
        assert_eq!(photo.source(), PhotoSource::Camera);
    }

    #[test]
    fn source_display_names() {
        assert_eq!(PhotoSource::Library.to_string(), "library");
        assert_eq!(PhotoSource::Camera.to_string(), "camera");
    }
}
