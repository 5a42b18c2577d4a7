//! Coordinates and rectangular search areas

use crate::error::DirectoryError;
use serde::{Deserialize, Serialize};

/// Point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    /// Latitude, -90..=90
    pub latitude: f64,
    /// Longitude, -180..=180
    pub longitude: f64,
}

impl GeoPoint {
    /// Create validated point
    ///
    /// # Errors
    /// Returns [`DirectoryError::InvalidInput`] if either coordinate is out of range
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DirectoryError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Check a latitude
///
/// # Errors
/// Returns [`DirectoryError::InvalidInput`] outside -90..=90 or for NaN
pub fn validate_latitude(latitude: f64) -> Result<(), DirectoryError> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(DirectoryError::invalid(format!(
            "latitude {latitude} outside -90..=90"
        )))
    }
}

/// Check a longitude
///
/// # Errors
/// Returns [`DirectoryError::InvalidInput`] outside -180..=180 or for NaN
pub fn validate_longitude(longitude: f64) -> Result<(), DirectoryError> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(DirectoryError::invalid(format!(
            "longitude {longitude} outside -180..=180"
        )))
    }
}

/// Inclusive rectangle between a south-west and a north-east corner
///
/// Boxes crossing the antimeridian are not supported; `south_west` must not
/// lie east of `north_east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBox")]
pub struct BoundingBox {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl BoundingBox {
    /// Create validated box
    ///
    /// # Errors
    /// Returns [`DirectoryError::InvalidInput`] if a corner is out of range or
    /// the box is inverted
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Result<Self, DirectoryError> {
        let south_west = GeoPoint::new(south_west.latitude, south_west.longitude)?;
        let north_east = GeoPoint::new(north_east.latitude, north_east.longitude)?;
        if south_west.latitude > north_east.latitude || south_west.longitude > north_east.longitude
        {
            return Err(DirectoryError::invalid(
                "bounding box south-west corner must not lie north or east of north-east corner",
            ));
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    /// Create from raw corner coordinates
    ///
    /// # Errors
    /// See [`BoundingBox::new`]
    pub fn from_corners(
        min_latitude: f64,
        min_longitude: f64,
        max_latitude: f64,
        max_longitude: f64,
    ) -> Result<Self, DirectoryError> {
        Self::new(
            GeoPoint {
                latitude: min_latitude,
                longitude: min_longitude,
            },
            GeoPoint {
                latitude: max_latitude,
                longitude: max_longitude,
            },
        )
    }

    /// South-west corner
    #[inline]
    #[must_use]
    pub fn south_west(&self) -> GeoPoint {
        self.south_west
    }

    /// North-east corner
    #[inline]
    #[must_use]
    pub fn north_east(&self) -> GeoPoint {
        self.north_east
    }

    /// Whether the point lies inside or on the edge
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&longitude)
    }
}

// Unvalidated wire shapes; deserialization goes through the constructors

#[derive(Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = DirectoryError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[derive(Deserialize)]
struct RawBox {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl TryFrom<RawBox> for BoundingBox {
    type Error = DirectoryError;

    fn try_from(raw: RawBox) -> Result<Self, Self::Error> {
        Self::new(raw.south_west, raw.north_east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn box_is_inclusive() {
        let area = BoundingBox::from_corners(56.0, 84.0, 57.0, 85.0).unwrap();
        assert!(area.contains(56.0, 84.0));
        assert!(area.contains(57.0, 85.0));
        assert!(area.contains(56.47, 84.95));
        assert!(!area.contains(55.99, 84.5));
        assert!(!area.contains(56.5, 85.01));
    }

    #[test]
    fn inverted_box_is_invalid() {
        let err = BoundingBox::from_corners(57.0, 84.0, 56.0, 85.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(BoundingBox::from_corners(56.0, 85.0, 57.0, 84.0).is_err());
    }

    #[test]
    fn out_of_range_and_nan_are_invalid() {
        assert!(BoundingBox::from_corners(-91.0, 0.0, 0.0, 0.0).is_err());
        assert!(BoundingBox::from_corners(0.0, 0.0, 0.0, 180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn degenerate_box_holds_one_point() {
        let area = BoundingBox::from_corners(1.0, 2.0, 1.0, 2.0).unwrap();
        assert!(area.contains(1.0, 2.0));
    }

    #[test]
    fn deserialization_validates() {
        let area: BoundingBox = serde_json::from_str(
            r#"{"south_west":{"latitude":56.0,"longitude":84.0},"north_east":{"latitude":57.0,"longitude":85.0}}"#,
        )
        .unwrap();
        assert!(area.contains(56.5, 84.5));

        let out_of_range = serde_json::from_str::<BoundingBox>(
            r#"{"south_west":{"latitude":-999.0,"longitude":0.0},"north_east":{"latitude":1.0,"longitude":1.0}}"#,
        );
        assert!(out_of_range.is_err());

        let inverted = serde_json::from_str::<BoundingBox>(
            r#"{"south_west":{"latitude":10.0,"longitude":10.0},"north_east":{"latitude":1.0,"longitude":1.0}}"#,
        );
        assert!(inverted.is_err());

        assert!(serde_json::from_str::<GeoPoint>(r#"{"latitude":0.0,"longitude":181.0}"#).is_err());
    }
}
