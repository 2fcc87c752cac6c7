// geofilter - core/bounds.rs
//
// Bounding box construction from the flight config's flat coordinate list,
// and the inclusive membership test the classifier applies.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::BoundingBox;
use crate::util::error::BoundsError;

impl BoundingBox {
    /// Builds a bounding box from a flat list of alternating latitude and
    /// longitude values: `[lat, lon, lat, lon, ...]`.
    ///
    /// The box is the min/max envelope per axis over all supplied pairs.
    /// A single pair yields a legal degenerate box matching exactly that
    /// point. An empty list or an odd-length list is rejected; there is no
    /// way to obtain a box that was never set.
    pub fn from_corner_coords(coords: &[f64]) -> Result<BoundingBox, BoundsError> {
        if coords.is_empty() {
            return Err(BoundsError::NoCoordinates);
        }
        if coords.len() % 2 != 0 {
            return Err(BoundsError::OddCoordinateCount {
                count: coords.len(),
            });
        }

        let mut lat_min = coords[0];
        let mut lat_max = coords[0];
        let mut lon_min = coords[1];
        let mut lon_max = coords[1];

        for pair in coords.chunks_exact(2) {
            lat_min = lat_min.min(pair[0]);
            lat_max = lat_max.max(pair[0]);
            lon_min = lon_min.min(pair[1]);
            lon_max = lon_max.max(pair[1]);
        }

        Ok(BoundingBox {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// True when the position lies inside the box, inclusive on all four
    /// edges: a coordinate exactly equal to a bound is inside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat <= self.lat_max && lat >= self.lat_min && lon <= self.lon_max && lon >= self.lon_min
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }
}
