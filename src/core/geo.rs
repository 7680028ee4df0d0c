use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Array form `[lat, lng]` used by tile-layer map libraries
    pub fn to_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        Self::from_pair(pair)
    }
}

/// Represents a point in screen coordinates, or any (x, y) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// `[[south, west], [north, east]]`, the corner-pair form tile-layer libraries take
    pub fn to_pairs(&self) -> [[f64; 2]; 2] {
        [self.south_west.to_pair(), self.north_east.to_pair()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_pair_round_trip() {
        let coord = LatLng::new(26.2006, 92.9376);
        assert_eq!(coord.to_pair(), [26.2006, 92.9376]);
        assert_eq!(LatLng::from(coord.to_pair()), coord);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_point_default_is_origin() {
        assert_eq!(Point::default(), Point::zero());
        assert_eq!(Point::default(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_bounds_contains_and_pairs() {
        let bounds = LatLngBounds::from_coords(24.0, 89.0, 28.0, 96.0);
        assert!(bounds.contains(&LatLng::new(26.2006, 92.9376)));
        assert!(!bounds.contains(&LatLng::new(30.0, 92.0)));
        assert_eq!(bounds.to_pairs(), [[24.0, 89.0], [28.0, 96.0]]);
        assert_eq!(bounds.center(), LatLng::new(26.0, 92.5));
    }
}
