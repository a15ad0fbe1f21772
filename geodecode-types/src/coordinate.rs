use geo::Point;
use serde::{Deserialize, Serialize};

/// Lower latitude bound in degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Upper latitude bound in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Lower longitude bound in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Upper longitude bound in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A geographic position given as latitude then longitude, in degrees.
///
/// The field order matches the `[lat, lon]` pairs most geocoding inputs use.
/// Converting to a `geo::Point` swaps the order into `x = lon, y = lat`.
///
/// # Examples
///
/// ```
/// use geodecode_types::coordinate::Coordinate;
///
/// let sf = Coordinate::from([37.78674, -122.39222]);
/// assert_eq!(sf.lat, 37.78674);
/// assert_eq!(sf.lon, -122.39222);
/// assert!(sf.is_geographic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, valid range [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, valid range [-180, 180]
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The coordinate as a `[lat, lon]` array.
    #[inline]
    pub const fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// Returns true when both components are finite and inside the
    /// geographic range.
    ///
    /// ```
    /// use geodecode_types::coordinate::Coordinate;
    ///
    /// assert!(Coordinate::new(90.0, -180.0).is_geographic());
    /// assert!(!Coordinate::new(999.0, 999.0).is_geographic());
    /// assert!(!Coordinate::new(f64::NAN, 0.0).is_geographic());
    /// ```
    pub fn is_geographic(&self) -> bool {
        (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat)
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lon)
    }

    /// Squared planar distance in degree space.
    ///
    /// This is not a geodesic distance; it is only meant for ranking
    /// candidates against the same query point.
    ///
    /// ```
    /// use geodecode_types::coordinate::Coordinate;
    ///
    /// let a = Coordinate::new(0.0, 0.0);
    /// let b = Coordinate::new(1.0, 1.0);
    /// assert_eq!(a.distance_squared(&b), 2.0);
    /// ```
    #[inline]
    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lon = self.lon - other.lon;
        d_lat * d_lat + d_lon * d_lon
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coord: Coordinate) -> Self {
        Point::new(coord.lon, coord.lat)
    }
}
