//! Validation for geographic coordinates.

use crate::error::{GeodecodeError, Result};
use geodecode_types::coordinate::{
    Coordinate, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
};

/// Validates a coordinate has a usable latitude and longitude.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use geodecode::validation::validate_coordinate;
/// use geodecode::Coordinate;
///
/// // Valid coordinate
/// let la = Coordinate::new(34.0522, -118.2437);
/// assert!(validate_coordinate(&la).is_ok());
///
/// // Invalid latitude
/// let invalid = Coordinate::new(95.0, -74.0);
/// assert!(validate_coordinate(&invalid).is_err());
///
/// // Invalid longitude
/// let invalid = Coordinate::new(40.0, 200.0);
/// assert!(validate_coordinate(&invalid).is_err());
/// ```
pub fn validate_coordinate(coord: &Coordinate) -> Result<()> {
    let (lat, lon) = (coord.lat, coord.lon);

    if !lat.is_finite() {
        return Err(GeodecodeError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lon.is_finite() {
        return Err(GeodecodeError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(GeodecodeError::InvalidInput(format!(
            "Latitude out of range [{}, {}]: {}",
            MIN_LATITUDE, MAX_LATITUDE, lat
        )));
    }

    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(GeodecodeError::InvalidInput(format!(
            "Longitude out of range [{}, {}]: {}",
            MIN_LONGITUDE, MAX_LONGITUDE, lon
        )));
    }

    Ok(())
}

/// Validates every coordinate of a batch, stopping at the first failure.
///
/// The error carries the position of the offending coordinate.
///
/// # Examples
///
/// ```
/// use geodecode::validation::validate_coordinates;
/// use geodecode::{Coordinate, GeodecodeError};
///
/// let coords = vec![
///     Coordinate::new(1.0, 1.0),
///     Coordinate::new(999.0, 999.0), // Invalid
/// ];
///
/// match validate_coordinates(&coords) {
///     Err(GeodecodeError::InvalidCoordinate { index, .. }) => assert_eq!(index, 1),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub fn validate_coordinates(coords: &[Coordinate]) -> Result<()> {
    for (index, coord) in coords.iter().enumerate() {
        validate_coordinate(coord).map_err(|e| GeodecodeError::InvalidCoordinate {
            index,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Parses a latitude/longitude pair from text, as found in tabular sources.
///
/// Returns `None` when either field does not parse or falls outside the
/// geographic range.
pub fn parse_coordinate(lat: &str, lon: &str) -> Option<Coordinate> {
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    let coord = Coordinate::new(lat, lon);
    validate_coordinate(&coord).ok().map(|_| coord)
}
