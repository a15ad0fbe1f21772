//! # geodecode-types
//!
//! Core data types for the geodecode reverse geocoder.
//!
//! - **Coordinate**: a latitude/longitude query or record position
//! - **Location**: one reference-dataset entry (city, administrative
//!   subdivisions, country)
//!
//! All types are serializable with Serde and convert to and from the `geo`
//! crate's `Point`, which uses the `x = longitude, y = latitude` convention.
//!
//! ## Examples
//!
//! ```rust
//! use geodecode_types::coordinate::Coordinate;
//! use geo::Point;
//!
//! let paris = Coordinate::new(48.8566, 2.3522);
//! let point: Point = paris.into();
//! assert_eq!(point.y(), 48.8566);
//! ```

pub mod coordinate;
pub mod location;
