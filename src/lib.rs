//! Offline reverse geocoding: resolve a latitude/longitude to the nearest
//! known place in a fixed reference dataset.
//!
//! ## Features
//! - **Static 2-d tree**: balanced median-split tree over `(lat, lon)` keys,
//!   branch-and-bound nearest-neighbor search on squared planar distance
//! - **Build once, query many**: the dataset is loaded and indexed by the
//!   first query, exactly once across threads, and read lock-free afterwards
//! - **Pluggable collaborators**: CSV or in-memory record sources, and a
//!   replaceable country-name lookup
//!
//! ## Distance
//! Distances are squared Euclidean distances in degree space, not geodesic
//! distances. The result is the nearest record in that metric, which is a
//! close approximation of the nearest place away from the poles and the
//! antimeridian.
//!
//! ```rust
//! use geodecode::{Coordinate, Geocoder, Location};
//!
//! let geocoder = Geocoder::from_locations(vec![
//!     Location::new(52.52437, 13.41053, "Berlin", "Land Berlin", "", "DE"),
//!     Location::new(48.85341, 2.3488, "Paris", "Ile-de-France", "Paris", "FR"),
//! ]);
//!
//! let paris = geocoder.find_location(Coordinate::new(48.8566, 2.3522)).unwrap();
//! assert_eq!(paris.city, "Paris");
//! assert_eq!(paris.country.as_deref(), Some("France"));
//!
//! // One bad coordinate rejects the whole batch.
//! let batch = [Coordinate::new(52.5, 13.4), Coordinate::new(999.0, 999.0)];
//! assert!(geocoder.query(&batch).is_err());
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod country;
pub mod error;
pub mod geocoder;
pub mod loader;

pub use builder::GeocoderBuilder;
pub use config::Config;
pub use error::{GeodecodeError, Result};
pub use geocoder::{Geocoder, LoadState, Nearest};

pub use geo::Point;
pub use geodecode_types::coordinate::Coordinate;
pub use geodecode_types::location::Location;

pub use country::{CountryNames, IsoCountryNames};
pub use loader::{CsvSource, LocationSource};

// Re-export validation utilities
pub use compute::validation;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Geocoder, GeocoderBuilder, GeodecodeError, LoadState, Result};

    pub use crate::{Coordinate, Location, Point};

    pub use crate::{CountryNames, CsvSource, IsoCountryNames, LocationSource};
}
