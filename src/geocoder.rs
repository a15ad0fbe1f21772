//! Reverse geocoding service.
//!
//! A [`Geocoder`] owns the reference dataset and its spatial index. Both are
//! built lazily by the first call that needs them, exactly once, even when
//! many threads race on that first call: the build runs inside a
//! `OnceCell`, and every other caller blocks until it has finished. After
//! that the dataset and index are immutable and are read without locking.
//!
//! Lifecycle: `Unloaded -> Loading -> Empty | Ready`. There is no reload; a
//! failed or empty load leaves the geocoder permanently empty, and every
//! query on it reports "no result".

use crate::builder::GeocoderBuilder;
use crate::compute::kdtree::{IndexKey, Neighbor, SpatialIndex};
use crate::compute::validation::{validate_coordinate, validate_coordinates};
use crate::config::Config;
use crate::country::{CountryNames, IsoCountryNames};
use crate::error::Result;
use crate::loader::{CsvSource, LocationSource};
use geodecode_types::coordinate::Coordinate;
use geodecode_types::location::Location;
use log::Level;
use once_cell::sync::OnceCell;
use std::fmt;
use std::time::Instant;

/// Observable load state of a [`Geocoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing loaded yet (a load may be in progress)
    Unloaded,
    /// Loading finished without any usable record
    Empty,
    /// Dataset and index are available
    Ready,
}

/// Closest dataset record to a query coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub location: &'a Location,
    /// Position of `location` in the dataset
    pub index: usize,
    /// Squared planar distance in degrees
    pub distance_squared: f64,
}

#[derive(Debug, Default)]
struct Dataset {
    locations: Vec<Location>,
    index: SpatialIndex,
}

/// Offline reverse geocoder.
///
/// # Examples
///
/// ```
/// use geodecode::{Coordinate, Geocoder, Location};
///
/// let geocoder = Geocoder::from_locations(vec![
///     Location::new(0.0, 0.0, "A", "", "", "GH"),
///     Location::new(10.0, 10.0, "B", "", "", "NG"),
///     Location::new(-10.0, -10.0, "C", "", "", "AO"),
/// ]);
///
/// let hit = geocoder.find_location(Coordinate::new(1.0, 1.0)).unwrap();
/// assert_eq!(hit.city, "A");
/// assert_eq!(hit.country.as_deref(), Some("Ghana"));
///
/// assert!(geocoder.find_location([999.0, 999.0]).is_none());
/// ```
pub struct Geocoder {
    config: Config,
    source: Box<dyn LocationSource>,
    countries: Box<dyn CountryNames>,
    data: OnceCell<Dataset>,
}

impl Geocoder {
    /// Create a geocoder reading the CSV dataset at `config.data_path`.
    pub fn new(config: Config) -> Result<Self> {
        GeocoderBuilder::new().config(config).build()
    }

    pub fn builder() -> GeocoderBuilder {
        GeocoderBuilder::new()
    }

    /// Create a geocoder over in-memory records with default settings.
    pub fn from_locations(locations: Vec<Location>) -> Self {
        Self::from_parts(Config::default(), Box::new(locations), Box::new(IsoCountryNames))
    }

    pub(crate) fn from_parts(
        config: Config,
        source: Box<dyn LocationSource>,
        countries: Box<dyn CountryNames>,
    ) -> Self {
        Self {
            config,
            source,
            countries,
            data: OnceCell::new(),
        }
    }

    pub(crate) fn default_source(config: &Config) -> CsvSource {
        CsvSource::from_path(config.data_path.clone()).verbose(config.verbose)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the dataset and build the index if that has not happened yet.
    ///
    /// Safe to call from many threads: one caller performs the load, the
    /// others wait for it, and later calls return immediately.
    pub fn ensure_loaded(&self) {
        self.dataset();
    }

    /// Current load state; never blocks and never triggers a load.
    pub fn state(&self) -> LoadState {
        match self.data.get() {
            None => LoadState::Unloaded,
            Some(data) if data.index.is_empty() => LoadState::Empty,
            Some(_) => LoadState::Ready,
        }
    }

    /// Number of indexed records. Triggers the load.
    pub fn len(&self) -> usize {
        self.dataset().locations.len()
    }

    /// True when no record is indexed. Triggers the load.
    pub fn is_empty(&self) -> bool {
        self.dataset().locations.is_empty()
    }

    /// Nearest record for each coordinate of a batch.
    ///
    /// Every coordinate is range-checked first. If any of them is out of
    /// range the whole batch is rejected with
    /// [`GeodecodeError::InvalidCoordinate`](crate::GeodecodeError::InvalidCoordinate)
    /// and no position gets a result, including the valid ones. Otherwise the
    /// output has one entry per input, `None` where nothing could be found
    /// (only on an empty geocoder). Returned records carry their country name.
    pub fn query(&self, coordinates: &[Coordinate]) -> Result<Vec<Option<Location>>> {
        if let Err(e) = validate_coordinates(coordinates) {
            log::log!(self.chatty(), "Rejecting query batch: {}", e);
            return Err(e);
        }

        let data = self.dataset();
        Ok(coordinates
            .iter()
            .map(|coord| {
                self.resolve(data, *coord)
                    .map(|nearest| self.with_country(nearest.location))
            })
            .collect())
    }

    /// Nearest record to a single coordinate, with its country name.
    ///
    /// Out-of-range input returns `None` without touching the index.
    pub fn find_location(&self, coordinate: impl Into<Coordinate>) -> Option<Location> {
        let coordinate = coordinate.into();
        if let Err(e) = validate_coordinate(&coordinate) {
            log::log!(self.chatty(), "Invalid query coordinate: {}", e);
            return None;
        }

        self.query(&[coordinate]).ok()?.into_iter().next().flatten()
    }

    /// Nearest record as stored in the dataset, with its position and
    /// squared distance. Out-of-range input returns `None`.
    pub fn nearest(&self, coordinate: impl Into<Coordinate>) -> Option<Nearest<'_>> {
        let coordinate = coordinate.into();
        if let Err(e) = validate_coordinate(&coordinate) {
            log::log!(self.chatty(), "Invalid query coordinate: {}", e);
            return None;
        }

        self.resolve(self.dataset(), coordinate)
    }

    fn dataset(&self) -> &Dataset {
        self.data.get_or_init(|| self.load())
    }

    fn chatty(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    fn load(&self) -> Dataset {
        log::log!(self.chatty(), "Loading and indexing location data");
        let started = Instant::now();

        let loaded = match self.source.load() {
            Ok(locations) => locations,
            Err(e) => {
                log::error!("Failed to load location data: {}", e);
                return Dataset::default();
            }
        };

        let total = loaded.len();
        let locations: Vec<Location> = loaded
            .into_iter()
            .filter(|location| location.coordinate().is_geographic())
            .collect();
        if locations.len() < total {
            log::warn!(
                "Dropped {} records with invalid coordinates",
                total - locations.len()
            );
        }

        match locations.len() {
            0 => {
                log::warn!("No valid coordinates loaded");
                return Dataset::default();
            }
            1 => log::info!("Only one valid coordinate loaded, no tree will be built"),
            n => log::log!(self.chatty(), "Parsed {} valid locations", n),
        }

        let keys = locations
            .iter()
            .enumerate()
            .map(|(i, location)| IndexKey::new(location.coordinate(), i))
            .collect();
        let index = SpatialIndex::build(keys);

        log::log!(
            self.chatty(),
            "Data loaded, index built in {:.2?}. {} locations indexed",
            started.elapsed(),
            locations.len()
        );

        Dataset { locations, index }
    }

    fn resolve<'a>(&self, data: &'a Dataset, coordinate: Coordinate) -> Option<Nearest<'a>> {
        let neighbor = match &data.index {
            SpatialIndex::Empty => None,
            SpatialIndex::Single(key) => Some(Neighbor {
                key: *key,
                distance_squared: key.distance_squared(&coordinate.to_array()),
            }),
            SpatialIndex::Tree(tree) => tree.nearest(coordinate),
        };

        let Some(neighbor) = neighbor else {
            log::log!(self.chatty(), "No nearest point found for {:?}", coordinate);
            return None;
        };

        let index = neighbor.key.index;
        debug_assert!(
            index < data.locations.len(),
            "index key {} out of bounds for {} locations",
            index,
            data.locations.len()
        );
        match data.locations.get(index) {
            Some(location) => Some(Nearest {
                location,
                index,
                distance_squared: neighbor.distance_squared,
            }),
            None => {
                log::error!("Spatial index returned invalid record index {}", index);
                None
            }
        }
    }

    fn with_country(&self, location: &Location) -> Location {
        match self.countries.country_name(&location.cc) {
            Some(name) => location.clone().with_country(name),
            None => location.clone(),
        }
    }
}

impl fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geocoder")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("locations", &self.data.get().map(|d| d.locations.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeodecodeError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        locations: Vec<Location>,
    }

    impl LocationSource for CountingSource {
        fn load(&self) -> Result<Vec<Location>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.locations.clone())
        }
    }

    struct FailingSource;

    impl LocationSource for FailingSource {
        fn load(&self) -> Result<Vec<Location>> {
            Err(GeodecodeError::MissingColumn("lat".to_string()))
        }
    }

    fn abc() -> Vec<Location> {
        vec![
            Location::new(0.0, 0.0, "A", "", "", "GH"),
            Location::new(10.0, 10.0, "B", "", "", "NG"),
            Location::new(-10.0, -10.0, "C", "", "", "AO"),
        ]
    }

    #[test]
    fn test_lazy_load_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geocoder = Geocoder::builder()
            .source(CountingSource {
                calls: calls.clone(),
                locations: abc(),
            })
            .build()
            .unwrap();

        assert_eq!(geocoder.state(), LoadState::Unloaded);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        geocoder.ensure_loaded();
        geocoder.ensure_loaded();
        assert!(geocoder.find_location([1.0, 1.0]).is_some());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.state(), LoadState::Ready);
        assert_eq!(geocoder.len(), 3);
    }

    #[test]
    fn test_nearest_reports_distance_and_index() {
        let geocoder = Geocoder::from_locations(abc());
        let hit = geocoder.nearest([1.0, 1.0]).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.location.city, "A");
        assert_eq!(hit.distance_squared, 2.0);
        // Stored records are not decorated with the country name.
        assert!(hit.location.country.is_none());
    }

    #[test]
    fn test_failed_load_is_permanently_empty() {
        let geocoder = Geocoder::builder().source(FailingSource).build().unwrap();
        assert!(geocoder.find_location([0.0, 0.0]).is_none());
        assert_eq!(geocoder.state(), LoadState::Empty);
        assert!(geocoder.is_empty());
        assert_eq!(
            geocoder.query(&[Coordinate::new(1.0, 1.0)]).unwrap(),
            vec![None]
        );
    }

    #[test]
    fn test_invalid_records_never_reach_the_index() {
        let mut locations = abc();
        locations.insert(0, Location::new(500.0, 0.0, "Bad", "", "", "XX"));
        locations.push(Location::new(f64::NAN, 0.0, "AlsoBad", "", "", "XX"));

        let geocoder = Geocoder::from_locations(locations);
        assert_eq!(geocoder.len(), 3);

        let hit = geocoder.nearest([89.0, 0.0]).unwrap();
        assert_ne!(hit.location.city, "Bad");
    }

    #[test]
    fn test_invalid_query_does_not_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geocoder = Geocoder::builder()
            .source(CountingSource {
                calls: calls.clone(),
                locations: abc(),
            })
            .build()
            .unwrap();

        assert!(geocoder.find_location([999.0, 999.0]).is_none());
        assert!(geocoder.query(&[Coordinate::new(0.0, 999.0)]).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(geocoder.state(), LoadState::Unloaded);
    }

    #[test]
    fn test_unknown_country_code_leaves_country_unset() {
        let geocoder = Geocoder::from_locations(vec![Location::new(1.0, 1.0, "X", "", "", "QQ")]);
        let hit = geocoder.find_location([0.0, 0.0]).unwrap();
        assert_eq!(hit.city, "X");
        assert!(hit.country.is_none());
    }

    #[test]
    fn test_known_country_code_is_decorated() {
        let stored = Location::new(1.0, 1.0, "Cape Coast", "Central", "", "GH");
        let geocoder = Geocoder::from_locations(vec![stored.clone()]);
        let hit = geocoder.find_location([0.0, 0.0]).unwrap();
        assert_eq!(hit, stored.clone().with_country("Ghana"));
        assert!(geocoder.nearest([0.0, 0.0]).unwrap().location.country.is_none());
    }

    #[test]
    fn test_debug_output() {
        let geocoder = Geocoder::from_locations(abc());
        let before = format!("{:?}", geocoder);
        assert!(before.contains("Unloaded"));
        geocoder.ensure_loaded();
        let after = format!("{:?}", geocoder);
        assert!(after.contains("Ready"));
    }
}
