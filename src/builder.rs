//! Geocoder builder for flexible configuration
//!
//! This module provides a builder pattern for creating geocoders with a
//! custom dataset source, country-name lookup and logging verbosity.

use crate::config::Config;
use crate::country::{CountryNames, IsoCountryNames};
use crate::error::{GeodecodeError, Result};
use crate::geocoder::Geocoder;
use crate::loader::{CsvSource, LocationSource};
use geodecode_types::location::Location;
use std::fmt;
use std::path::PathBuf;

/// Builder for geocoder configuration with custom sources and settings.
///
/// Without an explicit source the geocoder reads the CSV file at
/// `Config::data_path`.
///
/// ```
/// use geodecode::{Geocoder, Location};
///
/// let geocoder = Geocoder::builder()
///     .verbose(true)
///     .locations(vec![Location::new(5.0, 5.0, "X", "", "", "FR")])
///     .build()
///     .unwrap();
///
/// assert_eq!(geocoder.find_location([89.0, 179.0]).unwrap().city, "X");
/// ```
#[derive(Default)]
pub struct GeocoderBuilder {
    config: Config,
    source: Option<PendingSource>,
    countries: Option<Box<dyn CountryNames>>,
}

impl GeocoderBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Log load progress and rejected queries at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    /// Read the CSV dataset from this path.
    pub fn data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config = self.config.with_data_path(path);
        self
    }

    /// Use a custom record source instead of the CSV file.
    ///
    /// The source is used as given. A [`CsvSource`] passed here keeps its
    /// own verbosity; use [`csv_source`](Self::csv_source) to have it follow
    /// the builder's setting.
    pub fn source<S: LocationSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(PendingSource::Custom(Box::new(source)));
        self
    }

    /// Read records from this CSV source instead of `Config::data_path`.
    ///
    /// Skipped rows are reported loudly if either the source or the
    /// configuration is verbose at build time.
    pub fn csv_source(mut self, source: CsvSource) -> Self {
        self.source = Some(PendingSource::Csv(source));
        self
    }

    /// Index these records instead of reading a file.
    pub fn locations(self, locations: Vec<Location>) -> Self {
        self.source(locations)
    }

    /// Use a custom country-name lookup.
    pub fn country_names<C: CountryNames + 'static>(mut self, countries: C) -> Self {
        self.countries = Some(Box::new(countries));
        self
    }

    /// Build the geocoder. Nothing is loaded until the first query.
    pub fn build(self) -> Result<Geocoder> {
        self.config
            .validate()
            .map_err(GeodecodeError::InvalidConfig)?;

        let source: Box<dyn LocationSource> = match self.source {
            Some(PendingSource::Custom(source)) => source,
            Some(PendingSource::Csv(csv)) => Box::new(inherit_verbosity(csv, &self.config)),
            None => Box::new(Geocoder::default_source(&self.config)),
        };
        let countries: Box<dyn CountryNames> = match self.countries {
            Some(countries) => countries,
            None => Box::new(IsoCountryNames),
        };

        Ok(Geocoder::from_parts(self.config, source, countries))
    }
}

enum PendingSource {
    Csv(CsvSource),
    Custom(Box<dyn LocationSource>),
}

fn inherit_verbosity(source: CsvSource, config: &Config) -> CsvSource {
    let verbose = source.is_verbose() || config.verbose;
    source.verbose(verbose)
}

impl fmt::Debug for GeocoderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderBuilder")
            .field("config", &self.config)
            .field(
                "source",
                &match &self.source {
                    Some(PendingSource::Csv(_)) => "csv",
                    Some(PendingSource::Custom(_)) => "custom",
                    None => "default",
                },
            )
            .field("custom_countries", &self.countries.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoder::LoadState;

    struct Shouty;

    impl CountryNames for Shouty {
        fn country_name(&self, code: &str) -> Option<String> {
            Some(format!("COUNTRY-{}", code))
        }
    }

    #[test]
    fn test_builder_default() {
        let geocoder = GeocoderBuilder::new().build().unwrap();
        assert_eq!(geocoder.config(), &Config::default());
        assert_eq!(geocoder.state(), LoadState::Unloaded);
    }

    #[test]
    fn test_builder_settings() {
        let geocoder = GeocoderBuilder::new()
            .verbose(true)
            .data_path("/tmp/cities.csv")
            .build()
            .unwrap();
        assert!(geocoder.config().verbose);
        assert_eq!(geocoder.config().data_path, PathBuf::from("/tmp/cities.csv"));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = GeocoderBuilder::new().data_path("").build();
        assert!(matches!(result, Err(GeodecodeError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_missing_file_gives_empty_geocoder() {
        let geocoder = GeocoderBuilder::new()
            .data_path("/nonexistent/geodecode/rg_cities1000.csv")
            .build()
            .unwrap();
        assert!(geocoder.find_location([0.0, 0.0]).is_none());
        assert_eq!(geocoder.state(), LoadState::Empty);
    }

    #[test]
    fn test_builder_custom_country_names() {
        let geocoder = GeocoderBuilder::new()
            .locations(vec![Location::new(0.0, 0.0, "A", "", "", "GH")])
            .country_names(Shouty)
            .build()
            .unwrap();
        let hit = geocoder.find_location([0.0, 0.0]).unwrap();
        assert_eq!(hit.country.as_deref(), Some("COUNTRY-GH"));
    }

    #[test]
    fn test_csv_source_inherits_config_verbosity() {
        let quiet = CsvSource::from_bytes(&b"lat,lon,city,admin1,admin2,cc\n"[..]);
        assert!(!quiet.is_verbose());

        let loud = Config::default().with_verbose(true);
        assert!(inherit_verbosity(quiet.clone(), &loud).is_verbose());
        assert!(!inherit_verbosity(quiet.clone(), &Config::default()).is_verbose());
        assert!(inherit_verbosity(quiet.verbose(true), &Config::default()).is_verbose());
    }

    #[test]
    fn test_builder_csv_source() {
        let data = "lat,lon,city,admin1,admin2,cc\nbad,0.0,Broken,,,FR\n10.0,10.0,Kept,,,FR\n";
        let builder = GeocoderBuilder::new()
            .verbose(true)
            .csv_source(CsvSource::from_bytes(data.as_bytes().to_vec()));
        assert!(format!("{:?}", builder).contains("\"csv\""));

        let geocoder = builder.build().unwrap();
        assert_eq!(geocoder.find_location([11.0, 11.0]).unwrap().city, "Kept");
        assert_eq!(geocoder.len(), 1);
    }
}
