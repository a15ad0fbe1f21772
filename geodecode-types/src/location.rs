use crate::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

/// A named place from the reference dataset.
///
/// `country` is not part of the source data. It is filled in from `cc` by a
/// country-name lookup when a location is returned from a query.
///
/// # Examples
///
/// ```
/// use geodecode_types::location::Location;
///
/// let anadyr = Location::new(64.73424, 177.5103, "Anadyr", "Chukotka", "", "RU");
/// assert_eq!(anadyr.city, "Anadyr");
/// assert!(anadyr.country.is_none());
///
/// let named = anadyr.with_country("Russia");
/// assert_eq!(named.country.as_deref(), Some("Russia"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Name of the place, e.g. a city or town
    pub city: String,
    /// First-level administrative division (state, province)
    pub admin1: String,
    /// Second-level administrative division (county, region)
    pub admin2: String,
    /// ISO 3166-1 alpha-2 country code
    pub cc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    pub fn new(
        lat: f64,
        lon: f64,
        city: impl Into<String>,
        admin1: impl Into<String>,
        admin2: impl Into<String>,
        cc: impl Into<String>,
    ) -> Self {
        Self {
            lat,
            lon,
            city: city.into(),
            admin1: admin1.into(),
            admin2: admin2.into(),
            cc: cc.into(),
            country: None,
        }
    }

    /// Position of this location.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Return a copy with the country display name set.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}
