//! Record sources for the reference dataset.
//!
//! A [`LocationSource`] hands the geocoder an ordered list of records. The
//! position of a record in that list is the index the spatial index stores,
//! so sources must return records in a stable order.
//!
//! [`CsvSource`] reads the tabular `lat,lon,city,admin1,admin2,cc` format
//! (columns in any order, extra columns ignored) from a file or from an
//! in-memory buffer such as an `include_bytes!` blob.

use crate::compute::validation::parse_coordinate;
use crate::error::{GeodecodeError, Result};
use geodecode_types::location::Location;
use log::Level;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Columns a CSV dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["lat", "lon", "city", "admin1", "admin2", "cc"];

/// Supplies the records the geocoder indexes.
pub trait LocationSource: Send + Sync {
    /// Load every record.
    ///
    /// Returning an empty list is not an error. Records with invalid
    /// coordinates should be dropped here; the geocoder drops any that slip
    /// through before building its index.
    fn load(&self) -> Result<Vec<Location>>;
}

impl LocationSource for Vec<Location> {
    fn load(&self) -> Result<Vec<Location>> {
        Ok(self.clone())
    }
}

impl LocationSource for &'static [Location] {
    fn load(&self) -> Result<Vec<Location>> {
        Ok(self.to_vec())
    }
}

#[derive(Debug, Clone)]
enum CsvInput {
    Path(PathBuf),
    Bytes(Cow<'static, [u8]>),
}

/// CSV dataset reader.
///
/// # Examples
///
/// ```
/// use geodecode::loader::{CsvSource, LocationSource};
///
/// let data = "lat,lon,city,admin1,admin2,cc\n\
///             48.85341,2.3488,Paris,Ile-de-France,Paris,FR\n\
///             not-a-number,2.0,Broken,,,FR\n";
/// let source = CsvSource::from_bytes(data.as_bytes().to_vec());
///
/// let locations = source.load().unwrap();
/// assert_eq!(locations.len(), 1);
/// assert_eq!(locations[0].city, "Paris");
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    input: CsvInput,
    verbose: bool,
}

impl CsvSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: CsvInput::Path(path.into()),
            verbose: false,
        }
    }

    pub fn from_bytes(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            input: CsvInput::Bytes(bytes.into()),
            verbose: false,
        }
    }

    /// Report skipped rows at warn level instead of debug.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Path of a file-backed source.
    pub fn path(&self) -> Option<&Path> {
        match &self.input {
            CsvInput::Path(path) => Some(path),
            CsvInput::Bytes(_) => None,
        }
    }

    fn read_from<R: Read>(&self, reader: R) -> Result<Vec<Location>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns = Columns::resolve(rdr.headers()?)?;
        let level = if self.verbose { Level::Warn } else { Level::Debug };

        let mut locations = Vec::new();
        let mut skipped = 0usize;

        for (i, record) in rdr.records().enumerate() {
            let row = i + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    skipped += 1;
                    log::log!(level, "Skipping row {} due to read error: {}", row, e);
                    continue;
                }
            };

            match columns.location(&record) {
                Some(location) => locations.push(location),
                None => {
                    skipped += 1;
                    log::log!(
                        level,
                        "Skipping row {} with invalid coordinates: lat='{}', lon='{}'",
                        row,
                        record.get(columns.lat).unwrap_or_default(),
                        record.get(columns.lon).unwrap_or_default()
                    );
                }
            }
        }

        if skipped > 0 {
            log::log!(
                if self.verbose { Level::Info } else { Level::Debug },
                "Parsed {} valid rows, skipped {}",
                locations.len(),
                skipped
            );
        }

        Ok(locations)
    }
}

impl LocationSource for CsvSource {
    fn load(&self) -> Result<Vec<Location>> {
        match &self.input {
            CsvInput::Path(path) => {
                let file = File::open(path)?;
                self.read_from(BufReader::new(file))
            }
            CsvInput::Bytes(bytes) => self.read_from(bytes.as_ref()),
        }
    }
}

/// Column positions resolved from a CSV header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    lat: usize,
    lon: usize,
    city: usize,
    admin1: usize,
    admin2: usize,
    cc: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| GeodecodeError::MissingColumn(name.to_string()))?;
        }

        let [lat, lon, city, admin1, admin2, cc] = positions;
        Ok(Self {
            lat,
            lon,
            city,
            admin1,
            admin2,
            cc,
        })
    }

    fn location(&self, record: &csv::StringRecord) -> Option<Location> {
        let coord = parse_coordinate(record.get(self.lat)?, record.get(self.lon)?)?;
        Some(Location::new(
            coord.lat,
            coord.lon,
            record.get(self.city)?,
            record.get(self.admin1)?,
            record.get(self.admin2)?,
            record.get(self.cc)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "lat,lon,city,admin1,admin2,cc
64.73424,177.5103,Anadyr,Chukotka,,RU
4.88447,-1.75536,Takoradi,Western,,GH
";

    #[test]
    fn test_load_from_bytes() {
        let locations = CsvSource::from_bytes(SAMPLE.as_bytes()).load().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].city, "Anadyr");
        assert_eq!(locations[0].cc, "RU");
        assert_eq!(locations[1].lat, 4.88447);
        assert_eq!(locations[1].lon, -1.75536);
        assert!(locations.iter().all(|l| l.country.is_none()));
    }

    #[test]
    fn test_columns_in_any_order() {
        let data = "cc,city,extra,lon,lat,admin2,admin1\nUS,Austin,x,-97.74306,30.26715,Travis,Texas\n";
        let locations = CsvSource::from_bytes(data.as_bytes().to_vec()).load().unwrap();
        assert_eq!(locations.len(), 1);
        let austin = &locations[0];
        assert_eq!(austin.city, "Austin");
        assert_eq!(austin.admin1, "Texas");
        assert_eq!(austin.admin2, "Travis");
        assert_eq!(austin.lat, 30.26715);
        assert_eq!(austin.lon, -97.74306);
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let data = "lat,lon,city,admin1,admin2,cc
1.0,1.0,Good,,,AA
abc,1.0,BadLat,,,AA
1.0,,BadLon,,,AA
95.0,0.0,OutOfRange,,,AA
0.0,181.0,OutOfRange,,,AA
2.0,2.0,Short
3.0,3.0,AlsoGood,,,BB
";
        let locations = CsvSource::from_bytes(data.as_bytes().to_vec())
            .verbose(true)
            .load()
            .unwrap();
        let names: Vec<_> = locations.iter().map(|l| l.city.as_str()).collect();
        assert_eq!(names, vec!["Good", "AlsoGood"]);
    }

    #[test]
    fn test_missing_column() {
        let data = "lat,lon,city,admin1,cc\n1,1,A,B,US\n";
        match CsvSource::from_bytes(data.as_bytes().to_vec()).load() {
            Err(GeodecodeError::MissingColumn(col)) => assert_eq!(col, "admin2"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_every_required_column_is_checked() {
        for missing in REQUIRED_COLUMNS {
            let header: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|c| *c != missing)
                .collect();
            let data = format!("{}\n", header.join(","));
            match CsvSource::from_bytes(data.into_bytes()).load() {
                Err(GeodecodeError::MissingColumn(col)) => assert_eq!(col, missing),
                other => panic!("expected MissingColumn({}), got {:?}", missing, other),
            }
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "lat,lon,city,admin1,admin2,cc\n";
        let locations = CsvSource::from_bytes(data.as_bytes().to_vec()).load().unwrap();
        assert!(locations.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvSource::from_path(file.path());
        assert_eq!(source.path(), Some(file.path()));
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CsvSource::from_path("/definitely/not/here/rg_cities1000.csv");
        assert!(matches!(source.load(), Err(GeodecodeError::Io(_))));
    }

    #[test]
    fn test_vec_source() {
        let records = vec![Location::new(1.0, 2.0, "A", "", "", "US")];
        assert_eq!(records.load().unwrap(), records);
    }
}
