use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum_macros::{Display as StrumDisplay, EnumString};

/// A J2000 equatorial position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoord {
    ra_deg: f64,
    dec_deg: f64,
}

impl EquatorialCoord {
    pub const fn new(ra_deg: f64, dec_deg: f64) -> Self { Self { ra_deg, dec_deg } }
    pub fn ra_deg(&self) -> f64 { self.ra_deg }
    pub fn dec_deg(&self) -> f64 { self.dec_deg }
}

impl Display for EquatorialCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(RA {:.5}°, Dec {:+.5}°)", self.ra_deg, self.dec_deg)
    }
}

/// Catalog table a scheduled star originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum CatalogTable {
    DoubleStars,
    ReferenceStars,
}

/// A double star as listed in the double star catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleStar {
    id: i64,
    #[serde(default)]
    catalog: String,
    name: String,
    ra_deg: f64,
    dec_deg: f64,
    #[serde(default)]
    stype: Option<String>,
    #[serde(default)]
    discoverer: Option<String>,
    #[serde(default)]
    components: Option<String>,
    #[serde(default)]
    first_sep: Option<f64>,
    #[serde(default)]
    last_sep: Option<f64>,
    #[serde(default)]
    primary_mag: Option<f64>,
    #[serde(default)]
    secondary_mag: Option<f64>,
    #[serde(default)]
    nobs: Option<u32>,
}

impl DoubleStar {
    pub fn new(id: i64, name: &str, coord: EquatorialCoord, stype: Option<&str>) -> Self {
        Self {
            id,
            catalog: String::from("WDS"),
            name: String::from(name),
            ra_deg: coord.ra_deg(),
            dec_deg: coord.dec_deg(),
            stype: stype.map(String::from),
            discoverer: None,
            components: None,
            first_sep: None,
            last_sep: None,
            primary_mag: None,
            secondary_mag: None,
            nobs: None,
        }
    }

    pub fn id(&self) -> i64 { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn catalog(&self) -> &str { &self.catalog }
    pub fn coord(&self) -> EquatorialCoord { EquatorialCoord::new(self.ra_deg, self.dec_deg) }
    pub fn stype(&self) -> Option<&str> { self.stype.as_deref() }
    /// Most recent measured separation in arc seconds.
    pub fn separation(&self) -> Option<f64> { self.last_sep.or(self.first_sep) }
    /// Primary and secondary magnitudes.
    pub fn magnitudes(&self) -> (Option<f64>, Option<f64>) {
        (self.primary_mag, self.secondary_mag)
    }
}

/// An isolated calibration star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStar {
    id: i64,
    name: String,
    ra_deg: f64,
    dec_deg: f64,
    #[serde(default)]
    stype: Option<String>,
    #[serde(default)]
    mag_b: Option<f64>,
    #[serde(default)]
    mag_v: Option<f64>,
}

impl ReferenceStar {
    pub fn new(id: i64, name: &str, coord: EquatorialCoord, stype: Option<&str>) -> Self {
        Self {
            id,
            name: String::from(name),
            ra_deg: coord.ra_deg(),
            dec_deg: coord.dec_deg(),
            stype: stype.map(String::from),
            mag_b: None,
            mag_v: None,
        }
    }

    pub fn id(&self) -> i64 { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn coord(&self) -> EquatorialCoord { EquatorialCoord::new(self.ra_deg, self.dec_deg) }
    pub fn stype(&self) -> Option<&str> { self.stype.as_deref() }
    pub fn mag_v(&self) -> Option<f64> { self.mag_v }
}

/// Either kind of star the scheduler hands out.
#[derive(Debug, Clone, PartialEq)]
pub enum Star {
    Double(DoubleStar),
    Reference(ReferenceStar),
}

impl Star {
    pub fn id(&self) -> i64 {
        match self {
            Star::Double(d) => d.id(),
            Star::Reference(r) => r.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Star::Double(d) => d.name(),
            Star::Reference(r) => r.name(),
        }
    }

    pub fn coord(&self) -> EquatorialCoord {
        match self {
            Star::Double(d) => d.coord(),
            Star::Reference(r) => r.coord(),
        }
    }

    pub fn catalog_table(&self) -> CatalogTable {
        match self {
            Star::Double(_) => CatalogTable::DoubleStars,
            Star::Reference(_) => CatalogTable::ReferenceStars,
        }
    }

    pub fn is_double(&self) -> bool { matches!(self, Star::Double(_)) }
}

impl Display for Star {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{} '{}' at {}", self.catalog_table(), self.id(), self.name(), self.coord())
    }
}
