use super::{Band, EquatorialCoord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Science camera settings an exposure was taken with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureInfo {
    pub emgain: f64,
    pub itime: f64,
    pub roi_width: u32,
    pub roi_height: u32,
}

/// Immutable log record of one science exposure of a double star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    filename: String,
    star_id: i64,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    exposure: ExposureInfo,
    requester: Option<String>,
    band: Band,
    ra_deg: f64,
    dec_deg: f64,
}

impl Observation {
    pub fn new(
        filename: String,
        star_id: i64,
        exposure: ExposureInfo,
        requester: Option<String>,
        band: Band,
        position: EquatorialCoord,
    ) -> Self {
        Self {
            filename,
            star_id,
            timestamp: Utc::now(),
            exposure,
            requester,
            band,
            ra_deg: position.ra_deg(),
            dec_deg: position.dec_deg(),
        }
    }

    pub fn filename(&self) -> &str { &self.filename }
    pub fn star_id(&self) -> i64 { self.star_id }
    pub fn timestamp(&self) -> DateTime<Utc> { self.timestamp }
    pub fn exposure(&self) -> ExposureInfo { self.exposure }
    pub fn requester(&self) -> Option<&str> { self.requester.as_deref() }
    pub fn band(&self) -> &Band { &self.band }
    pub fn position(&self) -> EquatorialCoord { EquatorialCoord::new(self.ra_deg, self.dec_deg) }
}
