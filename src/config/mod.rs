//! TOML configuration. Every field has a default so a partial (or missing) file is valid.

mod config_error;
#[cfg(test)]
mod tests;

pub use config_error::ConfigError;

use crate::{
    catalog::Band,
    run_control::{RunConfig, Tolerance},
    scheduling::{CostWeights, SingleSearch},
    warn,
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulate: bool,
    pub rpc: RpcConfig,
    pub acquisition: AcquisitionConfig,
    pub timing: TimingConfig,
    pub scheduler: SchedulerConfig,
    pub site: SiteConfig,
    pub filters: FilterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulate: true,
            rpc: RpcConfig::default(),
            acquisition: AcquisitionConfig::default(),
            timing: TimingConfig::default(),
            scheduler: SchedulerConfig::default(),
            site: SiteConfig::default(),
            filters: FilterConfig::default(),
        }
    }
}

impl Config {
    /// Environment variable naming the configuration file.
    pub const PATH_VAR: &'static str = "SPECKLE_CONFIG";
    pub const DEFAULT_PATH: &'static str = "speckle.toml";

    /// Reads the file named by `SPECKLE_CONFIG`, or `speckle.toml`.
    pub async fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(Self::PATH_VAR).unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        Self::load(path).await
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No configuration at {}, using defaults.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(text)?) }

    pub fn run_config(&self) -> RunConfig {
        let acq = &self.acquisition;
        RunConfig {
            acq_itime: acq.itime_secs,
            plate_solve_tries: acq.plate_solve_tries,
            max_refine_rounds: acq.max_refine_rounds,
            tolerance: Tolerance { ra: acq.ra_err, dec: acq.dec_err },
            scicam_offset: (acq.scicam_x, acq.scicam_y),
            autofocus: acq.autofocus,
            target_well_fill: acq.target_well_fill,
            poll_interval: Duration::from_millis(self.timing.poll_interval_ms),
            settle_time: Duration::from_millis(self.timing.settle_ms),
        }
    }

    pub fn single_search(&self) -> SingleSearch {
        SingleSearch {
            max_dist_ra: self.scheduler.max_single_dist_ra,
            max_dist_dec: self.scheduler.max_single_dist_dec,
            max_widenings: self.scheduler.max_search_widenings,
        }
    }

    pub fn cost_weights(&self) -> CostWeights {
        let s = &self.scheduler;
        CostWeights {
            distance: s.distance_weight,
            time: s.time_weight,
            moon: s.moon_weight,
            hour_angle: s.hour_angle_weight,
            priority: s.priority_weight,
            moon_exclusion_deg: s.moon_exclusion_deg,
        }
    }

    pub fn bands(&self) -> Vec<Band> { self.filters.bands.iter().map(|b| Band::new(b)).collect() }
}

/// Base URLs of the device services and the operator endpoint address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub telescope: String,
    pub slider: String,
    pub focuser: String,
    pub acquisition: String,
    pub plate_solver: String,
    pub science_camera: String,
    pub console_bind: String,
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            telescope: "http://localhost:5001".to_string(),
            slider: "http://localhost:5002".to_string(),
            focuser: "http://localhost:5003".to_string(),
            acquisition: "http://localhost:5004".to_string(),
            plate_solver: "http://localhost:5005".to_string(),
            science_camera: "http://localhost:5006".to_string(),
            console_bind: "0.0.0.0:1337".to_string(),
            timeout_secs: 5,
        }
    }
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub itime_secs: f64,
    pub plate_solve_tries: usize,
    pub max_refine_rounds: usize,
    /// Science camera center in acquisition camera pixels, relative to the image center.
    pub scicam_x: f64,
    pub scicam_y: f64,
    pub ra_err: f64,
    pub dec_err: f64,
    pub autofocus: bool,
    pub target_well_fill: f64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            itime_secs: 1.0,
            plate_solve_tries: 3,
            max_refine_rounds: 10,
            scicam_x: 0.0,
            scicam_y: 0.0,
            ra_err: 0.01,
            dec_err: 0.01,
            autofocus: false,
            target_well_fill: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self { Self { poll_interval_ms: 250, settle_ms: 2000 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PolicyKind {
    InOrder,
    #[default]
    Weighted,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub policy: PolicyKind,
    pub catalog_dir: String,
    pub max_single_dist_ra: f64,
    pub max_single_dist_dec: f64,
    pub max_search_widenings: u32,
    pub distance_weight: f64,
    pub time_weight: f64,
    pub moon_weight: f64,
    pub hour_angle_weight: f64,
    pub priority_weight: f64,
    pub moon_exclusion_deg: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let search = SingleSearch::default();
        Self {
            policy: PolicyKind::default(),
            catalog_dir: "catalog".to_string(),
            max_single_dist_ra: search.max_dist_ra,
            max_single_dist_dec: search.max_dist_dec,
            max_search_widenings: search.max_widenings,
            distance_weight: 1.0,
            time_weight: 1.0,
            moon_weight: 0.0,
            hour_angle_weight: 0.0,
            priority_weight: 10.0,
            moon_exclusion_deg: 10.0,
        }
    }
}

/// Observatory location; longitude is east positive.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub bands: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { bands: ["B", "V", "R", "I"].iter().map(ToString::to_string).collect() }
    }
}
