use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

/// Scheduling priority of a [`Target`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    StrumDisplay,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    /// Will not be observed.
    Never = 1,
    Low = 2,
    #[default]
    Normal = 3,
    High = 4,
    /// Only other `Now` targets may be observed before this one.
    Now = 5,
}

impl Priority {
    pub fn rank(self) -> i32 { self as i32 }

    /// The next higher priority, saturating below `Now`.
    pub fn promoted(self) -> Self {
        match self {
            Priority::Low => Priority::Normal,
            Priority::Normal => Priority::High,
            other => other,
        }
    }
}

/// A photometric filter band, e.g. `"V"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Band(String);

impl Band {
    pub fn new(name: &str) -> Self { Self(String::from(name)) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

fn default_mpo() -> u32 { 1 }

/// A scheduling request for one double star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    id: u64,
    star_id: i64,
    bands: Vec<Band>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    requester: Option<String>,
    /// Number of FITS cubes per band each time the target is selected.
    #[serde(default = "default_mpo")]
    mpo: u32,
    #[serde(default)]
    min_dt_hours: f64,
    #[serde(default)]
    max_dt_hours: Option<f64>,
}

impl Target {
    pub fn new(id: u64, star_id: i64, bands: &[&str]) -> Self {
        Self {
            id,
            star_id,
            bands: bands.iter().map(|b| Band::new(b)).collect(),
            priority: Priority::Normal,
            requester: None,
            mpo: 1,
            min_dt_hours: 0.0,
            max_dt_hours: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_requester(mut self, requester: &str) -> Self {
        self.requester = Some(String::from(requester));
        self
    }

    pub fn with_mpo(mut self, mpo: u32) -> Self {
        self.mpo = mpo;
        self
    }

    pub fn with_revisit_window(mut self, min_dt_hours: f64, max_dt_hours: Option<f64>) -> Self {
        self.min_dt_hours = min_dt_hours;
        self.max_dt_hours = max_dt_hours;
        self
    }

    pub fn id(&self) -> u64 { self.id }
    pub fn star_id(&self) -> i64 { self.star_id }
    pub fn bands(&self) -> &[Band] { &self.bands }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn requester(&self) -> Option<&str> { self.requester.as_deref() }
    pub fn mpo(&self) -> u32 { self.mpo.max(1) }
    pub fn min_dt_hours(&self) -> f64 { self.min_dt_hours }
    pub fn max_dt_hours(&self) -> Option<f64> { self.max_dt_hours }
    pub fn is_schedulable(&self) -> bool { self.priority != Priority::Never }
}
