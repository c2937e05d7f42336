use crate::catalog::CatalogError;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SchedulerError {
    /// Every pending target has been consumed or is currently excluded.
    NoObservableTargets,
    /// Calibration star selection was asked for a group that is not exactly one double.
    UnsupportedGroup(usize),
    /// The widening reference star search hit its bound.
    NoReferenceStar { double_id: i64, half_width_ra: f64, half_width_dec: f64 },
    Catalog(CatalogError),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::NoObservableTargets => write!(f, "no observable targets left"),
            SchedulerError::UnsupportedGroup(n) => {
                write!(f, "calibration for groups of {n} double stars is not supported")
            }
            SchedulerError::NoReferenceStar { double_id, half_width_ra, half_width_dec } => write!(
                f,
                "no reference star within ±{half_width_ra}° RA, ±{half_width_dec}° Dec of double {double_id}"
            ),
            SchedulerError::Catalog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<CatalogError> for SchedulerError {
    fn from(value: CatalogError) -> Self { SchedulerError::Catalog(value) }
}
