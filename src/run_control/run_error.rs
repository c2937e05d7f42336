use crate::{
    catalog::CatalogError,
    devices::{DeviceError, DeviceFault},
};
use std::fmt::{Display, Formatter};

/// Reasons a single target is abandoned.
#[derive(Debug)]
pub enum RunError {
    /// The mount refused or failed a slew.
    Slew(DeviceError),
    /// Any other device fault.
    Device(DeviceError),
    /// The acquisition camera produced no image.
    ImageRetrieval,
    /// Every plate solve of a refinement round failed.
    PlateSolveExhausted { tries: usize },
    /// The pointing did not converge within the allowed rounds.
    NoConvergence { rounds: usize },
    /// No sky transform for the science camera offset.
    NoPlateTransform,
    /// The target did not land in the science camera.
    NotInScienceCamera,
    Catalog(CatalogError),
    /// A panic inside the pipeline, downgraded to a target failure.
    Panicked(String),
}

impl RunError {
    /// Names the device whose RPC transport failed, if that is why the target was lost.
    pub fn unreachable_device(&self) -> Option<&str> {
        match self {
            RunError::Slew(e) | RunError::Device(e) => match e.fault() {
                DeviceFault::Transport(_) => Some(e.device()),
                DeviceFault::Protocol(_) | DeviceFault::Rejected(_) => None,
            },
            _ => None,
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Slew(e) => write!(f, "slew failed: {e}"),
            RunError::Device(e) => write!(f, "device fault: {e}"),
            RunError::ImageRetrieval => write!(f, "acquisition image could not be retrieved"),
            RunError::PlateSolveExhausted { tries } => {
                write!(f, "plate solving failed {tries} times")
            }
            RunError::NoConvergence { rounds } => {
                write!(f, "pointing did not converge in {rounds} rounds")
            }
            RunError::NoPlateTransform => write!(f, "no plate transform for the science camera"),
            RunError::NotInScienceCamera => write!(f, "target not in science camera"),
            RunError::Catalog(e) => write!(f, "{e}"),
            RunError::Panicked(msg) => write!(f, "pipeline panicked: {msg}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<DeviceError> for RunError {
    fn from(value: DeviceError) -> Self { RunError::Device(value) }
}

impl From<CatalogError> for RunError {
    fn from(value: CatalogError) -> Self { RunError::Catalog(value) }
}
