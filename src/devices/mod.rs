//! Device capability contract.
//!
//! Every controlled device is an [`Awaitable`]: it has a name and a non-blocking `ready`
//! predicate. Commands return as soon as the device accepted them; waiting for completion
//! is left to the run manager, which polls `ready`.

mod acquisition_camera;
mod awaitable;
mod device_error;
mod focuser;
mod plate_solver;
mod remote_device;
mod science_camera;
pub mod simulator;
mod slider;
mod telescope;
#[cfg(test)]
mod tests;

pub use acquisition_camera::{AcquisitionCamera, RemoteAcquisitionCamera};
pub use awaitable::Awaitable;
pub use device_error::{DeviceError, DeviceFault};
pub use focuser::{Focuser, RemoteFocuser};
pub use plate_solver::{PlateSolution, PlateSolver, RemotePlateSolver};
pub use remote_device::RemoteDevice;
pub use science_camera::{RemoteScienceCamera, ScienceCamera};
pub use slider::{RemoteSlider, Slider, SliderPosition};
pub use telescope::{RemoteTelescope, Telescope};
