use crate::http_handler::HTTPError;
use std::fmt::{Display, Formatter};

/// What went wrong talking to a device.
#[derive(Debug)]
pub enum DeviceFault {
    /// The RPC layer failed.
    Transport(HTTPError),
    /// The device answered with something outside its contract.
    Protocol(String),
    /// The device refused the command.
    Rejected(String),
}

/// A device-level fault, tagged with the device it came from.
#[derive(Debug)]
pub struct DeviceError {
    device: String,
    fault: DeviceFault,
}

impl DeviceError {
    pub fn new(device: &str, fault: DeviceFault) -> Self {
        Self { device: String::from(device), fault }
    }

    pub fn device(&self) -> &str { &self.device }
    pub fn fault(&self) -> &DeviceFault { &self.fault }
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.fault {
            DeviceFault::Transport(e) => write!(f, "{}: {e}", self.device),
            DeviceFault::Protocol(msg) => write!(f, "{}: unexpected answer: {msg}", self.device),
            DeviceFault::Rejected(msg) => write!(f, "{}: command rejected: {msg}", self.device),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.fault {
            DeviceFault::Transport(e) => Some(e),
            _ => None,
        }
    }
}
