use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::http_handler::http_request::{
    device_common::{ToAcquisitionRequest, ToScienceRequest},
    focuser::FocusRequest,
    request_common::NoBodyHTTPRequestType,
};
use async_trait::async_trait;

/// The focuser. Science and acquisition camera differ by a fixed focus offset.
///
/// `to_science` and `to_acquisition` are idempotent: the offset is applied at most once.
#[async_trait]
pub trait Focuser: Awaitable {
    /// Starts an autofocus run on the acquisition camera.
    async fn focus(&self) -> Result<(), DeviceError>;
    async fn to_science(&self) -> Result<(), DeviceError>;
    async fn to_acquisition(&self) -> Result<(), DeviceError>;
}

#[derive(Debug)]
pub struct RemoteFocuser(RemoteDevice);

impl RemoteFocuser {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemoteFocuser);

#[async_trait]
impl Focuser for RemoteFocuser {
    async fn focus(&self) -> Result<(), DeviceError> {
        FocusRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn to_science(&self) -> Result<(), DeviceError> {
        ToScienceRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn to_acquisition(&self) -> Result<(), DeviceError> {
        ToAcquisitionRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }
}
