use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::http_handler::http_request::{
    acquisition::{ImagePathRequest, TakeTempLightRequest},
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
};
use async_trait::async_trait;

/// The wide field camera used for plate solving.
#[async_trait]
pub trait AcquisitionCamera: Awaitable {
    /// Starts a temporary, non-archival exposure.
    async fn take_temp_light(&self, seconds: f64) -> Result<(), DeviceError>;
    /// Path of the latest frame, `None` if it could not be retrieved.
    async fn get_img_path(&self) -> Result<Option<String>, DeviceError>;
}

#[derive(Debug)]
pub struct RemoteAcquisitionCamera(RemoteDevice);

impl RemoteAcquisitionCamera {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemoteAcquisitionCamera);

#[async_trait]
impl AcquisitionCamera for RemoteAcquisitionCamera {
    async fn take_temp_light(&self, seconds: f64) -> Result<(), DeviceError> {
        TakeTempLightRequest { seconds }
            .send_request(self.0.client())
            .await
            .map_err(|e| self.0.fault(e))
    }

    async fn get_img_path(&self) -> Result<Option<String>, DeviceError> {
        ImagePathRequest {}
            .send_request(self.0.client())
            .await
            .map(|resp| resp.into_path())
            .map_err(|e| self.0.fault(e))
    }
}
