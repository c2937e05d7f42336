use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::http_handler::http_request::{
    device_common::{ToAcquisitionRequest, ToScienceRequest},
    request_common::NoBodyHTTPRequestType,
    slider::SliderPositionRequest,
};
use async_trait::async_trait;
use strum_macros::Display;

/// Which camera the slider currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SliderPosition {
    Moving,
    Acquisition,
    Science,
}

/// The mirror slider switching the light path between the two cameras.
#[async_trait]
pub trait Slider: Awaitable {
    async fn to_acquisition(&self) -> Result<(), DeviceError>;
    async fn to_science(&self) -> Result<(), DeviceError>;
    async fn get_pos(&self) -> Result<SliderPosition, DeviceError>;
}

#[derive(Debug)]
pub struct RemoteSlider(RemoteDevice);

impl RemoteSlider {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemoteSlider);

#[async_trait]
impl Slider for RemoteSlider {
    async fn to_acquisition(&self) -> Result<(), DeviceError> {
        ToAcquisitionRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn to_science(&self) -> Result<(), DeviceError> {
        ToScienceRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn get_pos(&self) -> Result<SliderPosition, DeviceError> {
        let resp =
            SliderPositionRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))?;
        resp.position().ok_or_else(|| self.0.protocol_fault("unknown slider position code"))
    }
}
