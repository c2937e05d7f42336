use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::http_handler::http_request::{
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
    science_camera::{
        EmGainRequest, FilenameRequest, ItimeRequest, RoiRequest, SetItimeRequest,
        StartAcquisitionRequest, TargetInCameraRequest, WellFillRequest,
    },
};
use async_trait::async_trait;

/// The EMCCD speckle camera.
#[async_trait]
pub trait ScienceCamera: Awaitable {
    /// Whether the current pointing puts the target inside the region of interest.
    async fn target_in_camera(&self) -> Result<bool, DeviceError>;
    /// Starts writing the next FITS cube and advances the sequence number.
    async fn start_acquisition(&self) -> Result<(), DeviceError>;
    /// File name of the latest cube.
    async fn get_filename(&self) -> Result<String, DeviceError>;
    /// Integration time in seconds.
    async fn get_itime(&self) -> Result<f64, DeviceError>;
    async fn set_itime(&self, seconds: f64) -> Result<(), DeviceError>;
    async fn get_emgain(&self) -> Result<f64, DeviceError>;
    /// Region of interest as `(width, height)` in pixels.
    async fn get_roi(&self) -> Result<(u32, u32), DeviceError>;
    /// Average well fill of recent frames as `(fraction, adu)`.
    async fn get_avg_well_fill(&self) -> Result<(f64, f64), DeviceError>;
}

#[derive(Debug)]
pub struct RemoteScienceCamera(RemoteDevice);

impl RemoteScienceCamera {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemoteScienceCamera);

#[async_trait]
impl ScienceCamera for RemoteScienceCamera {
    async fn target_in_camera(&self) -> Result<bool, DeviceError> {
        TargetInCameraRequest {}
            .send_request(self.0.client())
            .await
            .map(|flag| flag.is_set())
            .map_err(|e| self.0.fault(e))
    }

    async fn start_acquisition(&self) -> Result<(), DeviceError> {
        StartAcquisitionRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn get_filename(&self) -> Result<String, DeviceError> {
        FilenameRequest {}
            .send_request(self.0.client())
            .await
            .map(|resp| resp.into_filename())
            .map_err(|e| self.0.fault(e))
    }

    async fn get_itime(&self) -> Result<f64, DeviceError> {
        ItimeRequest {}
            .send_request(self.0.client())
            .await
            .map(|v| v.value())
            .map_err(|e| self.0.fault(e))
    }

    async fn set_itime(&self, seconds: f64) -> Result<(), DeviceError> {
        SetItimeRequest { seconds }.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn get_emgain(&self) -> Result<f64, DeviceError> {
        EmGainRequest {}
            .send_request(self.0.client())
            .await
            .map(|v| v.value())
            .map_err(|e| self.0.fault(e))
    }

    async fn get_roi(&self) -> Result<(u32, u32), DeviceError> {
        RoiRequest {}
            .send_request(self.0.client())
            .await
            .map(|roi| (roi.width(), roi.height()))
            .map_err(|e| self.0.fault(e))
    }

    async fn get_avg_well_fill(&self) -> Result<(f64, f64), DeviceError> {
        WellFillRequest {}
            .send_request(self.0.client())
            .await
            .map(|fill| (fill.fraction(), fill.adu()))
            .map_err(|e| self.0.fault(e))
    }
}
