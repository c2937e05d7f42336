use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::{
    catalog::EquatorialCoord,
    http_handler::http_request::{
        request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
        telescope::{
            ParkRequest, SlewAbsRequest, SlewRelRequest, TelescopePositionRequest, UnparkRequest,
        },
    },
};
use async_trait::async_trait;

/// The mount.
#[async_trait]
pub trait Telescope: Awaitable {
    /// Starts an absolute slew to `target`.
    async fn slew_abs(&self, target: EquatorialCoord) -> Result<(), DeviceError>;
    /// Starts a relative slew by the given RA/Dec offsets in degrees.
    async fn slew_rel(&self, d_ra_deg: f64, d_dec_deg: f64) -> Result<(), DeviceError>;
    /// Current mount position.
    async fn get_pos(&self) -> Result<EquatorialCoord, DeviceError>;
    async fn park(&self) -> Result<(), DeviceError>;
    async fn unpark(&self) -> Result<(), DeviceError>;
}

/// Mount reachable through its device service.
#[derive(Debug)]
pub struct RemoteTelescope(RemoteDevice);

impl RemoteTelescope {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemoteTelescope);

#[async_trait]
impl Telescope for RemoteTelescope {
    async fn slew_abs(&self, target: EquatorialCoord) -> Result<(), DeviceError> {
        let req = SlewAbsRequest { ra_deg: target.ra_deg(), dec_deg: target.dec_deg() };
        req.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn slew_rel(&self, d_ra_deg: f64, d_dec_deg: f64) -> Result<(), DeviceError> {
        let req = SlewRelRequest { ra_deg: d_ra_deg, dec_deg: d_dec_deg };
        req.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn get_pos(&self) -> Result<EquatorialCoord, DeviceError> {
        TelescopePositionRequest {}
            .send_request(self.0.client())
            .await
            .map(EquatorialCoord::from)
            .map_err(|e| self.0.fault(e))
    }

    async fn park(&self) -> Result<(), DeviceError> {
        ParkRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }

    async fn unpark(&self) -> Result<(), DeviceError> {
        UnparkRequest {}.send_request(self.0.client()).await.map_err(|e| self.0.fault(e))
    }
}
