use super::{Awaitable, DeviceError, RemoteDevice, remote_device::remote_awaitable};
use crate::{
    catalog::EquatorialCoord,
    http_handler::http_request::{
        plate_solver::{PlateSolutionRequest, SolveRequest, TransformRequest},
        request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
    },
};
use async_trait::async_trait;

/// Result of a successful plate solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateSolution {
    /// Right ascension of the image center in degrees.
    pub ra_deg: f64,
    /// Declination of the image center in degrees.
    pub dec_deg: f64,
    /// Position angle of the frame in degrees.
    pub angle_deg: f64,
    /// Plate scale along x in degrees per pixel.
    pub xscale: f64,
    /// Plate scale along y in degrees per pixel.
    pub yscale: f64,
}

impl PlateSolution {
    pub fn center(&self) -> EquatorialCoord { EquatorialCoord::new(self.ra_deg, self.dec_deg) }
}

/// The plate solving service. Its readiness is that of the last submitted solve.
#[async_trait]
pub trait PlateSolver: Awaitable {
    /// Submits an image for solving.
    async fn solve(&self, path: &str) -> Result<(), DeviceError>;
    /// The latest solution, `None` if no stars matched.
    async fn plate_solution(&self) -> Result<Option<PlateSolution>, DeviceError>;
    /// Sky position of the pixel offset `(x, y)` from the image center under the latest solution.
    async fn transform_plate_to_j2000(
        &self,
        x: f64,
        y: f64,
    ) -> Result<Option<EquatorialCoord>, DeviceError>;
}

#[derive(Debug)]
pub struct RemotePlateSolver(RemoteDevice);

impl RemotePlateSolver {
    pub fn new(device: RemoteDevice) -> Self { Self(device) }
}

remote_awaitable!(RemotePlateSolver);

#[async_trait]
impl PlateSolver for RemotePlateSolver {
    async fn solve(&self, path: &str) -> Result<(), DeviceError> {
        SolveRequest { path: String::from(path) }
            .send_request(self.0.client())
            .await
            .map_err(|e| self.0.fault(e))
    }

    async fn plate_solution(&self) -> Result<Option<PlateSolution>, DeviceError> {
        PlateSolutionRequest {}
            .send_request(self.0.client())
            .await
            .map(|resp| resp.solution())
            .map_err(|e| self.0.fault(e))
    }

    async fn transform_plate_to_j2000(
        &self,
        x: f64,
        y: f64,
    ) -> Result<Option<EquatorialCoord>, DeviceError> {
        TransformRequest { x, y }
            .send_request(self.0.client())
            .await
            .map(|resp| resp.position().map(EquatorialCoord::from))
            .map_err(|e| self.0.fault(e))
    }
}
