use crate::catalog::{CatalogGateway, EquatorialCoord};
use crate::config::RpcConfig;
use crate::devices::{
    AcquisitionCamera, Focuser, PlateSolver, RemoteAcquisitionCamera, RemoteDevice,
    RemoteFocuser, RemotePlateSolver, RemoteScienceCamera, RemoteSlider, RemoteTelescope,
    ScienceCamera, Slider, Telescope,
    simulator::{
        SimAcquisitionCamera, SimFocuser, SimPlateSolver, SimScienceCamera, SimSlider,
        SimTelescope,
    },
};
use std::{sync::Arc, time::Duration};

/// The six devices and the catalog, shared between the run manager and its policies.
#[derive(Clone)]
pub struct Keychain {
    telescope: Arc<dyn Telescope>,
    slider: Arc<dyn Slider>,
    focuser: Arc<dyn Focuser>,
    acquisition_camera: Arc<dyn AcquisitionCamera>,
    plate_solver: Arc<dyn PlateSolver>,
    science_camera: Arc<dyn ScienceCamera>,
    catalog: Arc<dyn CatalogGateway>,
}

impl Keychain {
    pub fn new(
        telescope: Arc<dyn Telescope>,
        slider: Arc<dyn Slider>,
        focuser: Arc<dyn Focuser>,
        acquisition_camera: Arc<dyn AcquisitionCamera>,
        plate_solver: Arc<dyn PlateSolver>,
        science_camera: Arc<dyn ScienceCamera>,
        catalog: Arc<dyn CatalogGateway>,
    ) -> Self {
        Self {
            telescope,
            slider,
            focuser,
            acquisition_camera,
            plate_solver,
            science_camera,
            catalog,
        }
    }

    /// Connects to the device services named in `rpc`.
    ///
    /// # Errors
    /// If one of the HTTP clients cannot be built.
    pub fn remote(rpc: &RpcConfig, catalog: Arc<dyn CatalogGateway>) -> Result<Self, reqwest::Error> {
        let timeout = rpc.timeout();
        Ok(Self::new(
            Arc::new(RemoteTelescope::new(RemoteDevice::new("telescope", &rpc.telescope, timeout)?)),
            Arc::new(RemoteSlider::new(RemoteDevice::new("slider", &rpc.slider, timeout)?)),
            Arc::new(RemoteFocuser::new(RemoteDevice::new("focuser", &rpc.focuser, timeout)?)),
            Arc::new(RemoteAcquisitionCamera::new(RemoteDevice::new(
                "acquisition_camera",
                &rpc.acquisition,
                timeout,
            )?)),
            Arc::new(RemotePlateSolver::new(RemoteDevice::new(
                "plate_solver",
                &rpc.plate_solver,
                timeout,
            )?)),
            Arc::new(RemoteScienceCamera::new(RemoteDevice::new(
                "science_camera",
                &rpc.science_camera,
                timeout,
            )?)),
            catalog,
        ))
    }

    /// In-process simulators with plausible latencies, pointing at `park`.
    pub fn simulated(park: EquatorialCoord, catalog: Arc<dyn CatalogGateway>) -> Self {
        let telescope =
            Arc::new(SimTelescope::new(park).with_slew_rate(4.0).with_pointing_error(0.05));
        let solver = SimPlateSolver::tracking(Arc::clone(&telescope), 0.002, 0.1)
            .with_latency(Duration::from_millis(800));
        Self::new(
            telescope,
            Arc::new(SimSlider::new(Duration::from_secs(2))),
            Arc::new(SimFocuser::new(Duration::from_secs(1))),
            Arc::new(SimAcquisitionCamera::new()),
            Arc::new(solver),
            Arc::new(SimScienceCamera::new(Duration::from_secs(5))),
            catalog,
        )
    }

    pub fn telescope(&self) -> Arc<dyn Telescope> { Arc::clone(&self.telescope) }
    pub fn slider(&self) -> Arc<dyn Slider> { Arc::clone(&self.slider) }
    pub fn focuser(&self) -> Arc<dyn Focuser> { Arc::clone(&self.focuser) }
    pub fn acquisition_camera(&self) -> Arc<dyn AcquisitionCamera> {
        Arc::clone(&self.acquisition_camera)
    }
    pub fn plate_solver(&self) -> Arc<dyn PlateSolver> { Arc::clone(&self.plate_solver) }
    pub fn science_camera(&self) -> Arc<dyn ScienceCamera> { Arc::clone(&self.science_camera) }
    pub fn catalog(&self) -> Arc<dyn CatalogGateway> { Arc::clone(&self.catalog) }
}
