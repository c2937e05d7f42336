//! In-process stand-ins for the device services.
//!
//! Used when the configuration sets `simulate = true` and by the scenario tests. Commands
//! complete after a configurable latency, measured with `tokio::time::Instant`.

use super::{
    AcquisitionCamera, Awaitable, DeviceError, DeviceFault, Focuser, PlateSolution, PlateSolver,
    ScienceCamera, Slider, SliderPosition, Telescope,
};
use crate::{catalog::EquatorialCoord, event};
use async_trait::async_trait;
use rand::Rng;
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::{sync::Mutex, time::Instant};

fn ready_at(busy_until: Instant) -> bool { Instant::now() >= busy_until }

fn jitter(max_abs: f64) -> f64 {
    if max_abs > 0.0 { rand::rng().random_range(-max_abs..=max_abs) } else { 0.0 }
}

struct MountState {
    position: EquatorialCoord,
    busy_until: Instant,
    parked: bool,
}

/// Simulated mount.
pub struct SimTelescope {
    state: Mutex<MountState>,
    /// Slew speed in degrees per second.
    slew_rate: f64,
    /// Maximum absolute pointing error per axis after an absolute slew.
    pointing_error: f64,
    fail_slews: AtomicBool,
    slews: AtomicUsize,
}

impl SimTelescope {
    const NAME: &'static str = "telescope";

    /// An unparked mount at `position` with instantaneous, perfect slews.
    pub fn new(position: EquatorialCoord) -> Self {
        Self {
            state: Mutex::new(MountState { position, busy_until: Instant::now(), parked: false }),
            slew_rate: f64::INFINITY,
            pointing_error: 0.0,
            fail_slews: AtomicBool::new(false),
            slews: AtomicUsize::new(0),
        }
    }

    pub fn with_slew_rate(mut self, deg_per_s: f64) -> Self {
        self.slew_rate = deg_per_s;
        self
    }

    pub fn with_pointing_error(mut self, max_abs_deg: f64) -> Self {
        self.pointing_error = max_abs_deg;
        self
    }

    /// Makes every following absolute slew fail.
    pub fn fail_slews(&self, fail: bool) { self.fail_slews.store(fail, Ordering::Relaxed); }

    pub async fn position(&self) -> EquatorialCoord { self.state.lock().await.position }
    pub async fn is_parked(&self) -> bool { self.state.lock().await.parked }
    /// Number of accepted slews, absolute and relative.
    pub fn slew_count(&self) -> usize { self.slews.load(Ordering::Relaxed) }

    async fn move_to(&self, target: EquatorialCoord) -> Result<(), DeviceError> {
        let mut state = self.state.lock().await;
        if state.parked {
            return Err(DeviceError::new(
                Self::NAME,
                DeviceFault::Rejected(String::from("mount is parked")),
            ));
        }
        let dist = crate::util::astro::angular_separation(state.position, target);
        let travel = Duration::try_from_secs_f64(dist / self.slew_rate).unwrap_or(Duration::ZERO);
        state.busy_until = Instant::now() + travel;
        state.position = EquatorialCoord::new(target.ra_deg().rem_euclid(360.0), target.dec_deg());
        self.slews.fetch_add(1, Ordering::Relaxed);
        event!("Simulated mount slewing to {target}.");
        Ok(())
    }
}

#[async_trait]
impl Awaitable for SimTelescope {
    fn name(&self) -> &str { Self::NAME }
    async fn ready(&self) -> Result<bool, DeviceError> {
        Ok(ready_at(self.state.lock().await.busy_until))
    }
}

#[async_trait]
impl Telescope for SimTelescope {
    async fn slew_abs(&self, target: EquatorialCoord) -> Result<(), DeviceError> {
        if self.fail_slews.load(Ordering::Relaxed) {
            return Err(DeviceError::new(
                Self::NAME,
                DeviceFault::Rejected(String::from("slew aborted")),
            ));
        }
        let landed = EquatorialCoord::new(
            target.ra_deg() + jitter(self.pointing_error),
            target.dec_deg() + jitter(self.pointing_error),
        );
        self.move_to(landed).await
    }

    async fn slew_rel(&self, d_ra_deg: f64, d_dec_deg: f64) -> Result<(), DeviceError> {
        let pos = self.position().await;
        self.move_to(EquatorialCoord::new(pos.ra_deg() + d_ra_deg, pos.dec_deg() + d_dec_deg))
            .await
    }

    async fn get_pos(&self) -> Result<EquatorialCoord, DeviceError> { Ok(self.position().await) }

    async fn park(&self) -> Result<(), DeviceError> {
        self.state.lock().await.parked = true;
        Ok(())
    }

    async fn unpark(&self) -> Result<(), DeviceError> {
        self.state.lock().await.parked = false;
        Ok(())
    }
}

struct SliderState {
    position: SliderPosition,
    busy_until: Instant,
}

/// Simulated slider; switching takes a fixed time during which it reports `Moving`.
pub struct SimSlider {
    state: Mutex<SliderState>,
    switch_time: Duration,
}

impl SimSlider {
    pub fn new(switch_time: Duration) -> Self {
        Self {
            state: Mutex::new(SliderState {
                position: SliderPosition::Acquisition,
                busy_until: Instant::now(),
            }),
            switch_time,
        }
    }

    async fn switch(&self, to: SliderPosition) {
        let mut state = self.state.lock().await;
        if state.position != to {
            state.position = to;
            state.busy_until = Instant::now() + self.switch_time;
        }
    }
}

#[async_trait]
impl Awaitable for SimSlider {
    fn name(&self) -> &str { "slider" }
    async fn ready(&self) -> Result<bool, DeviceError> {
        Ok(ready_at(self.state.lock().await.busy_until))
    }
}

#[async_trait]
impl Slider for SimSlider {
    async fn to_acquisition(&self) -> Result<(), DeviceError> {
        self.switch(SliderPosition::Acquisition).await;
        Ok(())
    }

    async fn to_science(&self) -> Result<(), DeviceError> {
        self.switch(SliderPosition::Science).await;
        Ok(())
    }

    async fn get_pos(&self) -> Result<SliderPosition, DeviceError> {
        let state = self.state.lock().await;
        Ok(if ready_at(state.busy_until) { state.position } else { SliderPosition::Moving })
    }
}

struct FocuserState {
    offset_applied: bool,
    busy_until: Instant,
}

/// Simulated focuser with idempotent science offset bookkeeping.
pub struct SimFocuser {
    state: Mutex<FocuserState>,
    focus_time: Duration,
    focus_runs: AtomicUsize,
}

impl SimFocuser {
    pub fn new(focus_time: Duration) -> Self {
        Self {
            state: Mutex::new(FocuserState { offset_applied: false, busy_until: Instant::now() }),
            focus_time,
            focus_runs: AtomicUsize::new(0),
        }
    }

    pub async fn science_offset_applied(&self) -> bool { self.state.lock().await.offset_applied }
    pub fn focus_runs(&self) -> usize { self.focus_runs.load(Ordering::Relaxed) }

    async fn apply_offset(&self, applied: bool) {
        let mut state = self.state.lock().await;
        if state.offset_applied != applied {
            state.offset_applied = applied;
            state.busy_until = Instant::now() + self.focus_time / 4;
        }
    }
}

#[async_trait]
impl Awaitable for SimFocuser {
    fn name(&self) -> &str { "focuser" }
    async fn ready(&self) -> Result<bool, DeviceError> {
        Ok(ready_at(self.state.lock().await.busy_until))
    }
}

#[async_trait]
impl Focuser for SimFocuser {
    async fn focus(&self) -> Result<(), DeviceError> {
        self.state.lock().await.busy_until = Instant::now() + self.focus_time;
        self.focus_runs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn to_science(&self) -> Result<(), DeviceError> {
        self.apply_offset(true).await;
        Ok(())
    }

    async fn to_acquisition(&self) -> Result<(), DeviceError> {
        self.apply_offset(false).await;
        Ok(())
    }
}

/// Simulated acquisition camera producing numbered temporary frames.
pub struct SimAcquisitionCamera {
    busy_until: Mutex<Instant>,
    frames: AtomicUsize,
    lose_frames: AtomicBool,
}

impl SimAcquisitionCamera {
    pub fn new() -> Self {
        Self {
            busy_until: Mutex::new(Instant::now()),
            frames: AtomicUsize::new(0),
            lose_frames: AtomicBool::new(false),
        }
    }

    /// Makes image retrieval fail from now on.
    pub fn lose_frames(&self, lose: bool) { self.lose_frames.store(lose, Ordering::Relaxed); }
    pub fn frame_count(&self) -> usize { self.frames.load(Ordering::Relaxed) }
}

impl Default for SimAcquisitionCamera {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl Awaitable for SimAcquisitionCamera {
    fn name(&self) -> &str { "acquisition_camera" }
    async fn ready(&self) -> Result<bool, DeviceError> { Ok(ready_at(*self.busy_until.lock().await)) }
}

#[async_trait]
impl AcquisitionCamera for SimAcquisitionCamera {
    async fn take_temp_light(&self, seconds: f64) -> Result<(), DeviceError> {
        let exposure = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        *self.busy_until.lock().await = Instant::now() + exposure;
        self.frames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get_img_path(&self) -> Result<Option<String>, DeviceError> {
        let n = self.frames.load(Ordering::Relaxed);
        if n == 0 || self.lose_frames.load(Ordering::Relaxed) {
            return Ok(None);
        }
        Ok(Some(format!("/tmp/speckle/acq_{n:05}.fits")))
    }
}

/// Where simulated solutions come from.
enum SolutionSource {
    /// Solve at the simulated mount position plus noise, failing with some probability.
    Tracking { telescope: Arc<SimTelescope>, noise: f64, failure_rate: f64 },
    /// Replay a fixed sequence; `None` entries and an exhausted script are failed solves.
    Scripted(Mutex<VecDeque<Option<EquatorialCoord>>>),
}

/// Simulated plate solver.
pub struct SimPlateSolver {
    source: SolutionSource,
    solution: Mutex<Option<PlateSolution>>,
    busy_until: Mutex<Instant>,
    latency: Duration,
    solves: AtomicUsize,
}

impl SimPlateSolver {
    /// Degrees per pixel of the simulated acquisition camera.
    pub const PLATE_SCALE: f64 = 0.000_763;

    pub fn tracking(telescope: Arc<SimTelescope>, noise: f64, failure_rate: f64) -> Self {
        Self::with_source(SolutionSource::Tracking { telescope, noise, failure_rate })
    }

    pub fn scripted(solutions: Vec<Option<EquatorialCoord>>) -> Self {
        Self::with_source(SolutionSource::Scripted(Mutex::new(solutions.into())))
    }

    fn with_source(source: SolutionSource) -> Self {
        Self {
            source,
            solution: Mutex::new(None),
            busy_until: Mutex::new(Instant::now()),
            latency: Duration::ZERO,
            solves: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of images submitted so far.
    pub fn solve_count(&self) -> usize { self.solves.load(Ordering::Relaxed) }

    async fn next_center(&self) -> Option<EquatorialCoord> {
        match &self.source {
            SolutionSource::Tracking { telescope, noise, failure_rate } => {
                if rand::rng().random_bool(failure_rate.clamp(0.0, 1.0)) {
                    return None;
                }
                let pos = telescope.position().await;
                Some(EquatorialCoord::new(
                    pos.ra_deg() + jitter(*noise),
                    pos.dec_deg() + jitter(*noise),
                ))
            }
            SolutionSource::Scripted(script) => script.lock().await.pop_front().flatten(),
        }
    }
}

#[async_trait]
impl Awaitable for SimPlateSolver {
    fn name(&self) -> &str { "plate_solver" }
    async fn ready(&self) -> Result<bool, DeviceError> { Ok(ready_at(*self.busy_until.lock().await)) }
}

#[async_trait]
impl PlateSolver for SimPlateSolver {
    async fn solve(&self, path: &str) -> Result<(), DeviceError> {
        self.solves.fetch_add(1, Ordering::Relaxed);
        let center = self.next_center().await;
        event!("Simulated solve of {path}: {center:?}");
        *self.solution.lock().await = center.map(|c| PlateSolution {
            ra_deg: c.ra_deg(),
            dec_deg: c.dec_deg(),
            angle_deg: 0.0,
            xscale: Self::PLATE_SCALE,
            yscale: Self::PLATE_SCALE,
        });
        *self.busy_until.lock().await = Instant::now() + self.latency;
        Ok(())
    }

    async fn plate_solution(&self) -> Result<Option<PlateSolution>, DeviceError> {
        Ok(*self.solution.lock().await)
    }

    async fn transform_plate_to_j2000(
        &self,
        x: f64,
        y: f64,
    ) -> Result<Option<EquatorialCoord>, DeviceError> {
        Ok(self.solution.lock().await.map(|s| {
            EquatorialCoord::new(s.ra_deg + x * s.xscale, s.dec_deg + y * s.yscale)
        }))
    }
}

struct ScienceState {
    sequence: u32,
    itime: f64,
    busy_until: Instant,
}

/// Simulated EMCCD camera.
pub struct SimScienceCamera {
    state: Mutex<ScienceState>,
    acquisition_time: Duration,
    emgain: f64,
    roi: (u32, u32),
    target_visible: AtomicBool,
}

impl SimScienceCamera {
    pub fn new(acquisition_time: Duration) -> Self {
        Self {
            state: Mutex::new(ScienceState { sequence: 0, itime: 0.03, busy_until: Instant::now() }),
            acquisition_time,
            emgain: 300.0,
            roi: (512, 512),
            target_visible: AtomicBool::new(true),
        }
    }

    /// Sets what `target_in_camera` answers.
    pub fn set_target_visible(&self, visible: bool) {
        self.target_visible.store(visible, Ordering::Relaxed);
    }

    pub async fn sequence(&self) -> u32 { self.state.lock().await.sequence }
}

#[async_trait]
impl Awaitable for SimScienceCamera {
    fn name(&self) -> &str { "science_camera" }
    async fn ready(&self) -> Result<bool, DeviceError> {
        Ok(ready_at(self.state.lock().await.busy_until))
    }
}

#[async_trait]
impl ScienceCamera for SimScienceCamera {
    async fn target_in_camera(&self) -> Result<bool, DeviceError> {
        Ok(self.target_visible.load(Ordering::Relaxed))
    }

    async fn start_acquisition(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().await;
        state.sequence += 1;
        state.busy_until = Instant::now() + self.acquisition_time;
        Ok(())
    }

    async fn get_filename(&self) -> Result<String, DeviceError> {
        Ok(format!("speckle_{:05}.fits", self.state.lock().await.sequence))
    }

    async fn get_itime(&self) -> Result<f64, DeviceError> { Ok(self.state.lock().await.itime) }

    async fn set_itime(&self, seconds: f64) -> Result<(), DeviceError> {
        self.state.lock().await.itime = seconds;
        Ok(())
    }

    async fn get_emgain(&self) -> Result<f64, DeviceError> { Ok(self.emgain) }

    async fn get_roi(&self) -> Result<(u32, u32), DeviceError> { Ok(self.roi) }

    async fn get_avg_well_fill(&self) -> Result<(f64, f64), DeviceError> {
        let fraction = rand::rng().random_range(0.2..0.8);
        Ok((fraction, fraction * 65_535.0))
    }
}
