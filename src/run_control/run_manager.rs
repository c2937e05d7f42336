use super::{ControlCommand, RunError, RunStatus, RunStep, StepGate, Tolerance};
use crate::{
    catalog::{EquatorialCoord, ExposureInfo, Observation},
    devices::Awaitable,
    error, event, info,
    keychain::Keychain,
    log, obs,
    scheduling::{ScheduledTarget, TargetSource},
    util::astro::offset_between,
    warn,
};
use chrono::Utc;
use futures::{FutureExt, future::join_all};
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};
use strum_macros::Display;
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};

/// Pipeline parameters, see the `[acquisition]` and `[timing]` configuration sections.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub acq_itime: f64,
    pub plate_solve_tries: usize,
    pub max_refine_rounds: usize,
    pub tolerance: Tolerance,
    /// Science camera center in acquisition camera pixels.
    pub scicam_offset: (f64, f64),
    pub autofocus: bool,
    pub target_well_fill: f64,
    pub poll_interval: Duration,
    pub settle_time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    Running,
    Idle,
}

/// The orchestrator. Each [`RunManager::update`] runs either one complete target cycle or one
/// idle tick; operator commands are drained whenever it waits.
pub struct RunManager {
    pub(super) k: Arc<Keychain>,
    targets: Box<dyn TargetSource>,
    pub(super) cfg: RunConfig,
    mode: RunMode,
    step: RunStep,
    gate: Arc<StepGate>,
    waiting_on: Vec<String>,
    current: Option<String>,
    control_rx: mpsc::Receiver<ControlCommand>,
    status_tx: watch::Sender<RunStatus>,
    pending_mode: Option<RunMode>,
    pending_reset: bool,
}

impl RunManager {
    /// Length of one idle tick.
    const IDLE_TICK: Duration = Duration::from_secs(1);
    const MIN_ITIME: f64 = 0.001;
    const MAX_ITIME: f64 = 60.0;

    /// Creates an idle manager in automatic mode.
    pub fn new(
        k: Arc<Keychain>,
        targets: Box<dyn TargetSource>,
        cfg: RunConfig,
        control_rx: mpsc::Receiver<ControlCommand>,
    ) -> Self {
        let (status_tx, _) = watch::channel(RunStatus::default());
        Self {
            k,
            targets,
            cfg,
            mode: RunMode::Idle,
            step: RunStep::Scheduler,
            gate: Arc::new(StepGate::new(true)),
            waiting_on: Vec::new(),
            current: None,
            control_rx,
            status_tx,
            pending_mode: None,
            pending_reset: false,
        }
    }

    pub fn mode(&self) -> RunMode { self.mode }
    pub fn step(&self) -> RunStep { self.step }
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> { self.status_tx.subscribe() }

    pub fn status(&self) -> RunStatus {
        RunStatus {
            step: self.step,
            mode: self.mode,
            auto_mode: self.gate.is_auto(),
            waiting_on: self.waiting_on.clone(),
            target: self.current.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Unparks the mount and resumes the pipeline.
    pub async fn startup(&mut self) {
        info!("Starting up.");
        match self.k.telescope().unpark().await {
            Ok(()) => self.mode = RunMode::Running,
            Err(e) => error!("Unparking failed, staying idle: {e}"),
        }
        self.publish_status();
    }

    /// Stops the pipeline and parks the mount.
    pub async fn shutdown(&mut self) {
        info!("Shutting down.");
        self.mode = RunMode::Idle;
        self.step = RunStep::Scheduler;
        self.current = None;
        if let Err(e) = self.k.telescope().park().await {
            error!("Parking failed: {e}");
        }
        self.publish_status();
    }

    /// Abandons the current target and reports it failed.
    pub async fn skip_target(&mut self, cause: &RunError) {
        let target = self.current.as_deref().unwrap_or("target");
        obs!("Skipping {target} at stage {}: {cause}", self.step);
        if let Some(device) = cause.unreachable_device() {
            error!("Lost contact with the {device} service.");
        }
        if let Err(e) = self.targets.target_failed().await {
            error!("Reporting target failure failed: {e}");
        }
    }

    /// One orchestrator tick.
    pub async fn update(&mut self) {
        self.apply_pending().await;
        match self.mode {
            RunMode::Running => self.update_running().await,
            RunMode::Idle => self.update_idle().await,
        }
    }

    async fn apply_pending(&mut self) {
        if std::mem::take(&mut self.pending_reset) {
            info!("Resetting scheduler.");
            if let Err(e) = self.targets.reset().await {
                error!("Scheduler reset failed: {e}");
            }
        }
        match self.pending_mode.take() {
            Some(RunMode::Running) if self.mode == RunMode::Idle => self.startup().await,
            Some(RunMode::Idle) if self.mode == RunMode::Running => self.shutdown().await,
            _ => {}
        }
    }

    async fn update_idle(&mut self) { self.idle_until(Instant::now() + Self::IDLE_TICK).await; }

    async fn update_running(&mut self) {
        self.set_step(RunStep::Scheduler);
        let next = self.targets.next_target().await;
        let target = match next {
            Ok(target) => target,
            Err(e) => {
                warn!("Scheduler has nothing to observe: {e}");
                self.shutdown().await;
                return;
            }
        };
        obs!("Next target: {target}.");
        self.current = Some(target.to_string());
        self.publish_status();

        let outcome = AssertUnwindSafe(self.observe(&target))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(RunError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(()) => {
                obs!("Finished {target}.");
                if let Err(e) = self.targets.target_success().await {
                    error!("Reporting target success failed: {e}");
                }
            }
            Err(e) => self.skip_target(&e).await,
        }
        self.restore_focus().await;
        self.current = None;
        self.set_step(RunStep::Scheduler);
    }

    /// Runs one target through slew, acquisition, refinement and science exposure.
    async fn observe(&mut self, target: &ScheduledTarget) -> Result<(), RunError> {
        let k = Arc::clone(&self.k);
        let coord = target.star().coord();

        self.set_step(RunStep::Slew);
        k.telescope().slew_abs(coord).await.map_err(RunError::Slew)?;
        k.slider().to_acquisition().await?;
        k.focuser().to_acquisition().await?;
        self.idle_while_busy(vec![
            k.telescope() as Arc<dyn Awaitable>,
            k.slider() as Arc<dyn Awaitable>,
            k.focuser() as Arc<dyn Awaitable>,
        ])
        .await?;
        if self.cfg.autofocus {
            k.focuser().focus().await?;
            self.idle_while_busy(vec![k.focuser() as Arc<dyn Awaitable>]).await?;
        }
        self.settle().await;

        let acquired = self.converge(coord).await?;
        info!("Acquisition camera centered on {acquired}.");

        let (x, y) = self.cfg.scicam_offset;
        let science_center = k
            .plate_solver()
            .transform_plate_to_j2000(x, y)
            .await?
            .ok_or(RunError::NoPlateTransform)?;
        let (d_ra, d_dec) = offset_between(science_center, coord);
        let corrected =
            EquatorialCoord::new(acquired.ra_deg() + d_ra, acquired.dec_deg() + d_dec);
        log!("Science camera sees {science_center}, correcting to {corrected}.");
        let position = self.converge(corrected).await?;

        self.set_step(RunStep::SliderSci);
        k.slider().to_science().await?;
        k.focuser().to_science().await?;
        self.idle_while_busy(vec![
            k.slider() as Arc<dyn Awaitable>,
            k.focuser() as Arc<dyn Awaitable>,
        ])
        .await?;

        self.set_step(RunStep::Autoexpose);
        if let Err(e) = self.autoexpose().await {
            warn!("Auto-exposure failed, keeping integration time: {e}");
        }
        if !k.science_camera().target_in_camera().await? {
            return Err(RunError::NotInScienceCamera);
        }
        self.settle().await;

        self.set_step(RunStep::Takedata);
        k.science_camera().start_acquisition().await?;
        self.idle_while_busy(vec![k.science_camera() as Arc<dyn Awaitable>]).await?;

        // Calibration singles are not catalogued.
        if target.star().is_double() {
            if let Err(e) = self.record_observation(target, position).await {
                error!("Observation of {target} could not be stored: {e}");
            }
        }
        Ok(())
    }

    /// Scales the integration time towards the configured well fill.
    async fn autoexpose(&mut self) -> Result<(), RunError> {
        let camera = self.k.science_camera();
        let (fill, adu) = camera.get_avg_well_fill().await?;
        let itime = camera.get_itime().await?;
        if fill <= 0.0 {
            warn!("Science camera reports an empty well ({adu} ADU), keeping {itime} s.");
            return Ok(());
        }
        let new_itime =
            (itime * self.cfg.target_well_fill / fill).clamp(Self::MIN_ITIME, Self::MAX_ITIME);
        log!("Well fill {fill:.3} at {itime} s, setting integration time to {new_itime:.4} s.");
        camera.set_itime(new_itime).await?;
        Ok(())
    }

    async fn record_observation(
        &mut self,
        target: &ScheduledTarget,
        position: EquatorialCoord,
    ) -> Result<(), RunError> {
        let camera = self.k.science_camera();
        let (roi_width, roi_height) = camera.get_roi().await?;
        let exposure = ExposureInfo {
            emgain: camera.get_emgain().await?,
            itime: camera.get_itime().await?,
            roi_width,
            roi_height,
        };
        let observation = Observation::new(
            camera.get_filename().await?,
            target.id(),
            exposure,
            target.requester().map(String::from),
            target.band().clone(),
            position,
        );
        obs!("Recording {} for star {}.", observation.filename(), observation.star_id());
        self.k.catalog().insert_observation(observation).await?;
        Ok(())
    }

    async fn restore_focus(&mut self) {
        let focuser = self.k.focuser();
        let restored = match focuser.to_acquisition().await {
            Ok(()) => self.idle_while_busy(vec![focuser as Arc<dyn Awaitable>]).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = restored {
            warn!("Restoring the acquisition focus failed: {e}");
        }
    }

    /// Lets the optics settle while still serving operator commands.
    pub(super) async fn settle(&mut self) {
        if !self.cfg.settle_time.is_zero() {
            self.idle_until(Instant::now() + self.cfg.settle_time).await;
        }
    }

    /// Polls `devices` and the step gate until all are ready, at most once per poll interval.
    pub(super) async fn idle_while_busy(
        &mut self,
        mut devices: Vec<Arc<dyn Awaitable>>,
    ) -> Result<(), RunError> {
        devices.push(Arc::clone(&self.gate) as Arc<dyn Awaitable>);
        let mut next_check = Instant::now();
        loop {
            self.idle_until(next_check).await;
            let states = join_all(devices.iter().map(|d| d.ready())).await;
            let mut waiting = Vec::new();
            for (device, state) in devices.iter().zip(states) {
                if !state? {
                    waiting.push(device.name().to_string());
                }
            }
            if waiting.is_empty() {
                break;
            }
            if waiting != self.waiting_on {
                event!("Waiting on {}.", waiting.join(", "));
                self.waiting_on = waiting;
                self.publish_status();
            }
            next_check = Instant::now() + self.cfg.poll_interval;
        }
        self.gate.consume();
        self.waiting_on.clear();
        self.publish_status();
        Ok(())
    }

    /// Sleeps until `deadline`, handling every operator command that arrives meanwhile.
    async fn idle_until(&mut self, deadline: Instant) {
        loop {
            tokio::select! {
                biased;
                cmd = self.control_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        tokio::time::sleep_until(deadline).await;
                        return;
                    }
                },
                () = tokio::time::sleep_until(deadline) => return,
            }
        }
    }

    fn handle_command(&mut self, cmd: ControlCommand) {
        info!("Operator command: {cmd}.");
        match cmd {
            ControlCommand::Pause => self.gate.set_auto(false),
            ControlCommand::Resume => self.gate.set_auto(true),
            ControlCommand::Step => self.gate.release(),
            ControlCommand::Startup => self.pending_mode = Some(RunMode::Running),
            ControlCommand::Shutdown => self.pending_mode = Some(RunMode::Idle),
            ControlCommand::ResetScheduler => self.pending_reset = true,
        }
        self.publish_status();
    }

    pub(super) fn set_step(&mut self, step: RunStep) {
        if self.step != step {
            log!("Stage {} -> {step}.", self.step);
            self.step = step;
        }
        self.publish_status();
    }

    fn publish_status(&self) { self.status_tx.send_replace(self.status()); }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("unknown panic")
    }
}
