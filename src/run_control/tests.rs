use super::{
    ControlCommand, RunConfig, RunError, RunManager, RunMode, RunStep, Tolerance,
    within_tolerance,
};
use crate::{
    catalog::{Band, DoubleStar, EquatorialCoord, LocalCatalog, ReferenceStar, Star, Target},
    devices::{
        Awaitable, DeviceError, DeviceFault, Focuser,
        simulator::{
            SimAcquisitionCamera, SimFocuser, SimPlateSolver, SimScienceCamera, SimSlider,
            SimTelescope,
        },
    },
    http_handler::{HTTPError, http_request::request_common::RequestError},
    keychain::Keychain,
    scheduling::{
        InOrderPolicy, ScheduledTarget, Scheduler, SchedulerError, SingleSearch, TargetSource,
    },
};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

#[derive(Default)]
struct Counters {
    successes: AtomicUsize,
    failures: AtomicUsize,
    resets: AtomicUsize,
}

/// Serves a fixed queue and counts the feedback it receives.
struct CountingSource {
    queue: VecDeque<ScheduledTarget>,
    counters: Arc<Counters>,
}

#[async_trait]
impl TargetSource for CountingSource {
    async fn next_target(&mut self) -> Result<ScheduledTarget, SchedulerError> {
        self.queue.pop_front().ok_or(SchedulerError::NoObservableTargets)
    }

    async fn target_success(&mut self) -> Result<(), SchedulerError> {
        self.counters.successes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn target_failed(&mut self) -> Result<(), SchedulerError> {
        self.counters.failures.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn reset(&mut self) -> Result<(), SchedulerError> {
        self.counters.resets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct Rig {
    telescope: Arc<SimTelescope>,
    /// The simulated focuser, when the rig uses one.
    focuser: Option<Arc<SimFocuser>>,
    solver: Arc<SimPlateSolver>,
    science_camera: Arc<SimScienceCamera>,
    catalog: Arc<LocalCatalog>,
    counters: Arc<Counters>,
    control: mpsc::Sender<ControlCommand>,
    manager: RunManager,
}

const TARGET: EquatorialCoord = EquatorialCoord::new(10.0, 20.0);

fn run_config() -> RunConfig {
    RunConfig {
        acq_itime: 0.01,
        plate_solve_tries: 3,
        max_refine_rounds: 10,
        tolerance: Tolerance { ra: 0.01, dec: 0.01 },
        scicam_offset: (0.0, 0.0),
        autofocus: false,
        target_well_fill: 0.5,
        poll_interval: Duration::from_millis(1),
        settle_time: Duration::ZERO,
    }
}

fn scheduled_double() -> ScheduledTarget {
    let star = DoubleStar::new(1, "STF 1", TARGET, Some("G2V"));
    ScheduledTarget::new(Star::Double(star), Band::new("V"), Some(String::from("alice")))
}

fn rig_with(
    solutions: Vec<Option<EquatorialCoord>>,
    focuser: Arc<dyn Focuser>,
    cfg: RunConfig,
    targets: Vec<ScheduledTarget>,
) -> Rig {
    let telescope = Arc::new(SimTelescope::new(TARGET));
    let solver = Arc::new(SimPlateSolver::scripted(solutions));
    let science_camera = Arc::new(SimScienceCamera::new(Duration::from_millis(5)));
    let catalog = Arc::new(LocalCatalog::in_memory(
        vec![DoubleStar::new(1, "STF 1", TARGET, Some("G2V"))],
        Vec::new(),
        Vec::new(),
    ));
    let keychain = Keychain::new(
        Arc::clone(&telescope) as _,
        Arc::new(SimSlider::new(Duration::from_millis(2))),
        focuser,
        Arc::new(SimAcquisitionCamera::new()),
        Arc::clone(&solver) as _,
        Arc::clone(&science_camera) as _,
        Arc::clone(&catalog) as _,
    );
    let counters = Arc::new(Counters::default());
    let source = CountingSource { queue: targets.into(), counters: Arc::clone(&counters) };
    let (control, control_rx) = mpsc::channel(16);
    let manager = RunManager::new(Arc::new(keychain), Box::new(source), cfg, control_rx);
    Rig {
        telescope,
        focuser: None,
        solver,
        science_camera,
        catalog,
        counters,
        control,
        manager,
    }
}

fn rig(solutions: Vec<Option<EquatorialCoord>>) -> Rig {
    let focuser = Arc::new(SimFocuser::new(Duration::from_millis(2)));
    let mut rig =
        rig_with(solutions, Arc::clone(&focuser) as _, run_config(), vec![scheduled_double()]);
    rig.focuser = Some(focuser);
    rig
}

fn on_target() -> Option<EquatorialCoord> { Some(TARGET) }

#[test]
fn test_tolerance_is_inclusive() {
    let tol = Tolerance { ra: 0.01, dec: 0.02 };
    assert!(within_tolerance((0.01, -0.02), tol));
    assert!(within_tolerance((-0.005, 0.0), tol));
    assert!(!within_tolerance((0.011, 0.0), tol));
    assert!(!within_tolerance((0.0, -0.021), tol));
}

#[tokio::test]
async fn test_converge_applies_relative_correction() {
    let mut rig = rig(vec![
        Some(EquatorialCoord::new(10.02, 20.0)),
        Some(EquatorialCoord::new(10.005, 20.003)),
    ]);
    let achieved = rig.manager.converge(TARGET).await.unwrap();
    assert!((achieved.ra_deg() - 10.005).abs() < 1e-9);
    assert!((achieved.dec_deg() - 20.003).abs() < 1e-9);
    assert_eq!(rig.solver.solve_count(), 2);
    assert_eq!(rig.telescope.slew_count(), 1);
    // The single correction moved the mount by the solved offset.
    let pos = rig.telescope.position().await;
    assert!((pos.ra_deg() - 9.98).abs() < 1e-9);
}

#[tokio::test]
async fn test_converge_gives_up_after_max_rounds() {
    let mut cfg = run_config();
    cfg.max_refine_rounds = 2;
    let off = Some(EquatorialCoord::new(10.5, 20.0));
    let focuser = Arc::new(SimFocuser::new(Duration::ZERO));
    let mut rig = rig_with(vec![off, off, off], focuser, cfg, Vec::new());
    let res = rig.manager.converge(TARGET).await;
    assert!(matches!(res, Err(RunError::NoConvergence { rounds: 2 })));
    assert_eq!(rig.solver.solve_count(), 2);
}

#[tokio::test]
async fn test_successful_cycle_records_observation() {
    let mut rig = rig(vec![on_target(), on_target()]);
    let status = rig.manager.subscribe();
    rig.manager.startup().await;
    assert_eq!(rig.manager.mode(), RunMode::Running);
    assert_eq!(status.borrow().mode, RunMode::Running);

    rig.manager.update().await;
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 1);
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 0);
    assert_eq!(rig.science_camera.sequence().await, 1);
    assert!(!rig.focuser.as_ref().unwrap().science_offset_applied().await);
    assert_eq!(rig.manager.step(), RunStep::Scheduler);

    let observations = rig.catalog.observations().await;
    assert_eq!(observations.len(), 1);
    let obs = &observations[0];
    assert_eq!(obs.filename(), "speckle_00001.fits");
    assert_eq!(obs.star_id(), 1);
    assert_eq!(obs.requester(), Some("alice"));
    assert_eq!(obs.band().as_str(), "V");
    assert!((obs.position().ra_deg() - 10.0).abs() < 1e-9);
    assert_eq!(obs.exposure().roi_width, 512);

    // Auto-exposure scaled the default 0.03 s towards half well for a fill in 0.2..0.8.
    let itime = obs.exposure().itime;
    assert!((0.018..=0.076).contains(&itime), "itime {itime}");
}

#[tokio::test]
async fn test_exhausted_plate_solves_fail_target_once() {
    let mut rig = rig(vec![None, None, None, on_target()]);
    rig.manager.startup().await;
    rig.manager.update().await;
    assert_eq!(rig.solver.solve_count(), 3);
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 1);
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 0);
    assert!(rig.catalog.observations().await.is_empty());
}

#[tokio::test]
async fn test_slew_failure_fails_target() {
    let mut rig = rig(vec![on_target(), on_target()]);
    rig.manager.startup().await;
    rig.telescope.fail_slews(true);
    rig.manager.update().await;
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 1);
    assert_eq!(rig.solver.solve_count(), 0);
}

#[tokio::test]
async fn test_target_outside_science_frame_is_skipped() {
    let mut rig = rig(vec![on_target(), on_target()]);
    rig.science_camera.set_target_visible(false);
    rig.manager.startup().await;
    rig.manager.update().await;
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 1);
    assert_eq!(rig.science_camera.sequence().await, 0);
    // The focuser went to science focus before the check and is put back regardless.
    assert!(!rig.focuser.as_ref().unwrap().science_offset_applied().await);
}

#[tokio::test]
async fn test_science_refinement_starts_from_acquired_pointing() {
    // Acquisition settles 0.009° east of the target; the science field is then 0.002° off.
    let mut rig = rig(vec![
        Some(EquatorialCoord::new(10.009, 20.0)),
        Some(EquatorialCoord::new(10.002, 20.0)),
    ]);
    rig.manager.startup().await;
    rig.manager.update().await;
    assert_eq!(rig.solver.solve_count(), 2);
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 1);
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 0);
    let observations = rig.catalog.observations().await;
    assert!((observations[0].position().ra_deg() - 10.002).abs() < 1e-9);
}

#[tokio::test]
async fn test_science_camera_offset_shifts_refinement_aim() {
    let mut cfg = run_config();
    cfg.scicam_offset = (100.0, 0.0);
    let focuser = Arc::new(SimFocuser::new(Duration::from_millis(2)));
    let acquired = EquatorialCoord::new(10.009, 20.0);
    let mut rig = rig_with(
        vec![Some(acquired), Some(acquired), Some(EquatorialCoord::new(9.9257, 20.0))],
        focuser,
        cfg,
        vec![scheduled_double()],
    );
    rig.manager.startup().await;
    rig.manager.update().await;
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 1);
    assert_eq!(rig.solver.solve_count(), 3);

    // The science pixel sits 100 px east of the acquisition center, so the mount aims at
    // the acquired pointing shifted by (target - science center).
    let science_center = acquired.ra_deg() + 100.0 * SimPlateSolver::PLATE_SCALE;
    let aim = acquired.ra_deg() + (TARGET.ra_deg() - science_center);
    let pos = rig.telescope.position().await;
    assert!((pos.ra_deg() - (TARGET.ra_deg() + aim - acquired.ra_deg())).abs() < 1e-9);
    assert!((pos.dec_deg() - TARGET.dec_deg()).abs() < 1e-9);
    let observations = rig.catalog.observations().await;
    assert!((observations[0].position().ra_deg() - 9.9257).abs() < 1e-9);
}

#[test]
fn test_unreachable_device_names_transport_faults() {
    let lost = DeviceError::new(
        "focuser",
        DeviceFault::Transport(HTTPError::from(RequestError::NoConnection)),
    );
    assert_eq!(RunError::Device(lost).unreachable_device(), Some("focuser"));

    let refused = DeviceError::new("telescope", DeviceFault::Rejected(String::from("parked")));
    assert_eq!(RunError::Slew(refused).unreachable_device(), None);
    assert_eq!(RunError::NotInScienceCamera.unreachable_device(), None);
}

#[tokio::test]
async fn test_exhausted_scheduler_parks_and_idles() {
    let mut rig = rig(vec![on_target(), on_target()]);
    rig.manager.startup().await;
    rig.manager.update().await;
    assert!(!rig.telescope.is_parked().await);

    rig.manager.update().await;
    assert_eq!(rig.manager.mode(), RunMode::Idle);
    assert!(rig.telescope.is_parked().await);
}

#[tokio::test]
async fn test_manual_mode_blocks_without_step() {
    let mut rig = rig(vec![on_target(), on_target()]);
    rig.manager.startup().await;
    rig.control.send(ControlCommand::Pause).await.unwrap();
    let res = tokio::time::timeout(Duration::from_millis(100), rig.manager.update()).await;
    assert!(res.is_err());
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 0);
    assert_eq!(rig.solver.solve_count(), 0);
}

#[tokio::test]
async fn test_manual_mode_advances_on_steps() {
    let mut rig = rig(vec![on_target(), on_target()]);
    let status = rig.manager.subscribe();
    rig.manager.startup().await;
    rig.control.send(ControlCommand::Pause).await.unwrap();
    let control = rig.control.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(2)).await;
            if control.send(ControlCommand::Step).await.is_err() {
                break;
            }
        }
    });
    rig.manager.update().await;
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 1);
    assert!(!status.borrow().auto_mode);
}

#[tokio::test]
async fn test_mode_commands_apply_on_next_update() {
    let mut rig = rig(vec![on_target(), on_target()]);
    rig.control.send(ControlCommand::ResetScheduler).await.unwrap();
    rig.control.send(ControlCommand::Startup).await.unwrap();

    // The idle tick drains the commands but does not act on them.
    rig.manager.update().await;
    assert_eq!(rig.manager.mode(), RunMode::Idle);
    assert_eq!(rig.counters.resets.load(Ordering::Relaxed), 0);

    rig.manager.update().await;
    assert_eq!(rig.counters.resets.load(Ordering::Relaxed), 1);
    assert_eq!(rig.manager.mode(), RunMode::Running);
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 1);
}

/// A focuser whose autofocus routine panics.
struct JammedFocuser;

#[async_trait]
impl Awaitable for JammedFocuser {
    fn name(&self) -> &str { "focuser" }
    async fn ready(&self) -> Result<bool, DeviceError> { Ok(true) }
}

#[async_trait]
impl Focuser for JammedFocuser {
    async fn focus(&self) -> Result<(), DeviceError> { panic!("focus motor jammed") }
    async fn to_science(&self) -> Result<(), DeviceError> { Ok(()) }
    async fn to_acquisition(&self) -> Result<(), DeviceError> { Ok(()) }
}

#[tokio::test]
async fn test_pipeline_panic_becomes_target_failure() {
    let mut cfg = run_config();
    cfg.autofocus = true;
    let mut rig = rig_with(
        vec![on_target(), on_target()],
        Arc::new(JammedFocuser),
        cfg,
        vec![scheduled_double()],
    );
    rig.manager.startup().await;
    rig.manager.update().await;
    assert_eq!(rig.counters.failures.load(Ordering::Relaxed), 1);
    assert_eq!(rig.counters.successes.load(Ordering::Relaxed), 0);
    assert_eq!(rig.manager.mode(), RunMode::Running);
}

#[tokio::test]
async fn test_double_then_calibration_single_end_to_end() {
    let single_at = EquatorialCoord::new(10.5, 20.2);
    let catalog = Arc::new(LocalCatalog::in_memory(
        vec![DoubleStar::new(1, "STF 1", TARGET, Some("G2V"))],
        vec![ReferenceStar::new(100, "HD 100", single_at, Some("G2V"))],
        vec![Target::new(7, 1, &["V"]).with_requester("bob")],
    ));
    let telescope = Arc::new(SimTelescope::new(TARGET));
    let solver = Arc::new(SimPlateSolver::scripted(vec![
        // Double: acquisition centering in two rounds, then science centering.
        Some(EquatorialCoord::new(10.02, 20.0)),
        Some(EquatorialCoord::new(10.005, 20.003)),
        Some(EquatorialCoord::new(9.996, 19.998)),
        // Single: both refinements converge at once.
        Some(single_at),
        Some(single_at),
    ]));
    let science_camera = Arc::new(SimScienceCamera::new(Duration::from_millis(5)));
    let keychain = Keychain::new(
        Arc::clone(&telescope) as _,
        Arc::new(SimSlider::new(Duration::from_millis(2))),
        Arc::new(SimFocuser::new(Duration::from_millis(2))),
        Arc::new(SimAcquisitionCamera::new()),
        Arc::clone(&solver) as _,
        Arc::clone(&science_camera) as _,
        Arc::clone(&catalog) as _,
    );
    let scheduler = Scheduler::new(
        Arc::clone(&catalog) as _,
        Box::new(InOrderPolicy::new()),
        SingleSearch::default(),
        vec![Band::new("V")],
    );
    let (_control, control_rx) = mpsc::channel(4);
    let mut manager =
        RunManager::new(Arc::new(keychain), Box::new(scheduler), run_config(), control_rx);
    manager.startup().await;

    manager.update().await;
    let observations = catalog.observations().await;
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].requester(), Some("bob"));
    assert!((observations[0].position().ra_deg() - 9.996).abs() < 1e-9);
    assert!((observations[0].position().dec_deg() - 19.998).abs() < 1e-9);

    // The calibration single is exposed but not catalogued.
    manager.update().await;
    assert_eq!(science_camera.sequence().await, 2);
    assert_eq!(catalog.observations().await.len(), 1);
    assert_eq!(solver.solve_count(), 5);

    manager.update().await;
    assert_eq!(manager.mode(), RunMode::Idle);
    assert!(telescope.is_parked().await);
}
