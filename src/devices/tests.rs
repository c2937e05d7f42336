use super::{
    AcquisitionCamera, Awaitable, Focuser, PlateSolver, ScienceCamera, Slider, SliderPosition,
    Telescope,
    simulator::{
        SimAcquisitionCamera, SimFocuser, SimPlateSolver, SimScienceCamera, SimSlider,
        SimTelescope,
    },
};
use crate::catalog::EquatorialCoord;
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn test_parked_mount_rejects_slews() {
    let tel = SimTelescope::new(EquatorialCoord::new(0.0, 0.0));
    tel.park().await.unwrap();
    assert!(tel.slew_abs(EquatorialCoord::new(10.0, 20.0)).await.is_err());
    tel.unpark().await.unwrap();
    tel.slew_abs(EquatorialCoord::new(10.0, 20.0)).await.unwrap();
    tel.slew_rel(-0.5, 0.25).await.unwrap();
    let pos = tel.get_pos().await.unwrap();
    assert!((pos.ra_deg() - 9.5).abs() < 1e-9);
    assert!((pos.dec_deg() - 20.25).abs() < 1e-9);
    assert_eq!(tel.slew_count(), 2);
    assert!(tel.ready().await.unwrap());
}

#[tokio::test]
async fn test_slider_reports_moving_while_switching() {
    let slider = SimSlider::new(Duration::from_millis(60));
    assert_eq!(slider.get_pos().await.unwrap(), SliderPosition::Acquisition);
    slider.to_science().await.unwrap();
    assert!(!slider.ready().await.unwrap());
    assert_eq!(slider.get_pos().await.unwrap(), SliderPosition::Moving);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(slider.ready().await.unwrap());
    assert_eq!(slider.get_pos().await.unwrap(), SliderPosition::Science);
    // already there, no motion
    slider.to_science().await.unwrap();
    assert!(slider.ready().await.unwrap());
}

#[tokio::test]
async fn test_focuser_offset_is_idempotent() {
    let focuser = SimFocuser::new(Duration::ZERO);
    focuser.to_acquisition().await.unwrap();
    assert!(!focuser.science_offset_applied().await);
    focuser.to_science().await.unwrap();
    focuser.to_science().await.unwrap();
    assert!(focuser.science_offset_applied().await);
    focuser.to_acquisition().await.unwrap();
    assert!(!focuser.science_offset_applied().await);
    focuser.focus().await.unwrap();
    assert_eq!(focuser.focus_runs(), 1);
}

#[tokio::test]
async fn test_scripted_plate_solver() {
    let solver = SimPlateSolver::scripted(vec![Some(EquatorialCoord::new(10.0, 20.0)), None]);
    solver.solve("a.fits").await.unwrap();
    let sol = solver.plate_solution().await.unwrap().unwrap();
    assert_eq!(sol.center(), EquatorialCoord::new(10.0, 20.0));
    let shifted = solver.transform_plate_to_j2000(100.0, -100.0).await.unwrap().unwrap();
    assert!((shifted.ra_deg() - (10.0 + 100.0 * SimPlateSolver::PLATE_SCALE)).abs() < 1e-12);
    assert!((shifted.dec_deg() - (20.0 - 100.0 * SimPlateSolver::PLATE_SCALE)).abs() < 1e-12);

    solver.solve("b.fits").await.unwrap();
    assert!(solver.plate_solution().await.unwrap().is_none());
    assert!(solver.transform_plate_to_j2000(0.0, 0.0).await.unwrap().is_none());
    // script exhausted
    solver.solve("c.fits").await.unwrap();
    assert!(solver.plate_solution().await.unwrap().is_none());
    assert_eq!(solver.solve_count(), 3);
}

#[tokio::test]
async fn test_tracking_plate_solver_follows_mount() {
    let tel = Arc::new(SimTelescope::new(EquatorialCoord::new(50.0, -10.0)));
    let solver = SimPlateSolver::tracking(Arc::clone(&tel), 0.0, 0.0);
    solver.solve("x.fits").await.unwrap();
    assert_eq!(
        solver.plate_solution().await.unwrap().map(|s| s.center()),
        Some(EquatorialCoord::new(50.0, -10.0))
    );
}

#[tokio::test]
async fn test_cameras() {
    let acq = SimAcquisitionCamera::new();
    assert!(acq.get_img_path().await.unwrap().is_none());
    acq.take_temp_light(0.0).await.unwrap();
    assert!(acq.get_img_path().await.unwrap().is_some());
    acq.lose_frames(true);
    assert!(acq.get_img_path().await.unwrap().is_none());

    let sci = SimScienceCamera::new(Duration::ZERO);
    sci.start_acquisition().await.unwrap();
    sci.start_acquisition().await.unwrap();
    assert_eq!(sci.get_filename().await.unwrap(), "speckle_00002.fits");
    sci.set_itime(0.05).await.unwrap();
    assert!((sci.get_itime().await.unwrap() - 0.05).abs() < 1e-12);
    let (fill, _) = sci.get_avg_well_fill().await.unwrap();
    assert!((0.2..0.8).contains(&fill));
}
