use super::{
    plate_solver::{PlateSolutionResponse, TransformResponse},
    science_camera::RoiResponse,
    slider::SliderPositionResponse,
};
use crate::{catalog::EquatorialCoord, devices::SliderPosition};

#[test]
fn test_plate_solution_variants() {
    let solved: PlateSolutionResponse = serde_json::from_str(
        r#"{"ra_deg": 10.02, "dec_deg": 20.0, "angle_deg": 1.5, "xscale": 0.000763, "yscale": 0.000763}"#,
    )
    .unwrap();
    let sol = solved.solution().unwrap();
    assert!((sol.ra_deg - 10.02).abs() < 1e-12);
    assert!((sol.xscale - 0.000_763).abs() < 1e-12);

    let failed: PlateSolutionResponse = serde_json::from_str("false").unwrap();
    assert!(failed.solution().is_none());
    let absent: PlateSolutionResponse = serde_json::from_str("null").unwrap();
    assert!(absent.solution().is_none());
}

#[test]
fn test_transform_may_be_null() {
    let none: TransformResponse = serde_json::from_str("null").unwrap();
    assert!(none.position().is_none());
    let some: TransformResponse =
        serde_json::from_str(r#"{"ra_deg": 1.0, "dec_deg": -2.0}"#).unwrap();
    let pos = EquatorialCoord::from(some.position().unwrap());
    assert_eq!(pos, EquatorialCoord::new(1.0, -2.0));
}

#[test]
fn test_slider_codes() {
    let pos: SliderPositionResponse = serde_json::from_str("2").unwrap();
    assert_eq!(pos.position(), Some(SliderPosition::Science));
    let unknown: SliderPositionResponse = serde_json::from_str("7").unwrap();
    assert_eq!(unknown.position(), None);
    let roi: RoiResponse = serde_json::from_str("[512, 256]").unwrap();
    assert_eq!((roi.width(), roi.height()), (512, 256));
}
