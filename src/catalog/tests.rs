use super::{
    local_catalog::ra_in_range, Band, CatalogGateway, DoubleStar, EquatorialCoord, ExposureInfo,
    LocalCatalog, Observation, Priority, ReferenceStar, Target,
};
use strum::IntoEnumIterator;

fn reference(id: i64, ra: f64, dec: f64) -> ReferenceStar {
    ReferenceStar::new(id, &format!("HD {id}"), EquatorialCoord::new(ra, dec), Some("G2V"))
}

#[test]
fn test_ra_range_wraps() {
    assert!(ra_in_range(10.0, (8.0, 12.0)));
    assert!(!ra_in_range(13.0, (8.0, 12.0)));
    assert!(ra_in_range(359.0, (-2.0, 2.0)));
    assert!(ra_in_range(1.0, (358.0, 362.0)));
    assert!(!ra_in_range(180.0, (358.0, 362.0)));
    assert!(ra_in_range(123.0, (-400.0, 400.0)));
}

#[test]
fn test_priority_ranks() {
    let ranks: Vec<i32> = Priority::iter().map(Priority::rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    assert_eq!(Priority::Low.promoted(), Priority::Normal);
    assert_eq!(Priority::Now.promoted(), Priority::Now);
    assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
}

#[test]
fn test_target_defaults_from_json() {
    let target: Target = serde_json::from_str(r#"{"id": 4, "star_id": 12, "bands": ["V", "R"]}"#)
        .unwrap();
    assert_eq!(target.priority(), Priority::Normal);
    assert_eq!(target.mpo(), 1);
    assert_eq!(target.bands(), &[Band::new("V"), Band::new("R")]);
    assert!(target.requester().is_none());
}

#[tokio::test]
async fn test_box_query() {
    let catalog = LocalCatalog::in_memory(
        vec![],
        vec![reference(1, 10.5, 20.0), reference(2, 15.0, 20.0), reference(3, 359.5, 0.5)],
        vec![],
    );
    let hits = catalog.reference_stars_in_box((8.0, 12.0), (18.0, 22.0)).await.unwrap();
    assert_eq!(hits.iter().map(ReferenceStar::id).collect::<Vec<_>>(), vec![1]);

    let wrapped = catalog.reference_stars_in_box((-1.0, 1.0), (-1.0, 1.0)).await.unwrap();
    assert_eq!(wrapped.iter().map(ReferenceStar::id).collect::<Vec<_>>(), vec![3]);

    assert!(catalog.double_star(2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_open_and_log_observation() {
    let dir = tempfile::tempdir().unwrap();
    let doubles = vec![DoubleStar::new(7, "STF 1", EquatorialCoord::new(1.0, 2.0), Some("A0"))];
    let refs = vec![reference(9, 1.5, 2.5)];
    let targets = vec![Target::new(1, 7, &["V"]).with_requester("alice")];
    std::fs::write(dir.path().join("double_stars.json"), serde_json::to_string(&doubles).unwrap())
        .unwrap();
    std::fs::write(dir.path().join("reference_stars.json"), serde_json::to_string(&refs).unwrap())
        .unwrap();
    std::fs::write(dir.path().join("targets.json"), serde_json::to_string(&targets).unwrap())
        .unwrap();

    let catalog = LocalCatalog::open(dir.path()).await.unwrap();
    assert_eq!(catalog.double_star(7).await.unwrap().unwrap().name(), "STF 1");
    assert_eq!(catalog.targets().await.unwrap(), targets);

    let exposure = ExposureInfo { emgain: 100.0, itime: 0.03, roi_width: 512, roi_height: 512 };
    let obs = Observation::new(
        String::from("speckle_0001.fits"),
        7,
        exposure,
        Some(String::from("alice")),
        Band::new("V"),
        EquatorialCoord::new(1.0, 2.0),
    );
    catalog.insert_observation(obs.clone()).await.unwrap();
    catalog.insert_observation(obs).await.unwrap();

    let log = std::fs::read_to_string(dir.path().join("observations.jsonl")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    let parsed: Observation = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed.star_id(), 7);
    assert_eq!(parsed.exposure().roi_width, 512);
    assert_eq!(catalog.observations().await.len(), 2);
}

#[tokio::test]
async fn test_open_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(LocalCatalog::open(&dir.path().join("absent")).await.is_err());
}
