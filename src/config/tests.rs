use super::{Config, ConfigError, PolicyKind};
use std::time::Duration;

#[test]
fn test_empty_file_yields_defaults() {
    let cfg = Config::parse("").unwrap();
    assert!(cfg.simulate);
    assert_eq!(cfg.rpc.console_bind, "0.0.0.0:1337");
    assert_eq!(cfg.rpc.timeout(), Duration::from_secs(5));
    assert_eq!(cfg.acquisition.plate_solve_tries, 3);
    assert_eq!(cfg.acquisition.max_refine_rounds, 10);
    assert!(!cfg.acquisition.autofocus);
    assert_eq!(cfg.scheduler.policy, PolicyKind::Weighted);
    assert_eq!(cfg.scheduler.max_search_widenings, 8);
    assert_eq!(cfg.bands().len(), 4);

    let run = cfg.run_config();
    assert_eq!(run.poll_interval, Duration::from_millis(250));
    assert_eq!(run.settle_time, Duration::from_millis(2000));
    assert!((run.tolerance.ra - 0.01).abs() < 1e-12);
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let text = r#"
        simulate = false

        [rpc]
        telescope = "http://mount.local:8000"

        [acquisition]
        plate_solve_tries = 5
        scicam_x = 120.5
        scicam_y = -40.0
        autofocus = true

        [timing]
        settle_ms = 0

        [scheduler]
        policy = "in_order"
        max_single_dist_ra = 3.0

        [site]
        longitude_deg = -17.88

        [filters]
        bands = ["V"]
    "#;
    let cfg = Config::parse(text).unwrap();
    assert!(!cfg.simulate);
    assert_eq!(cfg.rpc.telescope, "http://mount.local:8000");
    assert_eq!(cfg.rpc.slider, "http://localhost:5002");
    assert_eq!(cfg.scheduler.policy, PolicyKind::InOrder);

    let run = cfg.run_config();
    assert_eq!(run.plate_solve_tries, 5);
    assert_eq!(run.scicam_offset, (120.5, -40.0));
    assert!(run.autofocus);
    assert_eq!(run.settle_time, Duration::ZERO);
    assert_eq!(run.poll_interval, Duration::from_millis(250));

    let search = cfg.single_search();
    assert!((search.max_dist_ra - 3.0).abs() < 1e-12);
    assert!((search.max_dist_dec - 2.0).abs() < 1e-12);
    assert!((cfg.site.longitude_deg + 17.88).abs() < 1e-12);
    assert_eq!(cfg.bands().iter().map(ToString::to_string).collect::<Vec<_>>(), vec!["V"]);
}

#[test]
fn test_unknown_policy_is_rejected() {
    let res = Config::parse("[scheduler]\npolicy = \"greedy\"\n");
    assert!(matches!(res, Err(ConfigError::Parse(_))));
}

#[tokio::test]
async fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::load(dir.path().join("absent.toml")).await.unwrap();
    assert_eq!(cfg.acquisition.plate_solve_tries, 3);
}

#[tokio::test]
async fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speckle.toml");
    tokio::fs::write(&path, "[timing]\npoll_interval_ms = 10\n").await.unwrap();
    let cfg = Config::load(&path).await.unwrap();
    assert_eq!(cfg.timing.poll_interval_ms, 10);
}
