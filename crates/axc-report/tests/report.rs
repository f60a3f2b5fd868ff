use axc_config::{OutputFormat, UnitSystem, load, load_raw};
use axc_report::{ReportStatus, build_report, compute_run_id, render, to_json, to_text};
use axc_report::build::point_input;
use axc_solver::{CompressorModel, MapOptions, MeanlineError, map_grid, solve_map};
use std::path::PathBuf;

fn deck_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../decks/single_stage.deck")
}

#[test]
fn single_stage_report() {
    let mut config = load(&deck_path()).unwrap();
    let raw = load_raw(&deck_path()).unwrap();
    let model = CompressorModel::build(&config).unwrap();
    let points = map_grid(&model.design_point(), &[1.0], &[0.6, 1.0]);
    let mut results = solve_map(&model, &points, &MapOptions::sequential());
    results.push(Err(MeanlineError::Cancelled));
    let mut all_points = points.clone();
    all_points.push(model.design_point());

    let inputs: Vec<_> = all_points
        .iter()
        .map(|p| point_input(config.units, p))
        .collect();
    let run_id = compute_run_id(&raw, &inputs, "test");

    config.output.efficiency_threshold = 0.95;
    let report = build_report(&config, run_id.clone(), &all_points, &results);
    assert_eq!(report.manifest.run_id, run_id);
    assert_eq!(report.points.len(), 3);
    assert_eq!(report.points[0].status, ReportStatus::Stall);
    assert_eq!(report.points[1].status, ReportStatus::Ok);
    assert!(report.points[1].stages[0].low_efficiency);
    assert_eq!(report.points[2].status, ReportStatus::DidNotConverge);
    assert!(report.points[2].error.is_some());

    let json = to_json(&report).unwrap();
    assert!(json.contains("\"OK\""));
    let back: axc_report::Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back.points[1].stages[0].index, 1);

    let text = to_text(&report);
    assert!(text.contains("Stall"));
    assert!(text.contains("DidNotConverge"));
    assert!(text.contains("* efficiency below"));
    assert_eq!(render(&report, OutputFormat::Text).unwrap(), text);
}

#[test]
fn customary_report_converts_back() {
    let mut config = load(&deck_path()).unwrap();
    let model = CompressorModel::build(&config).unwrap();
    let points = vec![model.design_point()];
    let results = solve_map(&model, &points, &MapOptions::default());

    config.units = UnitSystem::Customary;
    let report = build_report(&config, "r".to_string(), &points, &results);
    let p = &report.points[0];
    assert!((p.input.total_pressure - 14.696).abs() < 1e-3);
    assert!((p.input.total_temperature - 518.67).abs() < 1e-2);
    assert!((p.input.mass_flow - 220.462).abs() < 1e-2);
    assert_eq!(report.units.pressure, "psia");
    assert_eq!(report.units.velocity, "ft/s");
}

#[test]
fn failed_point_shows_no_efficiency() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../decks/three_stage.deck");
    let config = load(&path).unwrap();
    let model = CompressorModel::build(&config).unwrap();
    let points = vec![model.design_point().scaled(0.0, 1.0)];
    let results = solve_map(&model, &points, &MapOptions::sequential());

    let report = build_report(&config, "r".to_string(), &points, &results);
    let p = &report.points[0];
    assert_eq!(p.status, ReportStatus::DidNotConverge);
    assert_eq!(p.efficiency, None);
    assert!(p.stages.iter().all(|s| s.efficiency.is_none() && s.cumulative_efficiency.is_none()));
    assert!(!p.stages.iter().any(|s| s.low_efficiency));

    let text = to_text(&report);
    assert!(text.contains("eta = -"), "{text}");
    assert!(!text.contains("eta = 1.0000"));
}
