//! End-to-end solves on the bundled decks.

use axc_config::{CompressorConfig, load};
use axc_core::{Tolerances, nearly_equal};
use axc_stage::SpeedSchedule;
use axc_solver::{
    BladeChange, CompressorModel, MapOptions, MeanlineError, OperatingPoint, StageStatus,
    map_grid, solve_map,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

fn deck(name: &str) -> CompressorConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../decks")
        .join(name);
    load(&path).unwrap()
}

fn single_stage() -> CompressorModel {
    CompressorModel::build(&deck("single_stage.deck")).unwrap()
}

#[test]
fn nominal_single_stage_converges() {
    let model = single_stage();
    let result = model.solve(&model.design_point()).unwrap();
    assert_eq!(result.status, StageStatus::Ok);
    assert!(result.pressure_ratio > 1.0 && result.pressure_ratio < 3.0);
    assert!((0.0..=1.0).contains(&result.efficiency.unwrap()));
    assert!((result.pressure_ratio - 1.35).abs() < 0.02, "PR = {}", result.pressure_ratio);

    let stage = &result.stages[0];
    let perf = stage.performance.unwrap();
    assert!((perf.flow_coefficient - model.stages()[0].design_flow_coefficient()).abs() < 1e-3);
    assert!(stage.incidence.unwrap().abs() < 1e-3);
    assert!(stage.inlet.is_some() && stage.outlet.is_some());
    assert!(nearly_equal(
        stage.cumulative_pressure_ratio,
        result.pressure_ratio,
        Tolerances::default()
    ));
}

#[test]
fn low_flow_stalls_and_high_flow_chokes() {
    let model = single_stage();
    let design = model.design_point();

    let low = model.solve(&design.scaled(1.0, 0.6)).unwrap();
    assert_eq!(low.stages[0].status, StageStatus::Stall);
    assert_eq!(low.status, StageStatus::Stall);

    let high = model.solve(&design.scaled(1.0, 1.4)).unwrap();
    assert_eq!(high.stages[0].status, StageStatus::Choke);
    let perf = high.stages[0].performance.unwrap();
    assert!((perf.flow_coefficient - model.stages()[0].characteristics.phi_choke()).abs() < 1e-12);
}

#[test]
fn design_build_is_deterministic() {
    let cfg = deck("single_stage.deck");
    let a = CompressorModel::build(&cfg).unwrap();
    let b = CompressorModel::build(&cfg).unwrap();
    assert_eq!(a.stages(), b.stages());
}

#[test]
fn lower_speed_gives_lower_pressure_ratio() {
    let model = single_stage();
    let design = model.design_point();
    let at_design = model.solve(&design).unwrap();
    let part = model.solve(&design.scaled(0.9, 0.9)).unwrap();
    assert!(part.pressure_ratio > 1.0);
    assert!(part.pressure_ratio < at_design.pressure_ratio);
}

#[test]
fn map_results_do_not_depend_on_order_or_threads() {
    let model = single_stage();
    let points = map_grid(&model.design_point(), &[1.0, 0.9], &[0.9, 1.0, 1.05]);
    let parallel = solve_map(&model, &points, &MapOptions::default());

    let reversed: Vec<OperatingPoint> = points.iter().rev().copied().collect();
    let mut sequential = solve_map(&model, &reversed, &MapOptions::sequential());
    sequential.reverse();

    assert_eq!(parallel.len(), points.len());
    for (a, b) in parallel.iter().zip(&sequential) {
        assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
    }
}

#[test]
fn progress_is_strictly_increasing() {
    let model = single_stage();
    let points = map_grid(&model.design_point(), &[1.0], &[0.9, 0.95, 1.0, 1.05]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let options = MapOptions::default().with_progress(move |p| {
        assert_eq!(p.total, 4);
        sink.lock().unwrap().push(p.completed);
    });
    solve_map(&model, &points, &options);
    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![1, 2, 3, 4]);
}

#[test]
fn cancelled_run_returns_cancelled() {
    let model = single_stage();
    let points = map_grid(&model.design_point(), &[1.0], &[0.9, 1.0]);
    let options = MapOptions::default().with_cancel(Arc::new(AtomicBool::new(true)));
    let results = solve_map(&model, &points, &options);
    assert!(results.iter().all(|r| matches!(r, Err(MeanlineError::Cancelled))));
}

#[test]
fn blade_reset_leaves_upstream_stages_alone() {
    let model = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let reset = model
        .with_resets(&[BladeChange::RotorExit {
            stage: 2,
            delta: 2f64.to_radians(),
        }])
        .unwrap();

    assert_eq!(reset.stages()[0], model.stages()[0]);
    let (old, new) = (&model.stages()[1], &reset.stages()[1]);
    assert!((new.blades.kappa2 - old.blades.kappa2 - 2f64.to_radians()).abs() < 1e-12);
    assert_eq!(new.blades.kappa1, old.blades.kappa1);
    assert!(new.design_pressure_coefficient() < old.design_pressure_coefficient());
    // downstream stage sees new inlet totals
    assert_ne!(reset.stages()[2].reference_inlet, model.stages()[2].reference_inlet);
}

#[test]
fn stator_reset_starts_at_next_stage() {
    let model = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let delta = 3f64.to_radians();
    let reset = model
        .with_resets(&[BladeChange::Stator { stage: 1, delta }])
        .unwrap();
    assert_eq!(reset.stages()[0], model.stages()[0]);
    let (old, new) = (&model.stages()[1], &reset.stages()[1]);
    assert!((new.inlet_flow_angle - old.inlet_flow_angle - delta).abs() < 1e-12);
    assert_eq!(new.blades, old.blades);
}

#[test]
fn three_stage_machine_bleeds_after_stage_two() {
    let model = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let result = model.solve(&model.design_point()).unwrap();
    assert_eq!(result.stages.len(), 3);
    assert!((result.stages[2].mass_flow - 60.0 * 0.98).abs() < 1e-9);
    assert!((result.stages[1].mass_flow - 60.0).abs() < 1e-9);
    let mut last = 1.0;
    for stage in &result.stages {
        assert!(stage.cumulative_pressure_ratio > last);
        last = stage.cumulative_pressure_ratio;
    }
    assert!(nearly_equal(result.pressure_ratio, last, Tolerances::default()));
}

#[test]
fn tabulated_deck_runs_at_design() {
    let model = CompressorModel::build(&deck("tabulated.yaml")).unwrap();
    let result = model.solve(&model.design_point()).unwrap();
    assert_eq!(result.stages.len(), 2);
    assert!(result.pressure_ratio > 1.0);
    assert_ne!(result.status, StageStatus::DidNotConverge);
}

#[test]
fn failed_stages_report_no_efficiency() {
    let model = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let result = model.solve(&model.design_point().scaled(0.0, 1.0)).unwrap();
    assert_eq!(result.status, StageStatus::DidNotConverge);
    assert!(result.stages.iter().all(|s| s.status == StageStatus::DidNotConverge));
    assert_eq!(result.pressure_ratio, 1.0);
    assert_eq!(result.efficiency, None);
    assert!(result.stages.iter().all(|s| s.cumulative_efficiency.is_none()));
}

#[test]
fn zero_flow_stalls_every_stage() {
    let model = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let result = model.solve(&model.design_point().scaled(1.0, 0.0)).unwrap();
    assert_eq!(result.status, StageStatus::Stall);
    for (solution, stage) in result.stages.iter().zip(model.stages()) {
        assert_eq!(solution.status, StageStatus::Stall);
        let perf = solution.performance.unwrap();
        assert_eq!(perf.flow_coefficient, stage.characteristics.phi_stall());
        assert!(solution.inlet.is_none());
    }
    assert!(result.pressure_ratio > 1.0);
    assert!(result.efficiency.is_some());
}

#[test]
fn scheduled_psi_shift_replaces_rotor_model() {
    let mut cfg = deck("three_stage.deck");
    cfg.stages[0].psi_shift = SpeedSchedule::new(vec![(80.0, -0.06), (100.0, 0.0)]).unwrap();
    let model = CompressorModel::build(&cfg).unwrap();
    let curves = model.characteristics_at(model.design_speed() * 0.9);

    let design = &model.stages()[0].characteristics.pressure_coefficient;
    let shifted = &curves[0].as_ref().unwrap().pressure_coefficient;
    for (&(phi, d), &(phi_n, n)) in design.points().iter().zip(shifted.points()) {
        assert_eq!(phi, phi_n);
        assert!((n - (d - 0.03)).abs() < 1e-12);
    }
    assert_eq!(shifted.phi_stall(), design.phi_stall());

    // Stages without a schedule still follow the rotor model
    let baseline = CompressorModel::build(&deck("three_stage.deck")).unwrap();
    let unscheduled = baseline.characteristics_at(model.design_speed() * 0.9);
    assert_eq!(curves[1], unscheduled[1]);
    assert_ne!(curves[0], unscheduled[0]);
}

#[test]
fn bleed_follows_speed_schedule() {
    let mut cfg = deck("three_stage.deck");
    cfg.stages[1].bleed = SpeedSchedule::new(vec![(80.0, 0.06), (100.0, 0.02)]).unwrap();
    let model = CompressorModel::build(&cfg).unwrap();
    let design = model.design_point();

    let full = model.solve(&design).unwrap();
    assert!((full.stages[2].mass_flow - 60.0 * 0.98).abs() < 1e-9);

    let part = model.solve(&design.scaled(0.9, 0.9)).unwrap();
    assert!((part.stages[1].mass_flow - 54.0).abs() < 1e-9);
    assert!((part.stages[2].mass_flow - 54.0 * 0.96).abs() < 1e-9);
}
