//! Blade and vane resets.
//!
//! A reset produces a new stage list. Stages upstream of the first changed blade row are
//! cloned; from there on every stage is rebuilt against the flow the rebuilt upstream
//! chain delivers at the design point.

use crate::characteristics::{CurveSettings, synthesize};
use crate::error::{MeanlineError, MeanlineResult};
use crate::propagate::{StageInlet, StageStatus, solve_stage};
use crate::root::RootConfig;
use crate::sweep::{RotorSetting, psi_shift};
use axc_config::CompressorConfig;
use axc_core::numeric::interpolate_clamped;
use axc_core::units::to_rad;
use axc_gas::GasModel;
use axc_stage::{
    BladeAngles, CurveSource, DesignPerformance, Stage, StageCharacteristics,
    zero_incidence_flow_coefficient,
};
use tracing::{debug, info, warn};

/// One blade row change [rad], stages 1-based.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BladeChange {
    /// Inlet guide vane: turns the flow entering stage 1
    InletGuideVane { delta: f64 },
    RotorInlet { stage: usize, delta: f64 },
    RotorExit { stage: usize, delta: f64 },
    /// Stator behind `stage`: turns the flow entering the next stage
    Stator { stage: usize, delta: f64 },
}

impl BladeChange {
    /// First stage whose rotor sees the change.
    pub fn first_affected(&self) -> usize {
        match *self {
            BladeChange::InletGuideVane { .. } => 1,
            BladeChange::RotorInlet { stage, .. } | BladeChange::RotorExit { stage, .. } => stage,
            BladeChange::Stator { stage, .. } => stage + 1,
        }
    }

    fn delta(&self) -> f64 {
        match *self {
            BladeChange::InletGuideVane { delta }
            | BladeChange::RotorInlet { delta, .. }
            | BladeChange::RotorExit { delta, .. }
            | BladeChange::Stator { delta, .. } => delta,
        }
    }
}

/// Non-zero resets of a configuration.
pub fn changes_from_config(config: &CompressorConfig) -> Vec<BladeChange> {
    let mut changes = Vec::new();
    let igv = to_rad(config.characteristics.inlet_guide_vane_reset);
    if igv != 0.0 {
        changes.push(BladeChange::InletGuideVane { delta: igv });
    }
    for stage in &config.stages {
        let r = stage.resets;
        let s = stage.index;
        changes.extend(
            [
                BladeChange::RotorInlet { stage: s, delta: r.rotor_inlet },
                BladeChange::RotorExit { stage: s, delta: r.rotor_exit },
                BladeChange::Stator { stage: s, delta: r.stator },
            ]
            .into_iter()
            .filter(|c| c.delta() != 0.0),
        );
    }
    changes
}

/// Fixed inputs of a rebuild.
#[derive(Clone, Copy)]
pub struct ResetContext<'a> {
    pub gas: &'a dyn GasModel,
    /// Design shaft speed [rad/s]
    pub omega: f64,
    pub settings: CurveSettings,
    pub root: &'a RootConfig,
}

/// Blade angles and inlet angle of stage `index` after `changes`.
fn reset_setting(stage: &Stage, changes: &[BladeChange]) -> (BladeAngles, f64) {
    let mut blades = stage.blades;
    let mut alpha1 = stage.inlet_flow_angle;
    for change in changes {
        match *change {
            BladeChange::InletGuideVane { delta } if stage.index == 1 => alpha1 += delta,
            BladeChange::RotorInlet { stage: s, delta } if s == stage.index => {
                blades.kappa1 += delta;
            }
            BladeChange::RotorExit { stage: s, delta } if s == stage.index => {
                blades.kappa2 += delta;
            }
            BladeChange::Stator { stage: s, delta } if s + 1 == stage.index => alpha1 += delta,
            _ => {}
        }
    }
    (blades, alpha1)
}

/// Rebuild `stages` with `changes` applied.
///
/// # Errors
/// Non-physical blade settings, curve synthesis failures, or a rebuilt stage that can not
/// pass its design flow (`DesignPointFailed`).
pub fn apply(
    ctx: &ResetContext<'_>,
    stages: &[Stage],
    changes: &[BladeChange],
) -> MeanlineResult<Vec<Stage>> {
    let n = stages.len();
    let applicable: Vec<BladeChange> = changes
        .iter()
        .copied()
        .filter(|c| {
            let k = c.first_affected();
            if (1..=n).contains(&k) {
                true
            } else {
                warn!(?c, "blade change affects no stage, ignored");
                false
            }
        })
        .collect();
    let Some(first) = applicable.iter().map(BladeChange::first_affected).min() else {
        return Ok(stages.to_vec());
    };
    info!(first_stage = first, changes = applicable.len(), "applying blade resets");

    let mut rebuilt: Vec<Stage> = stages[..first - 1].to_vec();
    let start = &stages[first - 1];
    let mut totals = start.reference_inlet;
    let mut mass_flow = start.design_inlet.mass_flux() * start.geometry.inlet.area().value;

    for old in &stages[first - 1..] {
        let (blades, alpha1) = reset_setting(old, &applicable);
        let phi_design = zero_incidence_flow_coefficient(blades.kappa1, alpha1)?;

        let old_rotor = RotorSetting::from(old);
        let rotor = RotorSetting {
            blades,
            inlet_flow_angle: alpha1,
            reference_inlet: totals,
            ..old_rotor
        };
        let characteristics = rebuild_curves(ctx, old, &old_rotor, &rotor, phi_design)?;
        let psi_design = characteristics.pressure_coefficient.value_at(phi_design);

        let mut stage = Stage {
            blades,
            inlet_flow_angle: alpha1,
            reference_inlet: totals,
            ..old.with_characteristics(characteristics)
        };
        let solution = solve_stage(
            ctx.gas,
            &stage,
            Some(&stage.characteristics),
            StageInlet {
                totals,
                mass_flow,
                flow_angle: alpha1,
            },
            ctx.omega,
            ctx.root,
        );
        let failed = |what: &str| MeanlineError::DesignPointFailed {
            stage: old.index,
            what: format!("after blade reset: {what}"),
        };
        let (Some(performance), Some(inlet), Some(outlet)) =
            (solution.performance, solution.inlet, solution.outlet)
        else {
            return Err(failed("stage can not pass the design flow"));
        };
        if solution.status != StageStatus::Ok {
            warn!(stage = old.index, status = %solution.status, "reset stage runs off its characteristic at design flow");
        }

        stage.design = DesignPerformance {
            flow_coefficient: phi_design,
            pressure_coefficient: psi_design,
            pressure_ratio: performance.pressure_ratio,
            temperature_ratio: performance.temperature_ratio,
            efficiency: performance.efficiency,
            diffusion_factor: solution.diffusion_factor.unwrap_or(old.design.diffusion_factor),
            converged: true,
        };
        stage.design_inlet = inlet;
        stage.design_outlet = outlet;
        debug!(
            stage = stage.index,
            phi_design,
            psi_design,
            kappa1_deg = blades.kappa1.to_degrees(),
            kappa2_deg = blades.kappa2.to_degrees(),
            "stage rebuilt"
        );

        totals = solution.exit_totals;
        mass_flow *= 1.0 - stage.bleed_fraction(100.0);
        rebuilt.push(stage);
    }
    Ok(rebuilt)
}

fn rebuild_curves(
    ctx: &ResetContext<'_>,
    old: &Stage,
    old_rotor: &RotorSetting,
    rotor: &RotorSetting,
    phi_design: f64,
) -> MeanlineResult<StageCharacteristics> {
    let current = &old.characteristics;
    match current.source {
        CurveSource::DesignPoint { efficiency } => synthesize(
            ctx.gas,
            rotor,
            phi_design,
            efficiency.peak,
            ctx.omega,
            &ctx.settings,
            ctx.root,
        ),
        CurveSource::Tabulated => {
            let deltas = psi_shift(
                ctx.gas,
                &current.pressure_coefficient,
                (old_rotor, ctx.omega),
                (rotor, ctx.omega),
                &current.efficiency,
                ctx.root,
            )?;
            Ok(StageCharacteristics {
                efficiency: current.efficiency.clone(),
                pressure_coefficient: current
                    .pressure_coefficient
                    .shifted(|phi| interpolate_clamped(&deltas, phi).unwrap_or(0.0))?,
                source: CurveSource::Tabulated,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stator_reset_affects_next_stage() {
        assert_eq!(BladeChange::Stator { stage: 2, delta: 0.1 }.first_affected(), 3);
        assert_eq!(BladeChange::RotorExit { stage: 2, delta: 0.1 }.first_affected(), 2);
        assert_eq!(BladeChange::InletGuideVane { delta: 0.1 }.first_affected(), 1);
    }

    #[test]
    fn zero_resets_produce_no_changes() {
        let cfg = axc_config::from_str(
            "[CONSTANT]\n- n_stages: 2\n[INLET]\n- total_pressure: 101325\n\
             - total_temperature: 288.15\n- mass_flow: 100\n[ROTATION]\n- rpm: 10000\n\
             [STAGE 1]\n- pressure_ratio: 1.3\n- efficiency: 0.88\n\
             [STAGE 2]\n- pressure_ratio: 1.3\n- efficiency: 0.88\n- stator_reset: 2\n",
        )
        .unwrap();
        let changes = changes_from_config(&cfg);
        assert_eq!(changes.len(), 1);
        match changes[0] {
            BladeChange::Stator { stage, delta } => {
                assert_eq!(stage, 2);
                assert!((delta - 2f64.to_radians()).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
