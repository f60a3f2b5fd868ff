//! A compressor ready for off-design solves.

use crate::characteristics::{CurveSettings, build_stage};
use crate::design::solve_design;
use crate::error::MeanlineResult;
use crate::point::OperatingPoint;
use crate::propagate::{Chain, SolverResult, propagate};
use crate::reset::{self, BladeChange, ResetContext, changes_from_config};
use crate::root::RootConfig;
use crate::speed::{at_speed, efficiency_ratio};
use axc_config::CompressorConfig;
use axc_core::units::{AngularVelocity, to_rad, to_rad_per_s, to_rpm};
use axc_gas::PolynomialGas;
use axc_stage::{Stage, StageCharacteristics};
use tracing::{info, warn};

/// Design solution, stage curves and solver settings of one compressor.
///
/// Built once per configuration; immutable afterwards and shareable across threads.
#[derive(Clone, Debug)]
pub struct CompressorModel {
    config: CompressorConfig,
    gas: PolynomialGas,
    stages: Vec<Stage>,
    design_swirl: f64,
    root: RootConfig,
    settings: CurveSettings,
}

impl CompressorModel {
    /// Solve the design point, build the characteristics and apply configured resets.
    ///
    /// # Errors
    /// `DesignPointFailed` when any stage fails at design, or curve construction errors.
    pub fn build(config: &CompressorConfig) -> MeanlineResult<Self> {
        let gas = config.gas.clone();
        let root = RootConfig::from(&config.solver);
        let settings = CurveSettings::from(config);
        let omega = to_rad_per_s(config.rotation.speed);

        let design = solve_design(config, &gas, &root)?;
        let stages = design
            .stages
            .into_iter()
            .zip(&config.stages)
            .map(|(d, c)| build_stage(&gas, d, &c.design, omega, &settings, &root))
            .collect::<MeanlineResult<Vec<_>>>()?;

        let model = Self {
            config: config.clone(),
            gas,
            stages,
            design_swirl: to_rad(config.inlet.swirl_angle),
            root,
            settings,
        };
        info!(
            stages = model.stages.len(),
            rpm = to_rpm(config.rotation.speed),
            "compressor model built"
        );

        if config.has_resets() {
            model.with_resets(&changes_from_config(config))
        } else {
            Ok(model)
        }
    }

    /// New model with `changes` applied on top of this one.
    pub fn with_resets(&self, changes: &[BladeChange]) -> MeanlineResult<Self> {
        let ctx = ResetContext {
            gas: &self.gas,
            omega: to_rad_per_s(self.config.rotation.speed),
            settings: self.settings,
            root: &self.root,
        };
        Ok(Self {
            stages: reset::apply(&ctx, &self.stages, changes)?,
            ..self.clone()
        })
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn gas(&self) -> &PolynomialGas {
        &self.gas
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn root(&self) -> &RootConfig {
        &self.root
    }

    pub fn design_speed(&self) -> AngularVelocity {
        self.config.rotation.speed
    }

    pub fn design_point(&self) -> OperatingPoint {
        OperatingPoint::design(&self.config)
    }

    pub(crate) fn chain(&self) -> Chain<'_> {
        Chain {
            gas: &self.gas,
            stages: &self.stages,
            design_swirl: self.design_swirl,
            design_speed: to_rad_per_s(self.design_speed()),
            root: &self.root,
        }
    }

    /// Stage characteristics at `speed`; `None` where the speed shift could not be built.
    pub fn characteristics_at(&self, speed: AngularVelocity) -> Vec<Option<StageCharacteristics>> {
        let omega = to_rad_per_s(speed);
        let omega_design = to_rad_per_s(self.design_speed());
        let ratio = efficiency_ratio(
            &self.config.rotation.efficiency_ratio_table,
            100.0 * omega / omega_design,
        );
        self.stages
            .iter()
            .map(|stage| match at_speed(&self.gas, stage, omega, omega_design, ratio, &self.root) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!(stage = stage.index, error = %e, "no characteristics at this speed");
                    None
                }
            })
            .collect()
    }

    /// Solve one operating point.
    pub fn solve(&self, point: &OperatingPoint) -> MeanlineResult<SolverResult> {
        let characteristics = self.characteristics_at(point.speed);
        propagate(&self.chain(), &characteristics, point)
    }
}
