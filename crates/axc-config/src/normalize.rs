//! Interpretation and validation of a raw deck into a [`CompressorConfig`].

use crate::error::{ConfigError, ConfigResult};
use crate::raw::RawConfig;
use crate::schema::{
    AnalysisType, BladeResets, CharacteristicsConfig, CompressorConfig, DesignMode, Direction,
    InletConditions, OutputFormat, OutputSettings, RotationConfig, SolverSettings, StageConfig,
    StageDesignInput, WorkTarget,
};
use crate::units::{Quantity, UnitSystem};
use axc_core::constants::{R_AIR, R_UNIVERSAL};
use axc_core::units::{deg, k, kgps, m, pa, rpm};
use axc_gas::{GasModel, PolynomialGas};
use axc_stage::{Annulus, CurveKind, SpeedSchedule, StageCurve, StageGeometry};

pub const CONSTANT: &str = "CONSTANT";
pub const INLET: &str = "INLET";
pub const GAS: &str = "GAS PROPERTIES";
pub const ROTATION: &str = "ROTATION";
pub const CHARACTERISTICS: &str = "STAGE CHARACTERISTICS";
pub const SOLVER: &str = "SOLVER";
pub const OUTPUT: &str = "OUTPUT";

pub fn stage_section(index: usize) -> String {
    format!("STAGE {index}")
}

/// Typed access to raw entries with section/key aware errors.
struct Reader<'a> {
    raw: &'a RawConfig,
}

/// A `[STAGE CHARACTERISTICS]` curve entry: scalar (Mode A) or table (Mode B).
enum CurveEntry {
    Scalar(f64),
    Table(Vec<(f64, f64)>),
}

impl<'a> Reader<'a> {
    fn parse_error(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
        ConfigError::Parse {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn text(&self, section: &str, key: &str) -> Option<&'a str> {
        self.raw.get(section, key)
    }

    fn f64(&self, section: &str, key: &str) -> ConfigResult<Option<f64>> {
        self.text(section, key)
            .map(|v| {
                v.parse::<f64>()
                    .ok()
                    .filter(|x| x.is_finite())
                    .ok_or_else(|| Self::parse_error(section, key, v, "expected a finite number"))
            })
            .transpose()
    }

    fn required_f64(&self, section: &str, key: &str) -> ConfigResult<f64> {
        self.f64(section, key)?.ok_or_else(|| ConfigError::Missing {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    fn count(&self, section: &str, key: &str) -> ConfigResult<Option<usize>> {
        match self.f64(section, key)? {
            None => Ok(None),
            Some(x) if x >= 0.0 && x.fract() == 0.0 => Ok(Some(x as usize)),
            Some(x) => Err(Self::parse_error(
                section,
                key,
                &x.to_string(),
                "expected a non-negative integer",
            )),
        }
    }

    fn table(&self, section: &str, key: &str) -> ConfigResult<Option<Vec<(f64, f64)>>> {
        self.text(section, key)
            .map(|v| parse_table(v).ok_or_else(|| {
                Self::parse_error(section, key, v, "expected 'x:y' pairs separated by commas")
            }))
            .transpose()
    }

    fn curve_entry(&self, section: &str, key: &str) -> ConfigResult<Option<CurveEntry>> {
        match self.text(section, key) {
            None => Ok(None),
            Some(v) if v.contains(':') => Ok(self.table(section, key)?.map(CurveEntry::Table)),
            Some(_) => Ok(self.f64(section, key)?.map(CurveEntry::Scalar)),
        }
    }
}

/// Parse `x:y, x:y, …` (commas, semicolons or whitespace between pairs).
pub fn parse_table(text: &str) -> Option<Vec<(f64, f64)>> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (x, y) = pair.split_once(':')?;
            let x = x.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            let y = y.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some((x, y))
        })
        .collect()
}

fn parse_list(text: &str) -> Option<Vec<f64>> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn require_positive(field: &str, value: f64) -> ConfigResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(field, value, "must be positive"))
    }
}

fn require_efficiency(field: &str, value: f64) -> ConfigResult<f64> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(field, value, "must lie in (0, 1]"))
    }
}

fn require_angle(field: &str, degrees: f64) -> ConfigResult<f64> {
    if degrees.abs() < 90.0 {
        Ok(degrees)
    } else {
        Err(ConfigError::invalid(field, degrees, "must lie in (-90, 90) degrees"))
    }
}

/// A `pct_speed:value` table.
fn speed_schedule(field: &str, table: Vec<(f64, f64)>) -> ConfigResult<SpeedSchedule> {
    let text = format!("{table:?}");
    SpeedSchedule::new(table).map_err(|e| ConfigError::invalid(field, text, e.to_string()))
}

/// Validate a φ-table through the curve constructor.
fn validate_table(field: &str, kind: CurveKind, table: &[(f64, f64)]) -> ConfigResult<()> {
    StageCurve::from_points(kind, table.to_vec())
        .map_err(|e| ConfigError::invalid(field, format!("{table:?}"), e.to_string()))?;
    if kind == CurveKind::Efficiency {
        for &(_, eta) in table {
            require_efficiency(field, eta)?;
        }
    }
    if table.iter().any(|&(phi, _)| phi <= 0.0) {
        return Err(ConfigError::invalid(
            field,
            format!("{table:?}"),
            "flow coefficients must be positive",
        ));
    }
    Ok(())
}

/// Turn a raw deck into a validated, SI-normalized configuration.
///
/// # Errors
/// Any missing required field, unparsable value or inconsistent input.
pub fn normalize(raw: &RawConfig) -> ConfigResult<CompressorConfig> {
    let r = Reader { raw };

    // [CONSTANT]
    let analysis = match r.text(CONSTANT, "analysis_type") {
        None => AnalysisType::Compressor,
        Some(v) if v.eq_ignore_ascii_case("compressor") => AnalysisType::Compressor,
        Some(v) => {
            return Err(ConfigError::invalid(
                "constant.analysis_type",
                v,
                "only 'compressor' is supported",
            ));
        }
    };
    let n_stages = r.count(CONSTANT, "n_stages")?.ok_or_else(|| ConfigError::Missing {
        section: CONSTANT.to_string(),
        key: "n_stages".to_string(),
    })?;
    if n_stages < 1 {
        return Err(ConfigError::invalid("constant.n_stages", n_stages, "must be at least 1"));
    }
    let units = match r.text(CONSTANT, "units") {
        Some(v) => v.parse::<UnitSystem>()?,
        None => UnitSystem::Si,
    };
    let verbosity = r.count(CONSTANT, "verbosity")?.unwrap_or(1);
    if verbosity > 3 {
        return Err(ConfigError::invalid("constant.verbosity", verbosity, "must lie in 0..=3"));
    }

    // [INLET]
    let p0 = units.to_si(Quantity::Pressure, r.required_f64(INLET, "total_pressure")?);
    let t0 = units.to_si(Quantity::Temperature, r.required_f64(INLET, "total_temperature")?);
    let mdot = units.to_si(Quantity::MassFlow, r.required_f64(INLET, "mass_flow")?);
    let swirl = require_angle("inlet.swirl_angle", r.f64(INLET, "swirl_angle")?.unwrap_or(0.0))?;
    let mach_number = r.f64(INLET, "mach_number")?.unwrap_or(0.5);
    if !(mach_number > 0.0 && mach_number < 1.0) {
        return Err(ConfigError::invalid("inlet.mach_number", mach_number, "must lie in (0, 1)"));
    }
    let inlet = InletConditions {
        total_pressure: pa(require_positive("inlet.total_pressure", p0)?),
        total_temperature: k(require_positive("inlet.total_temperature", t0)?),
        mass_flow: kgps(require_positive("inlet.mass_flow", mdot)?),
        swirl_angle: deg(swirl),
        mach_number,
    };

    let gas = normalize_gas(&r, units, inlet.total_temperature.value)?;

    // [ROTATION]
    let speed = require_positive("rotation.rpm", r.required_f64(ROTATION, "rpm")?)?;
    let direction = match r.text(ROTATION, "direction").map(str::to_ascii_lowercase) {
        None => Direction::Clockwise,
        Some(d) if d == "cw" || d == "clockwise" => Direction::Clockwise,
        Some(d) if d == "ccw" || d == "counterclockwise" || d == "counter-clockwise" => {
            Direction::CounterClockwise
        }
        Some(d) => {
            return Err(ConfigError::invalid("rotation.direction", d, "expected CW or CCW"));
        }
    };
    let efficiency_ratio_table = r.table(ROTATION, "efficiency_ratio_table")?.unwrap_or_default();
    if efficiency_ratio_table.windows(2).any(|w| w[1].0 <= w[0].0)
        || efficiency_ratio_table.iter().any(|&(pct, ratio)| pct <= 0.0 || ratio <= 0.0)
    {
        return Err(ConfigError::invalid(
            "rotation.efficiency_ratio_table",
            format!("{efficiency_ratio_table:?}"),
            "speeds must increase and ratios must be positive",
        ));
    }
    let rotation = RotationConfig {
        speed: rpm(speed),
        direction,
        efficiency_ratio_table,
    };

    // [STAGE CHARACTERISTICS]
    let range = r.f64(CHARACTERISTICS, "flow_coefficient_range")?.unwrap_or(0.2);
    if !(range > 0.0 && range < 1.0) {
        return Err(ConfigError::invalid(
            "stage_characteristics.flow_coefficient_range",
            range,
            "must lie in (0, 1)",
        ));
    }
    let hub_tip_ratio = r.f64(CHARACTERISTICS, "hub_tip_ratio")?.unwrap_or(0.6);
    if !(0.0..1.0).contains(&hub_tip_ratio) {
        return Err(ConfigError::invalid(
            "stage_characteristics.hub_tip_ratio",
            hub_tip_ratio,
            "must lie in [0, 1)",
        ));
    }
    let igv = require_angle(
        "stage_characteristics.inlet_guide_vane_angle",
        r.f64(CHARACTERISTICS, "inlet_guide_vane_angle")?.unwrap_or(0.0),
    )?;
    let igv_reset = require_angle(
        "stage_characteristics.inlet_guide_vane_reset",
        r.f64(CHARACTERISTICS, "inlet_guide_vane_reset")?.unwrap_or(0.0),
    )?;
    require_angle("inlet swirl + inlet guide vane angle", swirl + igv + igv_reset)?;
    let characteristics = CharacteristicsConfig {
        flow_coefficient_range: range,
        blade_deviation_adjustment: r
            .f64(CHARACTERISTICS, "blade_deviation_adjustment")?
            .unwrap_or(0.0),
        inlet_guide_vane_angle: deg(igv),
        inlet_guide_vane_reset: deg(igv_reset),
        stall_efficiency_ratio: require_efficiency(
            "stage_characteristics.stall_efficiency_ratio",
            r.f64(CHARACTERISTICS, "stall_efficiency_ratio")?.unwrap_or(0.90),
        )?,
        choke_efficiency_ratio: require_efficiency(
            "stage_characteristics.choke_efficiency_ratio",
            r.f64(CHARACTERISTICS, "choke_efficiency_ratio")?.unwrap_or(0.85),
        )?,
        hub_tip_ratio,
    };

    let stages = (1..=n_stages)
        .map(|index| normalize_stage(&r, units, index))
        .collect::<ConfigResult<Vec<_>>>()?;
    if let Some((name, _)) = raw.sections().find(|(name, _)| {
        name.strip_prefix("STAGE ")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .is_some_and(|n| n == 0 || n > n_stages)
    }) {
        return Err(ConfigError::invalid(
            "constant.n_stages",
            n_stages,
            format!("deck contains [{name}]"),
        ));
    }
    let mode = select_mode(&stages)?;

    // [SOLVER]
    let defaults = SolverSettings::default();
    let solver = SolverSettings {
        max_iters: r.count(SOLVER, "max_iters")?.unwrap_or(defaults.max_iters),
        convergence_tolerance: require_positive(
            "solver.convergence_tolerance",
            r.f64(SOLVER, "convergence_tolerance")?
                .unwrap_or(defaults.convergence_tolerance),
        )?,
        numerical_damping: r
            .f64(SOLVER, "numerical_damping")?
            .unwrap_or(defaults.numerical_damping),
        curve_points: r.count(SOLVER, "curve_points")?.unwrap_or(defaults.curve_points),
    };
    if solver.max_iters < 1 {
        return Err(ConfigError::invalid("solver.max_iters", solver.max_iters, "must be at least 1"));
    }
    if !(solver.numerical_damping > 0.0 && solver.numerical_damping <= 1.0) {
        return Err(ConfigError::invalid(
            "solver.numerical_damping",
            solver.numerical_damping,
            "must lie in (0, 1]",
        ));
    }
    if solver.curve_points < 5 {
        return Err(ConfigError::invalid(
            "solver.curve_points",
            solver.curve_points,
            "must be at least 5",
        ));
    }

    // [OUTPUT]
    let efficiency_threshold = r.f64(OUTPUT, "efficiency")?.unwrap_or(0.0);
    if !(0.0..=1.0).contains(&efficiency_threshold) {
        return Err(ConfigError::invalid(
            "output.efficiency",
            efficiency_threshold,
            "must lie in [0, 1]",
        ));
    }
    let format = match r.text(OUTPUT, "format").map(str::to_ascii_lowercase).as_deref() {
        None | Some("0") | Some("text") => OutputFormat::Text,
        Some("1") | Some("json") => OutputFormat::Json,
        Some(other) => {
            return Err(ConfigError::invalid("output.format", other, "expected 0 (text) or 1 (JSON)"));
        }
    };

    Ok(CompressorConfig {
        analysis,
        units,
        verbosity: verbosity as u8,
        inlet,
        gas,
        rotation,
        characteristics,
        mode,
        stages,
        solver,
        output: OutputSettings {
            efficiency_threshold,
            format,
        },
    })
}

fn normalize_gas(r: &Reader<'_>, units: UnitSystem, t0: f64) -> ConfigResult<PolynomialGas> {
    let gas_constant = match (r.f64(GAS, "r")?, r.f64(GAS, "molecular_weight")?) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::invalid(
                "gas_properties",
                "r + molecular_weight",
                "give either r or molecular_weight, not both",
            ));
        }
        (Some(value), None) => {
            require_positive("gas_properties.r", units.to_si(Quantity::GasConstant, value))?
        }
        // kg/kmol in either unit system
        (None, Some(mw)) => R_UNIVERSAL / require_positive("gas_properties.molecular_weight", mw)?,
        (None, None) => R_AIR,
    };
    let gamma = r.f64(GAS, "gamma")?;
    let coefficients = r
        .text(GAS, "cp_coefficients")
        .map(|v| {
            parse_list(v)
                .filter(|c| !c.is_empty() && c.len() <= 6)
                .ok_or_else(|| {
                    Reader::parse_error(GAS, "cp_coefficients", v, "expected 1 to 6 numbers")
                })
        })
        .transpose()?;

    let gas = match (gamma, coefficients) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::invalid(
                "gas_properties",
                "gamma + cp_coefficients",
                "give either gamma or cp_coefficients, not both",
            ));
        }
        (Some(gamma), None) => PolynomialGas::calorically_perfect(gamma, gas_constant)
            .map_err(|e| ConfigError::invalid("gas_properties.gamma", gamma, e.to_string()))?,
        (None, Some(list)) => {
            let mut coefficients = [0.0; 6];
            coefficients[..list.len()].copy_from_slice(&list);
            PolynomialGas::new(units.cp_coefficients_to_si(coefficients), gas_constant).map_err(
                |e| ConfigError::invalid("gas_properties.cp_coefficients", format!("{list:?}"), e.to_string()),
            )?
        }
        (None, None) if gas_constant == R_AIR => PolynomialGas::air(),
        (None, None) => PolynomialGas::new(PolynomialGas::AIR_COEFFICIENTS, gas_constant)
            .map_err(|e| ConfigError::invalid("gas_properties.r", gas_constant, e.to_string()))?,
    };

    // The gas must be physical at least at the inlet
    gas.properties(k(t0))
        .map_err(|e| ConfigError::invalid("gas_properties", t0, e.to_string()))?;
    Ok(gas)
}

fn normalize_stage(r: &Reader<'_>, units: UnitSystem, index: usize) -> ConfigResult<StageConfig> {
    let section = stage_section(index);
    let field = |key: &str| format!("stage_{index}.{key}");

    let radii = ["tip_radius_inlet", "hub_radius_inlet", "tip_radius_outlet", "hub_radius_outlet"]
        .map(|key| r.f64(&section, key));
    let [tip_in, hub_in, tip_out, hub_out] = {
        let [a, b, c, d] = radii;
        [a?, b?, c?, d?]
    };
    let solidity = require_positive(&field("solidity"), r.f64(&section, "solidity")?.unwrap_or(1.0))?;
    let geometry = match (tip_in, hub_in, tip_out, hub_out) {
        (None, None, None, None) => None,
        (Some(ti), Some(hi), Some(to), Some(ho)) => {
            let len = |v: f64| m(units.to_si(Quantity::Length, v));
            let inlet = Annulus::new(len(ti), len(hi))
                .map_err(|e| ConfigError::invalid(field("inlet annulus"), format!("{ti}/{hi}"), e.to_string()))?;
            let outlet = Annulus::new(len(to), len(ho))
                .map_err(|e| ConfigError::invalid(field("outlet annulus"), format!("{to}/{ho}"), e.to_string()))?;
            Some(
                StageGeometry::new(inlet, outlet, solidity)
                    .map_err(|e| ConfigError::invalid(field("solidity"), solidity, e.to_string()))?,
            )
        }
        _ => {
            return Err(ConfigError::invalid(
                field("geometry"),
                "partial",
                "give all four of tip/hub radius at inlet/outlet, or none",
            ));
        }
    };

    let inlet_flow_angle =
        require_angle(&field("inlet_flow_angle"), r.f64(&section, "inlet_flow_angle")?.unwrap_or(0.0))?;
    let reset = |key: &str| -> ConfigResult<f64> {
        Ok(require_angle(&field(key), r.f64(&section, key)?.unwrap_or(0.0))?.to_radians())
    };
    let resets = BladeResets {
        rotor_inlet: reset("rotor_inlet_reset")?,
        rotor_exit: reset("rotor_exit_reset")?,
        stator: reset("stator_reset")?,
    };
    let bleed = match (r.f64(&section, "bleed_fraction")?, r.table(&section, "bleed_table")?) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::invalid(
                field("bleed"),
                "bleed_fraction + bleed_table",
                "give either bleed_fraction or bleed_table, not both",
            ));
        }
        (Some(fraction), None) => SpeedSchedule::constant(fraction),
        (None, Some(table)) => speed_schedule(&field("bleed_table"), table)?,
        (None, None) => SpeedSchedule::default(),
    };
    if let Some(&(_, fraction)) = bleed.points().iter().find(|(_, f)| !(0.0..1.0).contains(f)) {
        return Err(ConfigError::invalid(field("bleed"), fraction, "must lie in [0, 1)"));
    }
    let psi_shift = match r.table(&section, "psi_shift_table")? {
        Some(table) => speed_schedule(&field("psi_shift_table"), table)?,
        None => SpeedSchedule::default(),
    };

    Ok(StageConfig {
        index,
        geometry,
        solidity,
        inlet_flow_angle: inlet_flow_angle.to_radians(),
        design: stage_design_input(r, index)?,
        resets,
        bleed,
        psi_shift,
    })
}

fn stage_design_input(r: &Reader<'_>, index: usize) -> ConfigResult<StageDesignInput> {
    let section = stage_section(index);
    let field = |key: &str| format!("stage_{index}.{key}");

    let pr = r.f64(&section, "pressure_ratio")?;
    let eta = r.f64(&section, "efficiency")?;
    let psi_table = r.table(&section, "pressure_coefficient_curve")?;
    let eta_table = r.table(&section, "efficiency_curve")?;
    let has_a = pr.is_some() || eta.is_some();
    let has_b = psi_table.is_some() || eta_table.is_some();

    let shared_psi = r.curve_entry(CHARACTERISTICS, "stage_pressure_coefficient_curve")?;
    let shared_eta = r.curve_entry(CHARACTERISTICS, "stage_efficiency_curve")?;

    let is_table = |e: &Option<CurveEntry>| matches!(e, Some(CurveEntry::Table(_)));
    let is_scalar = |e: &Option<CurveEntry>| matches!(e, Some(CurveEntry::Scalar(_)));
    let mixed = if has_a && has_b {
        Some("pressure_ratio/efficiency + curves")
    } else if has_a && (is_table(&shared_psi) || is_table(&shared_eta)) {
        Some("pressure_ratio/efficiency + shared curve tables")
    } else if has_b && (is_scalar(&shared_psi) || is_scalar(&shared_eta)) {
        Some("curves + shared scalar characteristics")
    } else {
        None
    };
    if let Some(inputs) = mixed {
        return Err(ConfigError::invalid(
            field("design"),
            inputs,
            "mixes design-point and characteristic inputs",
        ));
    }

    if has_a {
        let pr = pr.ok_or_else(|| ConfigError::Missing {
            section: section.clone(),
            key: "pressure_ratio".into(),
        })?;
        if pr <= 1.0 {
            return Err(ConfigError::invalid(field("pressure_ratio"), pr, "must exceed 1"));
        }
        let eta = match (eta, &shared_eta) {
            (Some(eta), _) => eta,
            (None, Some(CurveEntry::Scalar(eta))) => *eta,
            _ => {
                return Err(ConfigError::Missing {
                    section: section.clone(),
                    key: "efficiency".into(),
                });
            }
        };
        return Ok(StageDesignInput::DesignPoint {
            work: WorkTarget::PressureRatio(pr),
            efficiency: require_efficiency(&field("efficiency"), eta)?,
        });
    }

    if has_b {
        let (psi, eta) = match (psi_table, eta_table) {
            (Some(psi), Some(eta)) => (psi, eta),
            (None, _) => {
                return Err(ConfigError::Missing {
                    section,
                    key: "pressure_coefficient_curve".into(),
                });
            }
            (_, None) => {
                return Err(ConfigError::Missing {
                    section,
                    key: "efficiency_curve".into(),
                });
            }
        };
        validate_table(&field("pressure_coefficient_curve"), CurveKind::PressureCoefficient, &psi)?;
        validate_table(&field("efficiency_curve"), CurveKind::Efficiency, &eta)?;
        return Ok(StageDesignInput::Characteristics {
            pressure_coefficient: psi,
            efficiency: eta,
        });
    }

    let shared_field = |key: &str| format!("stage_characteristics.{key}");
    match (shared_psi, shared_eta) {
        (Some(CurveEntry::Scalar(psi)), Some(CurveEntry::Scalar(eta))) => {
            Ok(StageDesignInput::DesignPoint {
                work: WorkTarget::PressureCoefficient(require_positive(
                    &shared_field("stage_pressure_coefficient_curve"),
                    psi,
                )?),
                efficiency: require_efficiency(&shared_field("stage_efficiency_curve"), eta)?,
            })
        }
        (Some(CurveEntry::Table(psi)), Some(CurveEntry::Table(eta))) => {
            validate_table(
                &shared_field("stage_pressure_coefficient_curve"),
                CurveKind::PressureCoefficient,
                &psi,
            )?;
            validate_table(&shared_field("stage_efficiency_curve"), CurveKind::Efficiency, &eta)?;
            Ok(StageDesignInput::Characteristics {
                pressure_coefficient: psi,
                efficiency: eta,
            })
        }
        (Some(_), Some(_)) => Err(ConfigError::invalid(
            "stage_characteristics",
            "scalar + table",
            "mixes design-point and characteristic inputs",
        )),
        (None, _) => Err(ConfigError::Missing {
            section: CHARACTERISTICS.to_string(),
            key: "stage_pressure_coefficient_curve".into(),
        }),
        (_, None) => Err(ConfigError::Missing {
            section: CHARACTERISTICS.to_string(),
            key: "stage_efficiency_curve".into(),
        }),
    }
}

fn select_mode(stages: &[StageConfig]) -> ConfigResult<DesignMode> {
    let mode_of = |s: &StageConfig| match s.design {
        StageDesignInput::DesignPoint { .. } => DesignMode::DesignPoint,
        StageDesignInput::Characteristics { .. } => DesignMode::Characteristics,
    };
    let first = stages.first().map(mode_of).unwrap_or(DesignMode::DesignPoint);
    if let Some(odd) = stages.iter().find(|s| mode_of(s) != first) {
        return Err(ConfigError::invalid(
            format!("stage_{}.design", odd.index),
            format!("{:?}", mode_of(odd)),
            format!("stage 1 uses {first:?}; all stages must use the same design-input mode"),
        ));
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_parsing() {
        assert_eq!(
            parse_table("0.3:0.5, 0.4:0.45;0.5:0.3"),
            Some(vec![(0.3, 0.5), (0.4, 0.45), (0.5, 0.3)])
        );
        assert_eq!(parse_table("0.3:0.5, 0.4"), None);
        assert_eq!(parse_table("0.3:abc"), None);
    }

    #[test]
    fn list_parsing() {
        assert_eq!(parse_list("1, 2 3"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(parse_list("1, x"), None);
    }
}
