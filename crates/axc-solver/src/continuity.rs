//! Continuity ρ(c_x)·c_x·A = ṁ solved for the axial velocity on the subsonic branch.

use crate::error::{MeanlineError, MeanlineResult};
use crate::root::{RootConfig, solve_bracketed};
use axc_gas::{GasModel, critical_speed};
use axc_stage::{FlowStation, TotalConditions};

/// Samples used to bracket the subsonic root.
const SCAN_STEPS: usize = 40;
/// Bisection steps used to locate the sonic limit when the scan overshoots it.
const SONIC_BISECTIONS: usize = 40;

/// How the tangential velocity at a station depends on the axial velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Swirl {
    /// Fixed absolute flow angle α [rad]: c_θ = c_x tan α
    Angle(f64),
    /// Fixed absolute tangential velocity [m/s]
    Tangential(f64),
    /// Fixed relative flow angle β [rad]: c_θ = U − c_x tan β
    RelativeAngle(f64),
}

impl Swirl {
    pub fn tangential(&self, axial_velocity: f64, blade_speed: f64) -> f64 {
        match *self {
            Swirl::Angle(alpha) => axial_velocity * alpha.tan(),
            Swirl::Tangential(c_theta) => c_theta,
            Swirl::RelativeAngle(beta) => blade_speed - axial_velocity * beta.tan(),
        }
    }
}

/// Result of a continuity solve.
#[derive(Clone, Debug, PartialEq)]
pub enum Continuity {
    Solved {
        station: FlowStation,
        iterations: usize,
    },
    /// Iterations ran out; `station` is the last iterate.
    NotConverged {
        station: FlowStation,
        iterations: usize,
    },
    /// The annulus can not pass the flow below sonic velocity.
    Choked {
        /// Largest subsonic mass flow found [kg/s]
        max_mass_flow: f64,
    },
}

impl Continuity {
    pub fn station(&self) -> Option<&FlowStation> {
        match self {
            Continuity::Solved { station, .. } | Continuity::NotConverged { station, .. } => {
                Some(station)
            }
            Continuity::Choked { .. } => None,
        }
    }
}

/// Continuity with a caller supplied station builder.
///
/// `station_at(c_x)` builds the station for a trial axial velocity; it may change total
/// conditions with c_x (rotor exit with fixed relative angle). The range [0, `c_max`] is
/// scanned for the first sign change of the mass-flow residual between neighbouring
/// subsonic samples; samples where the builder fails or the absolute velocity is
/// supersonic split the range. When the scan runs from subsonic into supersonic flow
/// without reaching the mass flow, the sonic edge is located and tested as well.
pub fn solve_with<F>(
    mass_flow: f64,
    area: f64,
    c_max: f64,
    mut station_at: F,
    root: &RootConfig,
) -> MeanlineResult<Continuity>
where
    F: FnMut(f64) -> MeanlineResult<FlowStation>,
{
    if !(mass_flow > 0.0 && area > 0.0 && c_max > 0.0) {
        return Err(MeanlineError::ConvergenceFailure {
            what: format!(
                "continuity needs positive flow, area and velocity range (ṁ={mass_flow}, A={area}, c_max={c_max})"
            ),
        });
    }

    // Residual of a subsonic sample, None beyond the sonic limit
    let mut residual_at = |c_x: f64| -> Option<f64> {
        let station = station_at(c_x).ok()?;
        if station.mach_number >= 1.0 {
            return None;
        }
        Some(station.mass_flux() * area / mass_flow - 1.0)
    };

    let mut max_flux_ratio = 0.0_f64;
    let mut last = residual_at(0.0).map(|r| (0.0, r));
    let mut bracket = None;

    for i in 1..=SCAN_STEPS {
        let c_x = c_max * i as f64 / SCAN_STEPS as f64;
        match (last, residual_at(c_x)) {
            (Some(prev), Some(r)) => {
                max_flux_ratio = max_flux_ratio.max(r + 1.0);
                if (prev.1 < 0.0) != (r < 0.0) {
                    bracket = Some((prev, (c_x, r)));
                    break;
                }
                last = Some((c_x, r));
            }
            (None, Some(r)) => {
                max_flux_ratio = max_flux_ratio.max(r + 1.0);
                last = Some((c_x, r));
            }
            (Some(prev), None) => {
                // Left the subsonic range: test the flow at the sonic edge
                let (mut good, mut bad) = (prev, c_x);
                for _ in 0..SONIC_BISECTIONS {
                    let mid = 0.5 * (good.0 + bad);
                    match residual_at(mid) {
                        Some(r) => {
                            max_flux_ratio = max_flux_ratio.max(r + 1.0);
                            if (prev.1 < 0.0) != (r < 0.0) {
                                bracket = Some((good, (mid, r)));
                                break;
                            }
                            good = (mid, r);
                        }
                        None => bad = mid,
                    }
                }
                if bracket.is_some() {
                    break;
                }
                last = None;
            }
            (None, None) => {}
        }
    }

    let Some((lo, hi)) = bracket else {
        return Ok(Continuity::Choked {
            max_mass_flow: max_flux_ratio * mass_flow,
        });
    };

    let outcome = solve_bracketed(
        |c_x| {
            let station = station_at(c_x)?;
            Ok(station.mass_flux() * area / mass_flow - 1.0)
        },
        lo,
        hi,
        root,
    )?;
    let station = station_at(outcome.x)?;
    Ok(if outcome.converged {
        Continuity::Solved {
            station,
            iterations: outcome.iterations,
        }
    } else {
        Continuity::NotConverged {
            station,
            iterations: outcome.iterations,
        }
    })
}

/// Continuity at fixed total conditions and swirl.
pub fn solve_axial_velocity(
    gas: &dyn GasModel,
    totals: TotalConditions,
    area: f64,
    mass_flow: f64,
    swirl: Swirl,
    blade_speed: f64,
    root: &RootConfig,
) -> MeanlineResult<Continuity> {
    let c_max = critical_speed(gas, totals.t0)?;
    solve_with(
        mass_flow,
        area,
        c_max,
        |c_x| {
            Ok(FlowStation::from_components(
                gas,
                totals,
                c_x,
                swirl.tangential(c_x, blade_speed),
                blade_speed,
            )?)
        },
        root,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axc_core::units::{k, pa};
    use axc_gas::PolynomialGas;

    fn setup() -> (PolynomialGas, TotalConditions) {
        (
            PolynomialGas::calorically_perfect(1.4, 287.0).unwrap(),
            TotalConditions::new(k(288.15), pa(101_325.0)).unwrap(),
        )
    }

    #[test]
    fn recovers_axial_velocity() {
        let (gas, totals) = setup();
        let st = FlowStation::from_components(&gas, totals, 150.0, 0.0, 400.0).unwrap();
        let area = 0.5;
        let mdot = st.mass_flux() * area;
        let out = solve_axial_velocity(&gas, totals, area, mdot, Swirl::Angle(0.0), 400.0, &RootConfig::default())
            .unwrap();
        match out {
            Continuity::Solved { station, .. } => {
                assert!((station.axial_velocity - 150.0).abs() < 0.01);
            }
            other => panic!("expected solved, got {other:?}"),
        }
    }

    #[test]
    fn swirl_angle_is_held() {
        let (gas, totals) = setup();
        let alpha = 20f64.to_radians();
        let out = solve_axial_velocity(&gas, totals, 0.5, 80.0, Swirl::Angle(alpha), 400.0, &RootConfig::default())
            .unwrap();
        let st = out.station().unwrap();
        assert!((st.flow_angle - alpha).abs() < 1e-12);
        assert!((st.mass_flux() * 0.5 - 80.0).abs() / 80.0 < 1e-5);
    }

    #[test]
    fn too_small_annulus_chokes() {
        let (gas, totals) = setup();
        // Choked mass flux at these totals is about 241 kg/(m²·s)
        let out = solve_axial_velocity(&gas, totals, 0.1, 100.0, Swirl::Angle(0.0), 400.0, &RootConfig::default())
            .unwrap();
        match out {
            Continuity::Choked { max_mass_flow } => {
                assert!(max_mass_flow > 20.0 && max_mass_flow < 24.5);
            }
            other => panic!("expected choke, got {other:?}"),
        }
    }

    #[test]
    fn fixed_tangential_velocity() {
        let (gas, totals) = setup();
        let out = solve_axial_velocity(
            &gas,
            totals,
            0.5,
            90.0,
            Swirl::Tangential(120.0),
            400.0,
            &RootConfig::default(),
        )
        .unwrap();
        let st = out.station().unwrap();
        assert_eq!(st.tangential_velocity, 120.0);
    }

    #[test]
    fn relative_angle_swirl() {
        let s = Swirl::RelativeAngle(45f64.to_radians());
        assert!((s.tangential(100.0, 400.0) - 300.0).abs() < 1e-9);
    }
}
