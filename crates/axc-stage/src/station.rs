//! Velocity triangles and thermodynamic state at a rotor inlet or outlet.

use crate::common::{check_finite, check_positive};
use crate::error::StageResult;
use axc_core::units::{Pressure, Temperature};
use axc_gas::{GasModel, GasState, static_state};

/// Stagnation temperature and pressure of a stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TotalConditions {
    pub t0: Temperature,
    pub p0: Pressure,
}

impl TotalConditions {
    pub fn new(t0: Temperature, p0: Pressure) -> StageResult<Self> {
        check_positive(t0.value, "total temperature")?;
        check_positive(p0.value, "total pressure")?;
        Ok(Self { t0, p0 })
    }
}

/// Mean-line flow station.
///
/// Velocities are in m/s, angles in radians measured from the axial direction. Tangential
/// components are positive in the direction of rotation, so the relative tangential
/// velocity is w_θ = U − c_θ.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowStation {
    pub axial_velocity: f64,
    pub tangential_velocity: f64,
    pub absolute_velocity: f64,
    pub relative_velocity: f64,
    pub relative_tangential_velocity: f64,
    pub blade_speed: f64,
    /// Absolute flow angle α
    pub flow_angle: f64,
    /// Relative flow angle β
    pub relative_flow_angle: f64,
    pub mach_number: f64,
    pub relative_mach_number: f64,
    pub total_temperature: Temperature,
    pub total_pressure: Pressure,
    pub gas: GasState,
}

impl FlowStation {
    /// Build a station from its velocity components and total conditions.
    ///
    /// # Errors
    /// Fails when the absolute kinetic energy exceeds the total enthalpy or any input is
    /// non-finite.
    pub fn from_components(
        gas: &dyn GasModel,
        totals: TotalConditions,
        axial_velocity: f64,
        tangential_velocity: f64,
        blade_speed: f64,
    ) -> StageResult<Self> {
        check_finite(axial_velocity, "axial velocity")?;
        check_finite(tangential_velocity, "tangential velocity")?;
        check_finite(blade_speed, "blade speed")?;

        let absolute_velocity = axial_velocity.hypot(tangential_velocity);
        let relative_tangential_velocity = blade_speed - tangential_velocity;
        let relative_velocity = axial_velocity.hypot(relative_tangential_velocity);

        let state = static_state(gas, totals.t0, totals.p0, absolute_velocity)?;
        let a = state.speed_of_sound();

        Ok(Self {
            axial_velocity,
            tangential_velocity,
            absolute_velocity,
            relative_velocity,
            relative_tangential_velocity,
            blade_speed,
            flow_angle: tangential_velocity.atan2(axial_velocity),
            relative_flow_angle: relative_tangential_velocity.atan2(axial_velocity),
            mach_number: absolute_velocity / a,
            relative_mach_number: relative_velocity / a,
            total_temperature: totals.t0,
            total_pressure: totals.p0,
            gas: state,
        })
    }

    /// Build a station from the axial velocity and a fixed absolute flow angle [rad].
    pub fn from_flow_angle(
        gas: &dyn GasModel,
        totals: TotalConditions,
        axial_velocity: f64,
        flow_angle: f64,
        blade_speed: f64,
    ) -> StageResult<Self> {
        Self::from_components(
            gas,
            totals,
            axial_velocity,
            axial_velocity * flow_angle.tan(),
            blade_speed,
        )
    }

    pub fn totals(&self) -> TotalConditions {
        TotalConditions {
            t0: self.total_temperature,
            p0: self.total_pressure,
        }
    }

    /// Mass flux ρ c_x [kg/(m²·s)].
    pub fn mass_flux(&self) -> f64 {
        self.gas.density() * self.axial_velocity
    }

    /// Flow coefficient c_x/U.
    pub fn flow_coefficient(&self) -> f64 {
        self.axial_velocity / self.blade_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axc_core::units::{k, pa};
    use axc_gas::PolynomialGas;

    fn totals() -> TotalConditions {
        TotalConditions::new(k(288.15), pa(101_325.0)).unwrap()
    }

    #[test]
    fn triangle_components_are_consistent() {
        let gas = PolynomialGas::calorically_perfect(1.4, 287.0).unwrap();
        let st = FlowStation::from_components(&gas, totals(), 150.0, 50.0, 400.0).unwrap();
        assert!((st.relative_tangential_velocity - 350.0).abs() < 1e-12);
        assert!((st.absolute_velocity - 150.0_f64.hypot(50.0)).abs() < 1e-12);
        assert!((st.relative_velocity - 150.0_f64.hypot(350.0)).abs() < 1e-12);
        assert!((st.flow_angle - (50.0_f64 / 150.0).atan()).abs() < 1e-12);
        assert!(st.relative_flow_angle > st.flow_angle);
        assert!(st.relative_mach_number > st.mach_number);
        assert!((st.flow_coefficient() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn static_temperature_below_total() {
        let gas = PolynomialGas::air();
        let st = FlowStation::from_flow_angle(&gas, totals(), 170.0, 0.0, 450.0).unwrap();
        assert!(st.gas.static_temperature().value < 288.15);
        assert!(st.gas.static_pressure().value < 101_325.0);
        assert_eq!(st.tangential_velocity, 0.0);
        assert!(st.mass_flux() > 0.0);
    }

    #[test]
    fn hypersonic_speed_is_rejected() {
        let gas = PolynomialGas::air();
        assert!(FlowStation::from_components(&gas, totals(), 900.0, 0.0, 400.0).is_err());
    }

    #[test]
    fn totals_reject_non_positive() {
        assert!(TotalConditions::new(k(0.0), pa(1.0)).is_err());
        assert!(TotalConditions::new(k(300.0), pa(-1.0)).is_err());
    }
}
