//! Static thermodynamic state at a flow station.

use crate::error::{GasError, GasResult};
use crate::model::{GasModel, gamma_from_cp};
use axc_core::units::{Pressure, SpecHeatCapacity, Temperature};

/// Static gas state: temperature, pressure and the properties derived at that temperature.
///
/// gamma is never stored independently of cp and R; it is re-derived as cp/(cp − R) by
/// every constructor, so a state can not carry an inconsistent or non-physical gamma.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    t: Temperature,
    p: Pressure,
    cp: SpecHeatCapacity,
    gamma: f64,
    r: SpecHeatCapacity,
}

impl GasState {
    /// Create a state from static temperature, static pressure, cp and R.
    ///
    /// Validates that temperature and pressure are positive and finite and that the
    /// derived gamma lies in (1.0, 1.7].
    pub fn new(
        t: Temperature,
        p: Pressure,
        cp: SpecHeatCapacity,
        r: SpecHeatCapacity,
    ) -> GasResult<Self> {
        let t_val = t.value;
        if !t_val.is_finite() || t_val <= 0.0 {
            return Err(GasError::InvalidPhysicalState {
                what: "static temperature",
                value: t_val,
            });
        }
        let p_val = p.value;
        if !p_val.is_finite() || p_val <= 0.0 {
            return Err(GasError::InvalidPhysicalState {
                what: "static pressure",
                value: p_val,
            });
        }
        let gamma = gamma_from_cp(cp, r)?;
        Ok(Self { t, p, cp, gamma, r })
    }

    /// Create a state with cp evaluated by `gas` at the static temperature.
    pub fn from_model(gas: &dyn GasModel, t: Temperature, p: Pressure) -> GasResult<Self> {
        let cp = gas.cp(t)?;
        Self::new(t, p, cp, gas.gas_constant())
    }

    pub fn static_temperature(&self) -> Temperature {
        self.t
    }

    pub fn static_pressure(&self) -> Pressure {
        self.p
    }

    pub fn cp(&self) -> SpecHeatCapacity {
        self.cp
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn gas_constant(&self) -> SpecHeatCapacity {
        self.r
    }

    /// Density from the ideal gas law [kg/m³].
    pub fn density(&self) -> f64 {
        self.p.value / (self.r * self.t.value)
    }

    /// Speed of sound [m/s].
    pub fn speed_of_sound(&self) -> f64 {
        (self.gamma * self.r * self.t.value).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PolynomialGas;
    use axc_core::units::{k, pa};

    #[test]
    fn create_valid_state() {
        let state = GasState::new(k(288.15), pa(101_325.0), 1004.5, 287.0).unwrap();
        assert!((state.gamma() - 1.4).abs() < 1e-12);
        assert!((state.density() - 1.2252).abs() < 1e-3);
        assert!((state.speed_of_sound() - 340.26).abs() < 0.05);
    }

    #[test]
    fn reject_negative_pressure() {
        assert!(GasState::new(k(300.0), pa(-100.0), 1004.5, 287.0).is_err());
    }

    #[test]
    fn reject_zero_temperature() {
        let result = GasState::new(k(0.0), pa(101_325.0), 1004.5, 287.0);
        assert!(matches!(
            result,
            Err(GasError::InvalidPhysicalState {
                what: "static temperature",
                ..
            })
        ));
    }

    #[test]
    fn reject_non_physical_gamma() {
        // cp below R would give gamma < 0
        assert!(GasState::new(k(300.0), pa(101_325.0), 250.0, 287.0).is_err());
    }

    #[test]
    fn from_model_uses_local_cp() {
        let air = PolynomialGas::air();
        let cold = GasState::from_model(&air, k(250.0), pa(50_000.0)).unwrap();
        let hot = GasState::from_model(&air, k(900.0), pa(50_000.0)).unwrap();
        assert!(hot.cp() > cold.cp());
        assert!(hot.gamma() < cold.gamma());
    }
}
