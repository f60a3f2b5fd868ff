//! Gas property model trait and the polynomial cp(T) implementation.

use crate::error::{GasError, GasResult};
use axc_core::constants::R_AIR;
use axc_core::units::{SpecHeatCapacity, Temperature};

/// Lower bound (exclusive) for gamma of any physical gas.
pub const GAMMA_MIN: f64 = 1.0;
/// Upper bound (inclusive) for gamma of air-like gases.
pub const GAMMA_MAX: f64 = 1.7;

/// cp and gamma evaluated at one temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Temperature the properties were evaluated at [K]
    pub t: f64,
    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp: SpecHeatCapacity,
    /// Heat capacity ratio γ = cp/(cp − R)
    pub gamma: f64,
    /// Specific gas constant [J/(kg·K)]
    pub r: SpecHeatCapacity,
}

impl GasProperties {
    /// Speed of sound at the evaluation temperature [m/s].
    pub fn speed_of_sound(&self) -> f64 {
        (self.gamma * self.r * self.t).sqrt()
    }

    /// Isentropic exponent (γ − 1)/γ.
    pub fn exponent(&self) -> f64 {
        (self.gamma - 1.0) / self.gamma
    }
}

/// Derive gamma from cp and R, rejecting anything outside (1.0, 1.7].
pub fn gamma_from_cp(cp: SpecHeatCapacity, r: SpecHeatCapacity) -> GasResult<f64> {
    if !cp.is_finite() || cp <= r {
        return Err(GasError::InvalidPhysicalState {
            what: "specific heat cp (must exceed R)",
            value: cp,
        });
    }
    let gamma = cp / (cp - r);
    if !gamma.is_finite() || gamma <= GAMMA_MIN || gamma > GAMMA_MAX {
        return Err(GasError::InvalidPhysicalState {
            what: "gamma",
            value: gamma,
        });
    }
    Ok(gamma)
}

/// Trait for gas property models.
///
/// Implementations must be thread-safe (Send + Sync): one model is shared by every
/// operating point of a performance map.
pub trait GasModel: Send + Sync {
    /// Model name (for logging).
    fn name(&self) -> &str;

    /// Specific gas constant R [J/(kg·K)].
    fn gas_constant(&self) -> SpecHeatCapacity;

    /// Specific heat at constant pressure [J/(kg·K)] at static temperature `t`.
    fn cp(&self, t: Temperature) -> GasResult<SpecHeatCapacity>;

    /// cp and gamma at `t`, validated.
    fn properties(&self, t: Temperature) -> GasResult<GasProperties> {
        let cp = self.cp(t)?;
        let r = self.gas_constant();
        let gamma = gamma_from_cp(cp, r)?;
        Ok(GasProperties {
            t: t.value,
            cp,
            gamma,
            r,
        })
    }

    /// Heat capacity ratio at `t`.
    fn gamma(&self, t: Temperature) -> GasResult<f64> {
        Ok(self.properties(t)?.gamma)
    }
}

/// cp(T) = a0 + a1·T + … + a5·T⁵ with T in kelvin, cp in J/(kg·K).
#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialGas {
    name: String,
    coefficients: [f64; 6],
    r: SpecHeatCapacity,
}

impl PolynomialGas {
    /// Dry-air fit, valid roughly 150–1100 K.
    pub const AIR_COEFFICIENTS: [f64; 6] =
        [1018.9, -0.137_84, 1.9843e-4, 4.2399e-7, -3.7632e-10, 0.0];

    /// Create a polynomial gas from explicit coefficients.
    ///
    /// # Errors
    /// Returns error if R is not positive or any coefficient is non-finite.
    pub fn new(coefficients: [f64; 6], r: SpecHeatCapacity) -> GasResult<Self> {
        if !r.is_finite() || r <= 0.0 {
            return Err(GasError::InvalidArg {
                what: "gas constant must be positive",
            });
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(GasError::InvalidArg {
                what: "cp coefficients must be finite",
            });
        }
        Ok(Self {
            name: "polynomial".to_string(),
            coefficients,
            r,
        })
    }

    /// Calorically perfect gas: constant cp = γR/(γ − 1).
    pub fn calorically_perfect(gamma: f64, r: SpecHeatCapacity) -> GasResult<Self> {
        if !gamma.is_finite() || gamma <= GAMMA_MIN || gamma > GAMMA_MAX {
            return Err(GasError::InvalidPhysicalState {
                what: "gamma",
                value: gamma,
            });
        }
        let cp = gamma * r / (gamma - 1.0);
        let mut gas = Self::new([cp, 0.0, 0.0, 0.0, 0.0, 0.0], r)?;
        gas.name = "calorically perfect".to_string();
        Ok(gas)
    }

    /// Dry air with the default fifth-degree fit.
    pub fn air() -> Self {
        Self {
            name: "air".to_string(),
            coefficients: Self::AIR_COEFFICIENTS,
            r: R_AIR,
        }
    }

    pub fn coefficients(&self) -> &[f64; 6] {
        &self.coefficients
    }
}

impl GasModel for PolynomialGas {
    fn name(&self) -> &str {
        &self.name
    }

    fn gas_constant(&self) -> SpecHeatCapacity {
        self.r
    }

    fn cp(&self, t: Temperature) -> GasResult<SpecHeatCapacity> {
        let t = t.value;
        if !t.is_finite() || t <= 0.0 {
            return Err(GasError::InvalidPhysicalState {
                what: "absolute temperature",
                value: t,
            });
        }
        // Horner
        let cp = self
            .coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, a| acc * t + a);
        if !cp.is_finite() || cp <= 0.0 {
            return Err(GasError::InvalidPhysicalState {
                what: "specific heat cp",
                value: cp,
            });
        }
        Ok(cp)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use axc_core::units::k;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn air_gamma_stays_physical(t in 150.0_f64..1100.0) {
            let air = PolynomialGas::air();
            let props = air.properties(k(t)).unwrap();
            prop_assert!(props.gamma > 1.0 && props.gamma < 1.7);
            prop_assert!((props.gamma - props.cp / (props.cp - props.r)).abs() < 1e-12);
        }

        #[test]
        fn perfect_gas_gamma_is_constant(gamma in 1.05_f64..1.67, t in 100.0_f64..2000.0) {
            let gas = PolynomialGas::calorically_perfect(gamma, 287.0).unwrap();
            let g = gas.gamma(k(t)).unwrap();
            prop_assert!((g - gamma).abs() < 1e-9);
        }
    }
}
