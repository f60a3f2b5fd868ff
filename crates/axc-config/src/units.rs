//! Deck unit systems and conversion to and from the canonical SI set.
//!
//! Angles are degrees and shaft speeds rpm in every system; only the dimensional
//! quantities below change.

use crate::error::{ConfigError, ConfigResult};
use axc_core::units::customary::{
    JPKGK_PER_BTU_LBM_R, JPKGK_PER_FTLBF_LBM_R, K_PER_RANKINE, KGPS_PER_LBMPS, M_PER_INCH,
    PA_PER_PSI,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Pa, K, kg/s, m, J/(kg·K)
    #[default]
    Si,
    /// psia, °R, lbm/s, in, ft·lbf/(lbm·°R), Btu/(lbm·°R)
    Customary,
}

impl FromStr for UnitSystem {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" | "metric" => Ok(UnitSystem::Si),
            "customary" | "us" | "english" | "imperial" => Ok(UnitSystem::Customary),
            other => Err(ConfigError::invalid(
                "constant.units",
                other,
                "expected SI or customary",
            )),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Si => write!(f, "SI"),
            UnitSystem::Customary => write!(f, "customary"),
        }
    }
}

/// Kind of dimensional quantity read from or written to a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Pressure,
    Temperature,
    MassFlow,
    Length,
    GasConstant,
}

impl UnitSystem {
    fn factor(&self, q: Quantity) -> f64 {
        match self {
            UnitSystem::Si => 1.0,
            UnitSystem::Customary => match q {
                Quantity::Pressure => PA_PER_PSI,
                Quantity::Temperature => K_PER_RANKINE,
                Quantity::MassFlow => KGPS_PER_LBMPS,
                Quantity::Length => M_PER_INCH,
                Quantity::GasConstant => JPKGK_PER_FTLBF_LBM_R,
            },
        }
    }

    /// Deck value → SI.
    pub fn to_si(&self, q: Quantity, value: f64) -> f64 {
        value * self.factor(q)
    }

    /// SI → deck value.
    pub fn from_si(&self, q: Quantity, value: f64) -> f64 {
        value / self.factor(q)
    }

    /// Unit label for reports.
    pub fn label(&self, q: Quantity) -> &'static str {
        match (self, q) {
            (UnitSystem::Si, Quantity::Pressure) => "Pa",
            (UnitSystem::Si, Quantity::Temperature) => "K",
            (UnitSystem::Si, Quantity::MassFlow) => "kg/s",
            (UnitSystem::Si, Quantity::Length) => "m",
            (UnitSystem::Si, Quantity::GasConstant) => "J/(kg·K)",
            (UnitSystem::Customary, Quantity::Pressure) => "psia",
            (UnitSystem::Customary, Quantity::Temperature) => "°R",
            (UnitSystem::Customary, Quantity::MassFlow) => "lbm/s",
            (UnitSystem::Customary, Quantity::Length) => "in",
            (UnitSystem::Customary, Quantity::GasConstant) => "ft·lbf/(lbm·°R)",
        }
    }

    /// Speed label for velocity columns.
    pub fn speed_label(&self) -> &'static str {
        match self {
            UnitSystem::Si => "m/s",
            UnitSystem::Customary => "ft/s",
        }
    }

    /// Velocity in m/s → deck velocity.
    pub fn speed_from_si(&self, v: f64) -> f64 {
        match self {
            UnitSystem::Si => v,
            UnitSystem::Customary => v / axc_core::units::customary::MPS_PER_FPS,
        }
    }

    /// cp polynomial coefficients → SI coefficients in J/(kg·K) with T in K.
    ///
    /// Customary coefficients give Btu/(lbm·°R) with T in °R, so
    /// a_k = 4186.8 · b_k · (9/5)^k.
    pub fn cp_coefficients_to_si(&self, coefficients: [f64; 6]) -> [f64; 6] {
        match self {
            UnitSystem::Si => coefficients,
            UnitSystem::Customary => {
                let rankine_per_k = 1.0 / K_PER_RANKINE;
                let mut out = [0.0; 6];
                for (k, (o, b)) in out.iter_mut().zip(coefficients).enumerate() {
                    *o = JPKGK_PER_BTU_LBM_R * b * rankine_per_k.powi(k as i32);
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("SI".parse::<UnitSystem>().unwrap(), UnitSystem::Si);
        assert_eq!("US".parse::<UnitSystem>().unwrap(), UnitSystem::Customary);
        assert_eq!("English".parse::<UnitSystem>().unwrap(), UnitSystem::Customary);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn customary_conversions() {
        let u = UnitSystem::Customary;
        assert!((u.to_si(Quantity::Pressure, 14.696) - 101_325.0).abs() < 5.0);
        assert!((u.to_si(Quantity::Temperature, 518.67) - 288.15).abs() < 1e-9);
        assert!((u.to_si(Quantity::GasConstant, 53.35) - 287.04).abs() < 0.05);
        let back = u.from_si(Quantity::MassFlow, u.to_si(Quantity::MassFlow, 220.0));
        assert!((back - 220.0).abs() < 1e-12);
        assert_eq!(UnitSystem::Si.to_si(Quantity::Length, 0.3), 0.3);
    }

    #[test]
    fn customary_cp_coefficients_evaluate_consistently() {
        // cp = 0.24 + 1e-5·T[°R] Btu/(lbm·°R)
        let si = UnitSystem::Customary.cp_coefficients_to_si([0.24, 1e-5, 0.0, 0.0, 0.0, 0.0]);
        let t_k = 300.0;
        let t_r = t_k * 1.8;
        let expected = (0.24 + 1e-5 * t_r) * 4186.8;
        let got = si[0] + si[1] * t_k;
        assert!((got - expected).abs() < 1e-9);
    }
}
