// axc-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, AngularVelocity as UomAngularVelocity, Area as UomArea,
    Length as UomLength, MassRate as UomMassRate, Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type Area = UomArea;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

/// Specific heat capacity / gas constant [J/(kg·K)].
pub type SpecHeatCapacity = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn to_rpm(w: AngularVelocity) -> f64 {
    use uom::si::angular_velocity::revolution_per_minute;
    w.get::<revolution_per_minute>()
}

#[inline]
pub fn to_rad_per_s(w: AngularVelocity) -> f64 {
    use uom::si::angular_velocity::radian_per_second;
    w.get::<radian_per_second>()
}

#[inline]
pub fn to_rad(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

#[inline]
pub fn to_deg(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

/// U.S. customary ↔ SI conversion factors used by the input normalizer and reporter.
pub mod customary {
    /// Pa per psi
    pub const PA_PER_PSI: f64 = 6_894.757_293_168;
    /// kg/s per lbm/s
    pub const KGPS_PER_LBMPS: f64 = 0.453_592_37;
    /// m per inch
    pub const M_PER_INCH: f64 = 0.0254;
    /// K per °R
    pub const K_PER_RANKINE: f64 = 5.0 / 9.0;
    /// J/(kg·K) per ft·lbf/(lbm·°R)
    pub const JPKGK_PER_FTLBF_LBM_R: f64 = 5.380_320_456;
    /// J/(kg·K) per Btu/(lbm·°R)
    pub const JPKGK_PER_BTU_LBM_R: f64 = 4_186.8;
    /// m/s per ft/s
    pub const MPS_PER_FPS: f64 = 0.3048;
}

pub mod constants {
    /// Gas constant of dry air [J/(kg·K)]
    pub const R_AIR: f64 = 287.05;
    /// Universal gas constant [J/(kmol·K)]
    pub const R_UNIVERSAL: f64 = 8_314.462_618;
    /// Standard sea-level pressure [Pa]
    pub const P_STD: f64 = 101_325.0;
    /// Standard sea-level temperature [K]
    pub const T_STD: f64 = 288.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _v = mps(150.0);
        let _r = unitless(0.5);
    }

    #[test]
    fn rotational_speed_round_trip() {
        let w = rpm(10_000.0);
        assert!((to_rad_per_s(w) - 10_000.0 * std::f64::consts::PI / 30.0).abs() < 1e-9);
        assert!((to_rpm(w) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn angle_round_trip() {
        let a = deg(30.0);
        assert!((to_rad(a) - std::f64::consts::PI / 6.0).abs() < 1e-12);
        assert!((to_deg(rad(std::f64::consts::FRAC_PI_2)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn customary_factors_are_consistent() {
        // 14.696 psia ≈ 1 atm
        assert!((14.696 * customary::PA_PER_PSI - constants::P_STD).abs() < 5.0);
        // 518.67 °R = 288.15 K
        assert!((518.67 * customary::K_PER_RANKINE - constants::T_STD).abs() < 1e-9);
        // R_air = 53.35 ft·lbf/(lbm·°R)
        assert!((53.35 * customary::JPKGK_PER_FTLBF_LBM_R - 287.04).abs() < 0.1);
    }
}
