//! Operating points.

use axc_config::CompressorConfig;
use axc_core::units::{Angle, AngularVelocity, MassRate, Pressure, Temperature, to_rpm};

/// Inlet state and shaft speed of one solve. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingPoint {
    pub speed: AngularVelocity,
    pub mass_flow: MassRate,
    pub total_pressure: Pressure,
    pub total_temperature: Temperature,
    pub swirl_angle: Angle,
}

impl OperatingPoint {
    /// The design point of a configuration.
    pub fn design(config: &CompressorConfig) -> Self {
        Self {
            speed: config.rotation.speed,
            mass_flow: config.inlet.mass_flow,
            total_pressure: config.inlet.total_pressure,
            total_temperature: config.inlet.total_temperature,
            swirl_angle: config.inlet.swirl_angle,
        }
    }

    /// Same inlet state at `speed_fraction` of the speed and `flow_fraction` of the flow.
    pub fn scaled(&self, speed_fraction: f64, flow_fraction: f64) -> Self {
        Self {
            speed: self.speed * speed_fraction,
            mass_flow: self.mass_flow * flow_fraction,
            ..*self
        }
    }

    pub fn rpm(&self) -> f64 {
        to_rpm(self.speed)
    }
}

/// Speed lines × flow fractions around a design point, speed-major.
pub fn map_grid(design: &OperatingPoint, speed_fractions: &[f64], flow_fractions: &[f64]) -> Vec<OperatingPoint> {
    speed_fractions
        .iter()
        .flat_map(|&n| flow_fractions.iter().map(move |&f| design.scaled(n, f)))
        .collect()
}
