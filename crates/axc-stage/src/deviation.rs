//! Off-design deviation: how the rotor exit relative angle follows inlet incidence.

/// Linear deviation correction β2 = κ2 + k_dev·i.
///
/// With `k_dev = 0` the flow leaves at the blade exit metal angle for every incidence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviationModel {
    pub k_dev: f64,
}

impl DeviationModel {
    pub fn new(k_dev: f64) -> Self {
        Self { k_dev }
    }

    /// Incidence i = β1 − κ1 [rad].
    pub fn incidence(beta1: f64, kappa1: f64) -> f64 {
        beta1 - kappa1
    }

    /// Exit relative flow angle [rad] for exit metal angle `kappa2` at `incidence`.
    pub fn exit_angle(&self, kappa2: f64, incidence: f64) -> f64 {
        kappa2 + self.k_dev * incidence
    }
}
