use axc_core::units::{k, pa};
use axc_gas::PolynomialGas;
use axc_stage::{
    Annulus, DeviationModel, FlowStation, ParabolicEfficiency, StageGeometry, TotalConditions,
    diffusion_factor, zero_incidence_flow_coefficient,
};

#[test]
fn rotor_turning_diffuses_relative_flow() {
    let gas = PolynomialGas::air();
    let ring = Annulus::from_area_and_hub_tip_ratio(0.5, 0.6).unwrap();
    let geom = StageGeometry::new(ring, ring, 1.2).unwrap();
    let (u1, u2) = geom.blade_speeds(1047.2);

    let inlet_totals = TotalConditions::new(k(288.15), pa(101_325.0)).unwrap();
    let inlet = FlowStation::from_flow_angle(&gas, inlet_totals, 160.0, 0.0, u1).unwrap();

    // swirl added at constant axial velocity
    let outlet_totals = TotalConditions::new(k(300.0), pa(115_000.0)).unwrap();
    let outlet = FlowStation::from_components(&gas, outlet_totals, 160.0, 120.0, u2).unwrap();

    assert!(outlet.relative_velocity < inlet.relative_velocity);
    assert!(outlet.relative_flow_angle < inlet.relative_flow_angle);

    let d = diffusion_factor(
        inlet.relative_velocity,
        outlet.relative_velocity,
        inlet.relative_tangential_velocity,
        outlet.relative_tangential_velocity,
        geom.solidity,
    );
    assert!(d > 0.0 && d < 0.6, "diffusion factor {d}");
}

#[test]
fn zero_incidence_at_design_flow_coefficient() {
    let gas = PolynomialGas::air();
    let totals = TotalConditions::new(k(288.15), pa(101_325.0)).unwrap();
    let alpha = 5.0_f64.to_radians();
    let u = 400.0;
    let st = FlowStation::from_flow_angle(&gas, totals, 150.0, alpha, u).unwrap();

    let kappa1 = st.relative_flow_angle;
    let phi = zero_incidence_flow_coefficient(kappa1, alpha).unwrap();
    assert!((phi - st.flow_coefficient()).abs() < 1e-12);
    assert!(DeviationModel::incidence(st.relative_flow_angle, kappa1).abs() < 1e-15);
}

#[test]
fn efficiency_curve_peaks_at_design() {
    let eff = ParabolicEfficiency::fit(0.292, 0.365, 0.438, 0.88, 0.9, 0.85).unwrap();
    let curve = eff.sample(41).unwrap();
    for &(phi, eta) in curve.points() {
        assert!(eta <= 0.88 + 1e-12, "η({phi}) = {eta}");
    }
    assert!((curve.value_at(0.365) - 0.88).abs() < 1e-9);
}
