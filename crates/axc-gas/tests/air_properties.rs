//! Integration checks of the gas model against handbook air data.

use axc_core::units::{k, pa};
use axc_gas::{GasModel, PolynomialGas, static_state, total_temperature_rise};

#[test]
fn air_cp_tracks_handbook_values() {
    let air = PolynomialGas::air();
    // (T [K], cp [J/(kg·K)])
    let table = [(250.0, 1003.0), (300.0, 1005.0), (400.0, 1013.0), (600.0, 1051.0)];
    for (t, cp_ref) in table {
        let cp = air.cp(k(t)).unwrap();
        assert!(
            (cp - cp_ref).abs() / cp_ref < 0.01,
            "cp({t}) = {cp}, expected about {cp_ref}"
        );
    }
}

#[test]
fn compression_heats_air_less_than_perfect_gas_estimate() {
    // cp rises with temperature, so the same work gives a smaller rise than cp(T01) predicts
    let air = PolynomialGas::air();
    let work = 150_000.0;
    let rise = total_temperature_rise(&air, k(400.0), work).unwrap();
    let naive = work / air.cp(k(400.0)).unwrap();
    assert!(rise < naive);
}

#[test]
fn static_state_density_drops_with_speed() {
    let air = PolynomialGas::air();
    let slow = static_state(&air, k(288.15), pa(101_325.0), 50.0).unwrap();
    let fast = static_state(&air, k(288.15), pa(101_325.0), 200.0).unwrap();
    assert!(fast.density() < slow.density());
    assert!(fast.static_temperature().value < slow.static_temperature().value);
}
