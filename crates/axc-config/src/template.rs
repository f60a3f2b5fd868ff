//! Blank input deck.

/// Empty deck with every section header and key and no values.
pub fn template() -> String {
    String::from(
        "=============== AXC1D MULTISTAGE ANALYSIS TOOL ===============\n\
         [CONSTANT]\n\
         - analysis_type: \n\
         - n_stages: \n\
         - units: \n\
         - verbosity: \n\
         \n\
         [INLET]\n\
         - total_pressure: \n\
         - total_temperature: \n\
         - mass_flow: \n\
         - swirl_angle: \n\
         - mach_number: \n\
         \n\
         [GAS PROPERTIES]\n\
         - gamma: \n\
         - r: \n\
         \n\
         [ROTATION]\n\
         - rpm: \n\
         - direction: \n\
         \n\
         [STAGE CHARACTERISTICS]\n\
         - stage_pressure_coefficient_curve: \n\
         - stage_efficiency_curve: \n\
         - flow_coefficient_range: \n\
         - blade_deviation_adjustment: \n\
         - inlet_guide_vane_angle: \n\
         \n\
         [SOLVER]\n\
         - max_iters: \n\
         - convergence_tolerance: \n\
         - numerical_damping: \n\
         \n\
         [OUTPUT]\n\
         - efficiency: \n\
         - format: \n",
    )
}
