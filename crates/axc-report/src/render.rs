//! Text and JSON output.

use crate::ReportResult;
use crate::types::{PointReport, Report, StageReport};
use axc_config::OutputFormat;
use std::fmt::Write;

pub fn to_json(report: &Report) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn opt(v: Option<f64>, width: usize, precision: usize) -> String {
    match v {
        Some(v) => format!("{v:>width$.precision$}"),
        None => format!("{:>width$}", "-"),
    }
}

fn stage_row(out: &mut String, s: &StageReport) {
    let mark = if s.low_efficiency { "*" } else { " " };
    let _ = writeln!(
        out,
        "{:>3}  {:<14} {} {} {} {} {}{} {} {} {:>7.2} {:>7.2} {:>8.4} {}",
        s.index,
        s.status.label(),
        opt(s.flow_coefficient, 6, 4),
        opt(s.pressure_coefficient, 6, 4),
        opt(s.pressure_ratio, 7, 4),
        opt(s.temperature_ratio, 7, 4),
        opt(s.efficiency, 6, 4),
        mark,
        opt(s.incidence_deg, 7, 2),
        opt(s.diffusion_factor, 6, 3),
        s.kappa1_deg,
        s.kappa2_deg,
        s.cumulative_pressure_ratio,
        opt(s.cumulative_efficiency, 7, 4),
    );
}

fn point_block(out: &mut String, report: &Report, p: &PointReport) {
    let u = &report.units;
    let _ = writeln!(
        out,
        "Point: N = {:.1} rpm, mdot = {:.3} {}, Pt = {:.1} {}, Tt = {:.2} {}, swirl = {:.1} deg",
        p.input.rpm,
        p.input.mass_flow,
        u.mass_flow,
        p.input.total_pressure,
        u.pressure,
        p.input.total_temperature,
        u.temperature,
        p.input.swirl_deg,
    );
    if let Some(error) = &p.error {
        let _ = writeln!(out, "  status: {}  ({error})", p.status.label());
        return;
    }
    let _ = writeln!(
        out,
        "  status: {}  PR = {}  TR = {}  eta = {}  exit Pt = {} {}  exit Tt = {} {}",
        p.status.label(),
        opt(p.pressure_ratio, 0, 4),
        opt(p.temperature_ratio, 0, 4),
        opt(p.efficiency, 0, 4),
        opt(p.exit_total_pressure, 0, 1),
        u.pressure,
        opt(p.exit_total_temperature, 0, 2),
        u.temperature,
    );
    let _ = writeln!(
        out,
        "Stg  Status            phi    psi      PR      TR    eta     inc      D      k1      k2    cumPR  cumEta"
    );
    for s in &p.stages {
        stage_row(out, s);
    }
}

pub fn to_text(report: &Report) -> String {
    let mut out = String::new();
    let m = &report.manifest;
    let _ = writeln!(out, "AXC1D meanline results");
    let _ = writeln!(out, "run {}  ({})", m.run_id, m.timestamp);
    let _ = writeln!(
        out,
        "{} stage(s), units {}, solver {}",
        m.n_stages, m.unit_system, m.solver_version
    );
    if report.efficiency_threshold > 0.0 {
        let _ = writeln!(
            out,
            "* efficiency below {:.3}",
            report.efficiency_threshold
        );
    }
    for p in &report.points {
        out.push('\n');
        point_block(&mut out, report, p);
    }
    out
}

pub fn render(report: &Report, format: OutputFormat) -> ReportResult<String> {
    match format {
        OutputFormat::Text => Ok(to_text(report)),
        OutputFormat::Json => to_json(report),
    }
}
