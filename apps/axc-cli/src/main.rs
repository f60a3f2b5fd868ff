use axc_config::{CompressorConfig, OutputFormat, load, load_raw};
use axc_core::AxcResult;
use axc_report::build::point_input;
use axc_report::{ReportError, build_report, compute_run_id, render};
use axc_solver::{CompressorModel, MapOptions, MapProgress, map_grid, solve_map};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "axc-cli")]
#[command(about = "AXC1D - multistage axial compressor meanline analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty input deck
    Template {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a deck and solve its design point
    Validate {
        /// Path to the deck (section format or .yaml)
        deck: PathBuf,
    },
    /// Solve a speed/flow map
    Run {
        /// Path to the deck (section format or .yaml)
        deck: PathBuf,
        /// Shaft speeds in percent of design
        #[arg(long, value_delimiter = ',', default_value = "100")]
        speeds: Vec<f64>,
        /// Mass flows as fractions of design
        #[arg(long, value_delimiter = ',', default_value = "1.0")]
        flows: Vec<f64>,
        /// Write JSON regardless of the deck's output format
        #[arg(long)]
        json: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Solve points one after another
        #[arg(long)]
        sequential: bool,
    },
}

fn main() -> AxcResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Template { output } => {
            init_tracing(0);
            write_output(&axc_config::template(), output.as_deref())
        }
        Commands::Validate { deck } => cmd_validate(&deck),
        Commands::Run {
            deck,
            speeds,
            flows,
            json,
            output,
            sequential,
        } => cmd_run(&deck, &speeds, &flows, json, output.as_deref(), sequential),
    }
}

/// Log level from `RUST_LOG` when it names a level, else from the deck verbosity.
fn init_tracing(verbosity: u8) {
    let from_env = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<Level>().ok());
    let level = from_env.unwrap_or(match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    });
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config(deck: &Path) -> AxcResult<CompressorConfig> {
    let config = load(deck)?;
    init_tracing(config.verbosity);
    Ok(config)
}

fn write_output(text: &str, output: Option<&Path>) -> AxcResult<()> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(ReportError::from)?,
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(ReportError::from)?;
        }
    }
    Ok(())
}

fn cmd_validate(deck: &Path) -> AxcResult<()> {
    println!("Validating deck: {}", deck.display());
    let config = load_config(deck)?;
    let model = CompressorModel::build(&config)?;
    println!(
        "✓ Deck is valid: {} stage(s), {:?} mode",
        config.n_stages(),
        config.mode
    );
    println!("Stg    phi_d   psi_d      PR     eta      k1      k2       D");
    for s in model.stages() {
        let d = &s.design;
        println!(
            "{:>3} {:>8.4} {:>7.4} {:>7.4} {:>7.4} {:>7.2} {:>7.2} {:>7.3}",
            s.index,
            d.flow_coefficient,
            d.pressure_coefficient,
            d.pressure_ratio,
            d.efficiency,
            s.blades.kappa1.to_degrees(),
            s.blades.kappa2.to_degrees(),
            d.diffusion_factor,
        );
    }
    Ok(())
}

fn cmd_run(
    deck: &Path,
    speeds: &[f64],
    flows: &[f64],
    json: bool,
    output: Option<&Path>,
    sequential: bool,
) -> AxcResult<()> {
    let raw = load_raw(deck)?;
    let config = load_config(deck)?;
    let started = Instant::now();
    let model = CompressorModel::build(&config)?;

    let speed_fractions: Vec<f64> = speeds.iter().map(|s| s / 100.0).collect();
    let points = map_grid(&model.design_point(), &speed_fractions, flows);

    let mut options = if sequential {
        MapOptions::sequential()
    } else {
        MapOptions::default()
    };
    options = options.with_progress(render_progress);
    let results = solve_map(&model, &points, &options);
    clear_progress_line();

    let inputs: Vec<_> = points.iter().map(|p| point_input(config.units, p)).collect();
    let run_id = compute_run_id(&raw, &inputs, env!("CARGO_PKG_VERSION"));
    let report = build_report(&config, run_id, &points, &results);
    let format = if json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    write_output(&render(&report, format)?, output)?;

    eprintln!(
        "✓ {} point(s) solved in {:.2}s",
        points.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(60));
    let _ = io::stderr().flush();
}

fn render_progress(p: MapProgress) {
    let width = 28usize;
    let fraction = p.completed as f64 / p.total.max(1) as f64;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    eprint!(
        "\r[{}{}] {}/{} points",
        "#".repeat(filled),
        "-".repeat(width - filled),
        p.completed,
        p.total
    );
    let _ = io::stderr().flush();
}
