//! lightpath CLI
//!
//! Physical-layer propagation and SNR analysis over optical topologies.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lightpath_core::PathRecord;
use lightpath_runtime::{
    export_records, export_to_path, render_topology, ExportFormat, Simulation, SimulationConfig,
};

#[derive(Parser)]
#[command(name = "lightpath")]
#[command(
    author,
    version,
    about = "lightpath: optical path latency, noise and SNR analysis",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every simple path between every pair of nodes
    Analyze {
        /// Topology description (JSON)
        #[arg(short, long, env = "LIGHTPATH_NODES")]
        nodes: PathBuf,

        /// Run configuration (TOML)
        #[arg(short, long, env = "LIGHTPATH_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (default: weighted_paths_<timestamp>.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write records to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Output format: csv or json
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Probe launch power in milliwatts
        #[arg(long)]
        power_mw: Option<f64>,

        /// Abort once this many paths have been produced (0 = no cap)
        #[arg(long)]
        max_paths: Option<usize>,
    },

    /// List the simple paths between two nodes
    Paths {
        /// Topology description (JSON)
        #[arg(short, long, env = "LIGHTPATH_NODES")]
        nodes: PathBuf,

        /// Start node
        start: String,

        /// End node
        end: String,
    },

    /// Propagate one probe signal along an explicit path
    Probe {
        /// Topology description (JSON)
        #[arg(short, long, env = "LIGHTPATH_NODES")]
        nodes: PathBuf,

        /// Probe launch power in milliwatts
        #[arg(long)]
        power_mw: Option<f64>,

        /// Node ids along the path
        #[arg(required = true, num_args = 2..)]
        path: Vec<String>,
    },

    /// Print the topology: nodes, positions and links
    Show {
        /// Topology description (JSON)
        #[arg(short, long, env = "LIGHTPATH_NODES")]
        nodes: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; RUST_LOG takes precedence over -v
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level.into()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Analyze {
            nodes,
            config,
            output,
            stdout,
            format,
            power_mw,
            max_paths,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(format) = format {
                config.export.format = format;
            }
            if let Some(power) = power_mw {
                config.analysis.reference_power_mw = power;
            }
            if let Some(max) = max_paths {
                config.analysis.max_paths = max;
            }
            run_analysis(&nodes, config, output, stdout)?;
        }
        Commands::Paths { nodes, start, end } => {
            let simulation = Simulation::from_path(&nodes, SimulationConfig::default())?;
            list_paths(&simulation, &start, &end);
        }
        Commands::Probe {
            nodes,
            power_mw,
            path,
        } => {
            let mut config = SimulationConfig::default();
            if let Some(power) = power_mw {
                config.analysis.reference_power_mw = power;
            }
            let simulation = Simulation::from_path(&nodes, config)?;
            print_record(&simulation.probe(&path));
        }
        Commands::Show { nodes } => {
            let simulation = Simulation::from_path(&nodes, SimulationConfig::default())?;
            print!("{}", render_topology(simulation.topology()));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => Ok(SimulationConfig::load_from_file(path)?),
        None => Ok(SimulationConfig::default()),
    }
}

fn run_analysis(
    nodes: &Path,
    config: SimulationConfig,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let simulation = Simulation::from_path(nodes, config)?;
    let report = simulation.run()?;
    let export = &simulation.config().export;

    if stdout {
        export_records(
            &report.records,
            export.format,
            &export.path_separator,
            std::io::stdout().lock(),
        )?;
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        PathBuf::from(format!(
            "weighted_paths_{}.{}",
            timestamp,
            export.format.extension()
        ))
    });
    export_to_path(
        &report.records,
        export.format,
        &export.path_separator,
        &output_path,
    )?;

    let stats = &report.stats;
    println!("Analyzed {} paths in {:.2?}", stats.total, report.elapsed);
    println!(
        "   ok: {} | degenerate: {} | failed: {}",
        stats.ok, stats.degenerate, stats.failed
    );
    if let (Some(min), Some(max)) = (stats.min_latency, stats.max_latency) {
        println!("   latency: {:.3e} s .. {:.3e} s", min, max);
    }
    if let (Some(worst), Some(best)) = (stats.worst_snr_db, stats.best_snr_db) {
        println!("   SNR: {:.2} dB .. {:.2} dB", worst, best);
    }
    println!("Results saved to: {}", output_path.display());

    Ok(())
}

fn list_paths(simulation: &Simulation, start: &str, end: &str) {
    let paths = simulation.paths(start, end);
    if paths.is_empty() {
        println!("No path from {} to {}", start, end);
        return;
    }

    println!("{} paths from {} to {}:", paths.len(), start, end);
    for path in &paths {
        println!("   {}", path.join("->"));
    }
}

fn print_record(record: &PathRecord) {
    println!("Path:    {}", record.path_label("->"));
    println!("Latency: {:.6e} s", record.latency);
    println!("Noise:   {:.6e} W", record.noise);
    match record.snr_db {
        Some(snr) => println!("SNR:     {:.2} dB", snr),
        None => println!("SNR:     n/a"),
    }
    println!("Status:  {}", record.status);
}
