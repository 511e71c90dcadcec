use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use kinema_core::config::validate_steps;
use kinema_core::*;
use kinema_physics::simulate;
use kinema_sim::{DatasetBuilder, ExecutionBackend};
use kinema_storage::{load_dataset, save_dataset};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kinema")]
#[command(about = "Synthetic 2D trajectory dataset generator")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Used when no subcommand is given
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a dataset and save it as a single artifact
    Generate(GenerateArgs),

    /// Print the config and label statistics of a saved dataset
    Inspect {
        path: PathBuf,
        /// Number of metadata rows to print
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Simulate one trajectory and print it as CSV
    Trace {
        #[arg(long)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_SEQ_LEN as i64, allow_negative_numbers = true)]
        seq_len: i64,
        #[arg(long, default_value_t = DEFAULT_DT, allow_negative_numbers = true)]
        dt: f64,
    },
}

#[derive(Args, Clone)]
struct GenerateArgs {
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_NUM_TRAJECTORIES as i64,
        allow_negative_numbers = true
    )]
    num_trajectories: i64,

    #[arg(long, default_value_t = DEFAULT_SEQ_LEN as i64, allow_negative_numbers = true)]
    seq_len: i64,

    /// Integration step in seconds
    #[arg(long, default_value_t = DEFAULT_DT, allow_negative_numbers = true)]
    dt: f64,

    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    description: String,

    #[arg(long, value_enum, default_value_t = Backend::Sequential)]
    backend: Backend,

    /// Worker threads for the parallel backend (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Sequential,
    Parallel,
}

impl GenerateArgs {
    fn execution_backend(&self) -> ExecutionBackend {
        match (self.backend, self.threads) {
            (Backend::Sequential, Some(_)) => {
                tracing::warn!("--threads is ignored by the sequential backend");
                ExecutionBackend::Sequential
            }
            (Backend::Sequential, None) => ExecutionBackend::Sequential,
            (Backend::Parallel, Some(n)) => ExecutionBackend::with_threads(n),
            (Backend::Parallel, None) => ExecutionBackend::parallel(),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = GenerationConfig::new(args.num_trajectories, args.seq_len, args.dt)?
        .with_description(args.description.clone());
    let builder = DatasetBuilder::new(config).with_backend(args.execution_backend());

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(builder.config().num_trajectories as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta})")
            .context("invalid progress template")?,
    );

    let dataset = builder.build_with_progress(|_| pb.inc(1))?;
    pb.finish_and_clear();

    println!("dataset shape: {:?}", dataset.data.shape());

    save_dataset(&dataset, &args.output)
        .with_context(|| format!("failed to save dataset to {}", args.output.display()))?;
    println!("Saved to {}", args.output.display());
    Ok(())
}

fn run_inspect(path: PathBuf, rows: usize) -> Result<()> {
    let dataset = load_dataset(&path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    let config = &dataset.config;

    println!("{}", path.display());
    println!("  description:      {}", config.description);
    println!("  num_trajectories: {}", config.num_trajectories);
    println!("  seq_len:          {}", config.seq_len);
    println!("  dt:               {}", config.dt);
    println!("  data shape:       {:?}", dataset.data.shape());

    let Some(summary) = dataset.summary() else {
        println!("  (empty dataset)");
        return Ok(());
    };
    println!("  mass range:       {:.3} .. {:.3}", summary.mass.0, summary.mass.1);
    println!(
        "  drag range:       {:.3} .. {:.3}",
        summary.drag_coeff.0, summary.drag_coeff.1
    );
    println!(
        "  final speed:      mean {:.3}, max {:.3}",
        summary.mean_final_speed, summary.max_final_speed
    );

    println!();
    println!(
        "{:>6} {:>8} {:>8} {:>20} {:>20}",
        "seed", "mass", "drag", "wind_force", "final_velocity"
    );
    for meta in dataset.metadata.iter().take(rows) {
        println!(
            "{:>6} {:>8.3} {:>8.3} {:>20} {:>20}",
            meta.seed,
            meta.mass,
            meta.drag_coeff,
            format!("[{:.2}, {:.2}]", meta.wind_force.x, meta.wind_force.y),
            format!("[{:.2}, {:.2}]", meta.final_velocity.x, meta.final_velocity.y),
        );
    }
    Ok(())
}

/// Signed step count from the command line, checked like a generation config
fn trace_steps(seq_len: i64, dt: f64) -> KinemaResult<usize> {
    let seq_len = usize::try_from(seq_len)
        .map_err(|_| KinemaError::config(format!("seq_len must be >= 1, got {seq_len}")))?;
    validate_steps(seq_len, dt)?;
    Ok(seq_len)
}

fn run_trace(seed: u64, seq_len: i64, dt: f64) -> Result<()> {
    let seq_len = trace_steps(seq_len, dt)?;
    let (trajectory, meta) = simulate(seed, seq_len, dt)?;

    println!(
        "# seed={} mass={} drag_coeff={} wind_force=[{}, {}] final_velocity=[{}, {}]",
        meta.seed,
        meta.mass,
        meta.drag_coeff,
        meta.wind_force.x,
        meta.wind_force.y,
        meta.final_velocity.x,
        meta.final_velocity.y
    );
    println!("step,t,x,y");
    for (step, p) in trajectory.points().iter().enumerate() {
        let t = (step + 1) as f64 * dt;
        println!("{},{},{},{}", step, t, p.x, p.y);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Inspect { path, rows }) => run_inspect(path, rows),
        Some(Commands::Trace { seed, seq_len, dt }) => run_trace(seed, seq_len, dt),
        None => run_generate(cli.generate),
    }
}
