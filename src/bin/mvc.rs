//! Command-line driver for the vertex cover solvers.
//!
//! ```bash
//! # One run, writes karate_BnB_600.sol and karate_BnB_600.trace
//! mvc run --inst data/karate.graph --alg BnB --time 600
//!
//! # Randomized solvers take a seed, which becomes part of the file names
//! mvc run --inst data/karate.graph --alg LS1 --time 60 --seed 3 --output-dir output
//!
//! # Annealing temperature sweep, written as karate_LS1_60_3_T0P50.{sol,trace}
//! mvc run --inst data/karate.graph --alg LS1 --time 60 --seed 3 --temperature-per-edge 50
//!
//! # Several seeds at once, with a summary against a known optimum
//! mvc batch --inst data/karate.graph --alg LS2 --time 60 --seeds 1 2 3 4 --optimum 14
//! ```
//!
//! Set `RUST_LOG=info` (or `debug` for every improvement) to follow progress.

use clap::{Parser, Subcommand};
use covers::cs::experiment::{run_batch_with, Summary};
use covers::cs::graph::io::{output_stem, save_solution, temperature_stem};
use covers::cs::graph::{load_graph, CoverChecker};
use covers::cs::optimization::AnnealingConfig;
use covers::cs::solver::Algorithm;
use covers::Result;
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mvc")]
#[command(about = "Anytime minimum vertex cover solvers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance and write its .sol and .trace files.
    Run {
        /// Graph file in adjacency-list format.
        #[arg(long)]
        inst: PathBuf,

        /// Solver: Approx, BnB, LS1, LS2 or RW.
        #[arg(long)]
        alg: Algorithm,

        /// Cutoff in seconds.
        #[arg(long)]
        time: f64,

        /// Random seed (randomized solvers only).
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Directory for the output files.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// LS1 initial temperature per edge (default 200); tags the output names.
        #[arg(long)]
        temperature_per_edge: Option<f64>,
    },

    /// Solve one instance once per seed and print a summary.
    Batch {
        /// Graph file in adjacency-list format.
        #[arg(long)]
        inst: PathBuf,

        /// Solver: Approx, BnB, LS1, LS2 or RW.
        #[arg(long)]
        alg: Algorithm,

        /// Cutoff in seconds, per run.
        #[arg(long)]
        time: f64,

        /// Seeds, one run each.
        #[arg(long, num_args = 1.., default_values_t = [1u64, 2, 3, 4, 5, 6, 7, 8, 9, 10])]
        seeds: Vec<u64>,

        /// Known optimum, for relative error.
        #[arg(long)]
        optimum: Option<usize>,

        /// LS1 initial temperature per edge (default 200).
        #[arg(long)]
        temperature_per_edge: Option<f64>,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            inst,
            alg,
            time,
            seed,
            output_dir,
            temperature_per_edge,
        } => cmd_run(inst, alg, time, seed, output_dir, temperature_per_edge),
        Commands::Batch {
            inst,
            alg,
            time,
            seeds,
            optimum,
            temperature_per_edge,
        } => cmd_batch(inst, alg, time, seeds, optimum, temperature_per_edge),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("mvc: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cutoff(time: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(time)
        .map_err(|e| covers::Error::InvalidInput(format!("cutoff `{time}`: {e}")))
}

fn annealing_config(
    alg: Algorithm,
    temperature_per_edge: Option<f64>,
) -> Result<AnnealingConfig> {
    let mut config = AnnealingConfig::default();
    if let Some(t) = temperature_per_edge {
        if !t.is_finite() || t < 0.0 {
            return Err(covers::Error::InvalidInput(format!(
                "temperature per edge `{t}` must be a non-negative number"
            )));
        }
        if alg != Algorithm::SimulatedAnnealing {
            warn!("--temperature-per-edge only affects LS1, ignored for {alg}");
        }
        config.temperature_per_edge = t;
    }
    Ok(config)
}

fn cmd_run(
    inst: PathBuf,
    alg: Algorithm,
    time: f64,
    seed: u64,
    output_dir: PathBuf,
    temperature_per_edge: Option<f64>,
) -> Result<()> {
    let cutoff = cutoff(time)?;
    let annealing = annealing_config(alg, temperature_per_edge)?;
    let graph = load_graph(&inst)?;
    info!(
        "{}: {} nodes, {} edges; running {alg} for {time}s (seed {seed})",
        inst.display(),
        graph.node_count(),
        graph.edge_count()
    );

    let solution = alg.solver_with(seed, &annealing).solve(&graph, cutoff);
    if !CoverChecker::new(&graph).is_cover(&solution.cover) {
        return Err(covers::Error::InvalidInput(format!(
            "{alg} returned a set that does not cover {}",
            inst.display()
        )));
    }

    let mut stem = output_stem(&inst, alg, time, seed);
    if let (Algorithm::SimulatedAnnealing, Some(t)) = (alg, temperature_per_edge) {
        stem = temperature_stem(&stem, t);
    }
    let (sol_path, trace_path) = save_solution(&output_dir, &stem, &solution)?;
    println!(
        "{alg}: cover of {} ({:?}) -> {}, {}",
        solution.quality(),
        solution.status,
        sol_path.display(),
        trace_path.display()
    );
    Ok(())
}

fn cmd_batch(
    inst: PathBuf,
    alg: Algorithm,
    time: f64,
    seeds: Vec<u64>,
    optimum: Option<usize>,
    temperature_per_edge: Option<f64>,
) -> Result<()> {
    let cutoff = cutoff(time)?;
    let annealing = annealing_config(alg, temperature_per_edge)?;
    let graph = load_graph(&inst)?;
    let records = run_batch_with(&graph, alg, &seeds, cutoff, &annealing);
    for record in &records {
        println!(
            "seed {:>4}: quality {} after {:.3}s",
            record.seed,
            record.quality,
            record.time_to_best()
        );
    }
    if let Some(summary) = Summary::from_records(&records, optimum) {
        println!("{alg} on {}: {summary}", inst.display());
    }
    Ok(())
}
