//! CLI entry point for the Hanoi solver.
//!
//! Usage:
//!   hanoi-solver solve [options]
//!
//! Options:
//!   --disks <n>             Number of disks, 1 to 9 (default: 4)
//!   --branch-mode <mode>    standard | reverse (default: standard)
//!   --seek-mode <mode>      lazy | exhaustive (default: lazy)
//!   --output <mode>         human | json (default: human)
//!   --verbosity <level>     silent | verbose (default: silent)
//!   --warn-after <n>        Warn after n nodes without a solution (default: 1000)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hanoi_solver::logging::{self, Verbosity};
use hanoi_solver::report::{self, OutputMode};
use hanoi_solver::{BranchMode, SearchOutcome, SearchReport, SeekMode, Solver, SolverConfig};

/// Exit status when the search was stopped by Ctrl+C
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(name = "hanoi-solver")]
#[command(about = "Brute-force depth-first solver for the Towers of Hanoi")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for solutions from all disks on tower one to all disks on tower three
    Solve {
        /// Number of disks
        #[arg(long, default_value = "4")]
        disks: usize,

        /// Branch selection [possible values: standard, reverse]; unknown names fall back to standard
        #[arg(long, default_value = "standard")]
        branch_mode: String,

        /// Stop at the first solution or explore the whole tree
        #[arg(long, value_enum, default_value = "lazy")]
        seek_mode: SeekMode,

        /// Report format
        #[arg(long, value_enum, default_value = "human")]
        output: OutputMode,

        /// Log every node created
        #[arg(long, value_enum, default_value = "silent")]
        verbosity: Verbosity,

        /// Warn after this many nodes without a solution (0 disables)
        #[arg(long, default_value = "1000")]
        warn_after: usize,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            disks,
            branch_mode,
            seek_mode,
            output,
            verbosity,
            warn_after,
        } => {
            logging::init(verbosity);

            let config = SolverConfig {
                disks,
                branch_mode: BranchMode::from_name(&branch_mode),
                seek_mode,
                warn_after_nodes: warn_after,
            };

            let interrupted = Arc::new(AtomicBool::new(false));
            let handler_flag = interrupted.clone();
            ctrlc::set_handler(move || {
                eprintln!("\nCtrl+C received, stopping...");
                handler_flag.store(true, Ordering::Relaxed);
            })
            .context("install Ctrl+C handler")?;

            let mut solver = Solver::new(config.clone())
                .context("invalid configuration")?
                .with_interrupt(interrupted);

            let outcome = match output {
                OutputMode::Human => {
                    print!("{}", report::banner(&config));
                    let summary = solver.run(|solution| print!("{}", report::format_solution(solution)));
                    print!("{}", report::format_summary(&summary));
                    summary.outcome
                }
                OutputMode::Json => {
                    let mut solutions = Vec::new();
                    let summary = solver.run(|solution| solutions.push(solution.clone()));
                    let outcome = summary.outcome;
                    let search = SearchReport { summary, solutions };
                    println!("{}", report::to_json(&config, &search)?);
                    outcome
                }
            };

            Ok(if outcome == SearchOutcome::Interrupted {
                EXIT_INTERRUPTED
            } else {
                0
            })
        }
    }
}
