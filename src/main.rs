//! Tandem queueing network simulator CLI.
//!
//! ```bash
//! # Run test 1 from config/ and write output/dep_1.txt, output/mrt_1.txt
//! tandem-sim run 1
//!
//! # Weighted response time against run length, 4 fast servers
//! tandem-sim sweep --n0 4 --seed 7 > n0_4.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::Rng;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tandem_sim::config::TestConfig;
use tandem_sim::report::{ReportWriter, Summary};
use tandem_sim::sweep::{length_series, SweepParameters};
use tandem_sim::{OverflowPolicy, Result, RunOutcome, SimError, SimulationConfig, TandemNetwork};

#[derive(Parser, Debug)]
#[command(name = "tandem-sim")]
#[command(version, about = "Simulate a capped server group backed by an overflow group", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one test described by the files in the config directory
    Run {
        /// Test number, as in mode_<test>.txt
        test: String,

        #[arg(long, default_value = "config")]
        config_dir: PathBuf,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Seed for random workloads. When omitted, a random seed is used.
        #[arg(long)]
        seed: Option<u64>,

        /// What to do with jobs evicted at the dwell-time cap (restart, resume, drop)
        #[arg(long, default_value_t = OverflowPolicy::Restart)]
        overflow: OverflowPolicy,

        /// Fail if any job is left without a completion time
        #[arg(long)]
        require_complete: bool,

        /// Also write a JSON summary of the run
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
    /// Weighted mean response time against run length, printed as CSV
    Sweep {
        /// Servers in the fast group (out of 10)
        #[arg(long)]
        n0: usize,

        #[arg(long, default_value = "0")]
        seed: u64,

        #[arg(long, default_value = "10000")]
        max_jobs: usize,

        #[arg(long, default_value = "100")]
        step: usize,

        #[arg(long, default_value_t = OverflowPolicy::Restart)]
        overflow: OverflowPolicy,
    },
}

#[derive(Serialize)]
struct RunSummary<'a> {
    test: &'a str,
    seed: u64,
    config: &'a SimulationConfig,
    outcome: &'a RunOutcome,
    summary: &'a Summary,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tandem_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Run { test, config_dir, output_dir, seed, overflow, require_complete, summary_json } => {
            run(&test, &config_dir, &output_dir, seed, overflow, require_complete, summary_json)
        }
        Command::Sweep { n0, seed, max_jobs, step, overflow } => sweep(n0, seed, max_jobs, step, overflow),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(
    test: &str,
    config_dir: &Path,
    output_dir: &Path,
    seed: Option<u64>,
    overflow: OverflowPolicy,
    require_complete: bool,
    summary_json: Option<PathBuf>,
) -> Result<()> {
    let cfg = TestConfig::load(config_dir, test)?;
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, %overflow, "starting run");

    let mut source = cfg.arrival_source(seed)?;
    let mut qn = TandemNetwork::new(cfg.simulation_config(overflow));
    qn.load(source.as_mut())?;
    let outcome = qn.run()?;
    if require_complete {
        outcome.ensure_complete()?;
    }

    let summary = ReportWriter::new(output_dir, test).write(qn.jobs())?;

    if let Some(path) = summary_json {
        let doc = RunSummary { test, seed, config: qn.config(), outcome: &outcome, summary: &summary };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| SimError::ReportIo { path: path.clone(), source: e.into() })?;
        fs::write(&path, json).map_err(|source| SimError::ReportIo { path: path.clone(), source })?;
    }
    Ok(())
}

fn sweep(n0: usize, seed: u64, max_jobs: usize, step: usize, overflow: OverflowPolicy) -> Result<()> {
    let params = SweepParameters { overflow, ..SweepParameters::default() };
    println!("jobs,weighted");
    for (jobs, weighted) in length_series(&params, n0, seed, max_jobs, step)? {
        println!("{},{:.6}", jobs, weighted);
    }
    Ok(())
}
