//! Liquidity Sim - command-line driver for the liquidity engine
//!
//! Runs one funding scenario or compares all three against a shared event
//! sequence, printing a plain-text or JSON report.

use clap::{Parser, Subcommand, ValueEnum};
use liquidity_simulator_core_rs::orchestrator::ScenarioHeadline;
use liquidity_simulator_core_rs::{
    compare_presets, run, CashFlowConfig, CashFlowSource, DayEvents, PoolId, RandomCashFlowGenerator,
    ScenarioKind, ScenarioParameters, SimulationError, SimulationOutput,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "liquidity-sim")]
#[command(about = "Simulate daily cash liquidity for investment pools sharing a cash pool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single scenario
    Run {
        /// pre-funded, internal-pool or external-line-of-credit
        #[arg(long, default_value = "pre-funded")]
        scenario: ScenarioKind,

        /// Days to simulate (overrides the config file)
        #[arg(long)]
        days: Option<usize>,

        /// Seed for generated cash flows (ignored with --events)
        #[arg(long)]
        seed: Option<u64>,

        /// Scenario parameters as JSON (defaults to the scenario preset)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Cash flows as a JSON array of {"PE": .., "PC": .., "PRE": ..}
        #[arg(long)]
        events: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print one line per simulated day
        #[arg(long)]
        daily: bool,
    },

    /// Run all three presets against the same cash flows
    Compare {
        #[arg(long, default_value = "365")]
        days: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        events: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the scenario presets as JSON
    Presets {
        #[arg(long, default_value = "365")]
        days: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

const DEFAULT_DAYS: usize = 365;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run {
            scenario,
            days,
            seed,
            config,
            events,
            format,
            daily,
        } => {
            let mut params = match config {
                Some(path) => read_json::<ScenarioParameters>(&path)?,
                None => scenario.preset(days.unwrap_or(DEFAULT_DAYS)),
            };
            if let Some(days) = days {
                params.days = days;
            }
            params.validate()?;

            let events = load_events(events.as_deref(), seed, params.days)?;
            info!(scenario = %scenario, days = params.days, "running scenario");
            let output = run(&params, &events, scenario)?;
            info!(
                deficits = output.event_log.events_of_type("DeficitFunded").len(),
                repayments = output.event_log.events_of_type("DebtServiced").len(),
                "run complete"
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
                OutputFormat::Text => print_run(scenario, &params, &output, daily),
            }
        }

        Command::Compare {
            days,
            seed,
            events,
            format,
        } => {
            let events = load_events(events.as_deref(), seed, days)?;
            info!(days, scenarios = ScenarioKind::ALL.len(), "comparing scenarios");
            let outcomes = compare_presets(days, &events)?;
            let headlines: Vec<ScenarioHeadline> = outcomes.iter().map(|o| o.headline()).collect();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&headlines)?),
                OutputFormat::Text => print_comparison(days, &headlines),
            }
        }

        Command::Presets { days } => {
            let mut presets = serde_json::Map::new();
            for kind in ScenarioKind::ALL {
                presets.insert(kind.name().to_string(), serde_json::to_value(kind.preset(days))?);
            }
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Events from a file, or generated with the reference random source.
fn load_events(path: Option<&Path>, seed: Option<u64>, days: usize) -> Result<Vec<DayEvents>, CliError> {
    if let Some(path) = path {
        return read_json(path);
    }

    let config = CashFlowConfig::default();
    let mut source = match seed {
        Some(seed) => RandomCashFlowGenerator::new(config, seed)?,
        None => RandomCashFlowGenerator::unseeded(config)?,
    };
    info!(seed = source.seed(), days, "generating cash flows");
    Ok(source.generate(days))
}

// ============================================================================
// Text Reports
// ============================================================================

fn print_run(kind: ScenarioKind, params: &ScenarioParameters, output: &SimulationOutput, daily: bool) {
    let summary = &output.summary;

    println!("Scenario: {} ({} days)", kind, params.days);
    println!(
        "Rates: borrow {:.2}%  idle {:.2}%",
        params.borrow_rate, params.idle_rate
    );
    println!();

    if daily {
        println!(
            "{:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "day", "borrowed", "repaid", "drag", "pool cash", "borrow", "cash pool"
        );
        for record in &output.records {
            println!(
                "{:>5} {:>10.4} {:>10.4} {:>10.6} {:>10.4} {:>10.4} {:>10.4}",
                record.day(),
                record.totals().borrowed,
                record.totals().repaid,
                record.totals().drag,
                record.total_pool_cash(),
                record.total_borrow(),
                record.cash_pool().cash
            );
        }
        println!();
    }

    println!(
        "{:<5} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "pool", "cash", "borrow", "int. paid", "cash drag", "borrow drag"
    );
    for pool in PoolId::ALL {
        let p = summary.pool(pool);
        println!(
            "{:<5} {:>12.4} {:>12.4} {:>12.6} {:>12.6} {:>12.6}",
            pool.code(),
            p.ending_cash,
            p.ending_borrow,
            p.interest_paid,
            p.cash_drag,
            p.borrow_drag
        );
    }
    println!();

    let cp = &summary.cash_pool;
    println!("Cash pool ending cash:    {:>12.4}", cp.ending_cash);
    println!("Cash pool interest:       {:>12.6}", cp.interest_earned);
    println!("Facility drag:            {:>12.6}", cp.cash_drag);
    if cp.borrow_drag > 0.0 {
        println!("External line cost:       {:>12.6}", cp.borrow_drag);
    }
    println!("Total borrowed:           {:>12.4}", summary.total_borrowed);
    println!("Total repaid:             {:>12.4}", summary.total_repaid);
    println!("Total drag:               {:>12.6}", summary.total_drag);
}

fn print_comparison(days: usize, headlines: &[ScenarioHeadline]) {
    println!("Scenario comparison over {} days", days);
    println!();
    println!(
        "{:<25} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "scenario", "int. paid", "cash drag", "borrow drag", "facility", "total drag", "avg idle"
    );
    for h in headlines {
        println!(
            "{:<25} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.4}",
            h.kind.name(),
            h.interest_paid,
            h.cash_drag,
            h.borrow_drag,
            h.facility_drag,
            h.total_drag,
            h.average_idle_cash
        );
    }

    if let Some(best) = headlines
        .iter()
        .min_by(|a, b| a.total_drag.total_cmp(&b.total_drag))
    {
        println!();
        println!("Lowest total drag: {}", best.kind);
    }
}
