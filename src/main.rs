//! Slurry Treatment Simulator
//!
//! Command-line front end for the cerdaza fertilizer calculator.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

use cerdaza_simulator::calculator::{simulate_with, SimulationReport};
use cerdaza_simulator::config::SimulationConfig;
use cerdaza_simulator::db;
use cerdaza_simulator::format::{Currency, Formatter, LocaleConventions};
use cerdaza_simulator::logging;
use cerdaza_simulator::scenario::{self, Outcome};

#[derive(Parser)]
#[command(name = "cerdaza-simulator")]
#[command(about = "Yield, cycle time and profit calculator for swine slurry treatment")]
struct Cli {
    /// Path to the SQLite run history
    #[arg(short, long, default_value = "cerdaza_runs.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation
    #[command(allow_negative_numbers = true)]
    Calc {
        /// JSON config with defaults and limits
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Raw slurry volume in litres
        #[arg(long)]
        cerdaza: Option<f64>,

        /// Biotech substance units consumed
        #[arg(long)]
        biotech_amount: Option<f64>,

        /// Biotech substance price per unit
        #[arg(long)]
        biotech_value: Option<f64>,

        /// Foliar fertilizer market price per unit
        #[arg(long)]
        foliar_value: Option<f64>,

        /// Radicular fertilizer market price per unit
        #[arg(long)]
        radicular_value: Option<f64>,

        /// Number of parallel process lines
        #[arg(short, long)]
        systems: Option<u32>,

        /// Number conventions for the report (es-CO, en-US)
        #[arg(long, default_value = "es-CO")]
        locale: String,

        /// Currency shown in the report (USD, COP)
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Print inputs and outputs as JSON
        #[arg(long)]
        json: bool,

        /// Store the run in the history database
        #[arg(long)]
        record: bool,

        /// Label for the stored run
        #[arg(long, requires = "record")]
        label: Option<String>,
    },

    /// Evaluate every scenario file in a directory
    Batch {
        /// Directory containing *.json scenario files
        dir: PathBuf,

        /// Print outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Defaults,

    /// List recorded runs
    History {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete all recorded runs
    ClearHistory,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Calc {
            config,
            cerdaza,
            biotech_amount,
            biotech_value,
            foliar_value,
            radicular_value,
            systems,
            locale,
            currency,
            json,
            record,
            label,
        } => {
            let mut settings = match &config {
                Some(path) => SimulationConfig::load(path)?,
                None => SimulationConfig::default(),
            };

            if let Some(v) = cerdaza {
                settings.cerdaza_amount = v;
            }
            if let Some(v) = biotech_amount {
                settings.biotech_substance_amount = v;
            }
            if let Some(v) = biotech_value {
                settings.biotech_substance_value = v;
            }
            if let Some(v) = foliar_value {
                settings.foliar_fertilizer_value = v;
            }
            if let Some(v) = radicular_value {
                settings.radicular_fertilizer_value = v;
            }
            if let Some(v) = systems {
                settings.systems_count = v;
            }

            let inputs = settings.inputs();
            let outputs = simulate_with(&inputs, &settings.limits)?;
            let report = SimulationReport::new(inputs, outputs);

            if json {
                let value = json!({ "inputs": inputs, "outputs": outputs });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let formatter = formatter_for(&locale, &currency)?;
                println!("{}", report.render(&formatter));
            }

            if record {
                let conn = open_history(&cli.database)?;
                let id = db::insert_run(&conn, label.as_deref(), &inputs, &outputs)?;
                info!(id, database = %cli.database.display(), "recorded run");
            }
        }

        Commands::Batch { dir, json } => {
            let (outcomes, stats) = scenario::evaluate_directory(&dir)?;

            if json {
                let entries: Vec<_> = outcomes
                    .iter()
                    .map(|o| {
                        let path = o.path.display().to_string();
                        match &o.outcome {
                            Outcome::Evaluated(r) => json!({
                                "path": path,
                                "inputs": r.inputs,
                                "outputs": r.outputs,
                            }),
                            Outcome::Rejected(e) => json!({
                                "path": path,
                                "rejected": e.to_string(),
                                "field": e.field(),
                            }),
                            Outcome::Failed(msg) => json!({ "path": path, "error": msg }),
                        }
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for o in &outcomes {
                    println!("--- {} ---", o.path.display());
                    match &o.outcome {
                        Outcome::Evaluated(report) => println!("{}", report),
                        Outcome::Rejected(e) => println!("Rejected: {}\n", e),
                        Outcome::Failed(msg) => println!("Error: {}\n", msg),
                    }
                }
                println!("{}", stats);
            }
        }

        Commands::Defaults => {
            println!(
                "{}",
                serde_json::to_string_pretty(&SimulationConfig::default())?
            );
        }

        Commands::History { limit } => {
            let conn = open_history(&cli.database)?;
            let runs = db::list_runs(&conn, limit)?;
            if runs.is_empty() {
                println!("No recorded runs. Use 'calc --record' to store one.");
            } else {
                let fmt = Formatter::<LocaleConventions>::default();
                println!(
                    "{:>5}  {:<19}  {:<16} {:>16} {:>4} {:>14} {:>20}",
                    "ID", "Recorded", "Label", "Slurry (L)", "Sys", "Cycle", "Profit"
                );
                println!("{}", "-".repeat(102));
                for run in runs {
                    println!(
                        "{:>5}  {:<19}  {:<16} {:>16} {:>4} {:>14} {:>20}",
                        run.id,
                        run.recorded_at,
                        run.label.as_deref().unwrap_or("-"),
                        fmt.quantity(run.inputs.cerdaza_amount),
                        run.inputs.systems_count,
                        fmt.time(run.outputs.total_cycle_time),
                        fmt.currency(run.outputs.total_profit)
                    );
                }
            }
        }

        Commands::ClearHistory => {
            let conn = open_history(&cli.database)?;
            let removed = db::clear_runs(&conn)?;
            println!("Removed {} recorded runs", removed);
        }
    }

    Ok(())
}

fn open_history(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn formatter_for(locale: &str, currency: &str) -> Result<Formatter> {
    let locale = LocaleConventions::by_tag(locale)
        .ok_or_else(|| anyhow!("Unknown locale '{}' (expected es-CO or en-US)", locale))?;
    let currency = Currency::by_code(currency)
        .ok_or_else(|| anyhow!("Unknown currency '{}' (expected USD or COP)", currency))?;
    Ok(Formatter::new(locale, currency))
}
