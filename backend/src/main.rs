//! Frentes CLI - Turn a schedule report into procedure activity tables
//!
//! # Main Commands
//!
//! ```bash
//! frentes run                       # extract → clean → partition with configured paths
//! frentes extract -i report.csv     # Report to flattened activity table
//! frentes clean                     # Fix equipment codes and separators
//! frentes partition                 # Split into stop / maintenance / start tables
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! frentes stats                     # Block summary as JSON
//! frentes inspect report.csv        # Decoded report rows as JSON
//! frentes config                    # Effective paths as JSON
//! ```
//!
//! Paths come from built-in defaults, then `FRENTES_*` environment
//! variables (a `.env` file is honoured), then the flags below.

use clap::{Parser, Subcommand};
use frentes::logs::init_tracing;
use frentes::output::write_text;
use frentes::{
    read_report, run_all, run_cleanup, run_extract, run_partition, run_stats, PipelineConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "frentes")]
#[command(about = "Extract and partition schedule activities for the dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract activities from the report into the flattened table
    Extract {
        /// Source report (`;`-delimited, any encoding)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Flattened table to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write activities as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Clean the flattened table
    Clean {
        /// Flattened table
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned table to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split the cleaned table into the three procedure tables
    Partition {
        /// Cleaned table
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Stop procedure output
        #[arg(long)]
        stop: Option<PathBuf>,

        /// Maintenance output
        #[arg(long)]
        maintenance: Option<PathBuf>,

        /// Start procedure output
        #[arg(long)]
        start: Option<PathBuf>,
    },

    /// Run every stage in order
    Run,

    /// Print block statistics as JSON
    Stats {
        /// Cleaned table (default: configured partition input)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print a decoded report as JSON
    Inspect {
        /// Source report
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let mut config = PipelineConfig::from_env();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Extract {
            input,
            output,
            json,
        } => {
            if let Some(p) = input {
                config.extract.input_path = p;
            }
            if let Some(p) = output {
                config.extract.output_path = p;
            }
            if let Some(p) = json {
                config.extract.json_path = Some(p);
            }
            run_extract(&config.extract).map(|_| ()).map_err(Into::into)
        }

        Commands::Clean { input, output } => {
            if let Some(p) = input {
                config.cleanup.input_path = p;
            }
            if let Some(p) = output {
                config.cleanup.output_path = p;
            }
            run_cleanup(&config.cleanup).map(|_| ()).map_err(Into::into)
        }

        Commands::Partition {
            input,
            stop,
            maintenance,
            start,
        } => {
            let partition = &mut config.partition;
            if let Some(p) = input {
                partition.input_path = p;
            }
            if let Some(p) = stop {
                partition.outputs.stop_procedure = p;
            }
            if let Some(p) = maintenance {
                partition.outputs.maintenance = p;
            }
            if let Some(p) = start {
                partition.outputs.start_procedure = p;
            }
            run_partition(partition).map(|_| ()).map_err(Into::into)
        }

        Commands::Run => run_all(&config).map(|_| ()).map_err(Into::into),

        Commands::Stats { input } => {
            let input = input.unwrap_or_else(|| config.partition.input_path.clone());
            cmd_stats(&input)
        }

        Commands::Inspect { input, output } => cmd_inspect(&input, output.as_deref()),

        Commands::Config => print_json(&config),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_stats(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let stats = run_stats(input)?;
    print_json(&stats)
}

fn cmd_inspect(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Inspecting report: {}", input.display());

    let report = read_report(input)?;
    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Columns: {}", report.headers.join(", "));
    eprintln!("✅ Parsed {} rows", report.rows.len());

    let json = serde_json::to_string_pretty(&report.to_json_records())?;
    write_output(&json, output)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            write_text(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
