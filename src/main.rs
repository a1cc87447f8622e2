// GSTR-1 Normalizer - CLI
// Reads a billing export (CSV), writes the GSTR-1 template (CSV).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gstr1_normalizer::{
    dropdowns_by_header, normalize, read_csv, write_csv, write_json, AliasTable, EngineConfig,
    ReturnPeriod, VERSION,
};

/// Normalize outward-supply invoice line items into the GSTR-1 upload template.
#[derive(Parser, Debug)]
#[command(name = "gstr1-normalizer", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map, classify, aggregate and write one input file.
    Normalize(NormalizeArgs),

    /// Write the enumerated value lists as JSON.
    Dropdowns {
        /// Output JSON file
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct NormalizeArgs {
    /// Input CSV (header row + line items)
    #[arg(long)]
    input: PathBuf,

    /// Output CSV in template column order
    #[arg(long)]
    output: PathBuf,

    /// Six-digit return period, e.g. 072024
    #[arg(long)]
    return_period: String,

    /// Extra column aliases (JSON object: source column → template column)
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Also write the dropdown lists to this JSON file
    #[arg(long)]
    dropdowns: Option<PathBuf>,

    /// Also write the run report to this JSON file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    tracing::debug!("gstr1-normalizer v{} starting", VERSION);

    match cli.command {
        Commands::Normalize(args) => run_normalize(&args),
        Commands::Dropdowns { output } => {
            write_json(&output, &dropdowns_by_header())?;
            println!("✓ Dropdown lists written to {}", output.display());
            Ok(())
        }
    }
}

fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    println!("🧾 GSTR-1 Normalizer");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Configuration (fails before touching the input)
    let return_period = ReturnPeriod::from_optional(Some(args.return_period.as_str()))
        .context("Invalid --return-period")?;
    let mut aliases = AliasTable::standard();
    if let Some(path) = &args.aliases {
        let extra = AliasTable::from_file(path).context("Invalid --aliases file")?;
        println!("✓ Loaded {} extra column aliases", extra.len());
        aliases.extend(&extra);
    }
    let config = EngineConfig::new(return_period).with_aliases(aliases);

    // 2. Load input
    println!("\n📂 Loading {}...", args.input.display());
    let batch = read_csv(&args.input)?;
    println!("✓ Loaded {} rows ({} columns)", batch.len(), batch.headers.len());

    // 3. Normalize
    println!("\n🔄 Normalizing for return period {}...", config.return_period);
    let result = normalize(&batch, &config).context("Normalization failed")?;
    println!("✓ {}", result.report.summary());

    // 4. Write outputs
    write_csv(&args.output, &result.records)?;
    println!("\n💾 Output written to {}", args.output.display());

    if let Some(path) = &args.dropdowns {
        write_json(path, &dropdowns_by_header())?;
        println!("✓ Dropdown lists written to {}", path.display());
    }
    if let Some(path) = &args.report {
        write_json(path, &result.report)?;
        println!("✓ Report written to {}", path.display());
    }

    if result.report.has_warnings() {
        println!("\n⚠️  {} values could not be read as numbers:", result.report.warnings.len());
        for warning in &result.report.warnings {
            println!("   {}", warning.message());
        }
    }

    Ok(())
}
