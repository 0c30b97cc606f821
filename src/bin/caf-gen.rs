// CAF-Gen CLI Tool
// Command-line interface for expanding CAF patterns and serving the HTTP API

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use caf_gen::{AppConfig, CafGenerator, GenerateError};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// CAF Generator - Expand wildcard CAF patterns against the reference table
#[derive(Parser, Debug)]
#[command(name = "caf-gen")]
#[command(about = "Expand wildcard CAF patterns filtered by month/year reference codes", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, default_value = "caf-gen.toml", env = "CAF_GEN_CONFIG")]
    config: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a single pattern and print the surviving candidates
    Expand {
        /// CAF pattern, `*` marks a digit to fill (e.g. "ZZ012025**")
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Reference table (CSV), overrides the config file
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Maximum number of wildcard slots
        #[arg(long)]
        max_wildcards: Option<usize>,

        /// Maximum number of combinations
        #[arg(long)]
        max_combinations: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Listen address, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(&args.config)?;

    match args.command {
        Command::Expand {
            pattern,
            table,
            max_wildcards,
            max_combinations,
            json,
        } => {
            if let Some(table) = table {
                config.reference.path = table;
            }
            if let Some(max) = max_wildcards {
                config.limits.max_wildcards = max;
            }
            if let Some(max) = max_combinations {
                config.limits.max_combinations = max;
            }
            let generator = CafGenerator::from_boxed(config.reference_source()?)
                .with_limits(config.limits);
            run_expand(&generator, &pattern, json, &mut std::io::stdout().lock())
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            run_serve(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Rejected patterns print a message and exit with failure; a reference
/// table that cannot be read is returned as an error
fn run_expand(
    generator: &CafGenerator,
    pattern: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let generated = match generator.generate(pattern) {
        Ok(generated) => generated,
        Err(e @ GenerateError::Reference(_)) => return Err(e.into()),
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&generated)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(
        out,
        "Period: {} ({} reference codes)",
        generated.period, generated.reference_count
    )?;

    if generated.combos.is_empty() {
        writeln!(out, "❌ No candidate contains a reference code.")?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(out, "✅ Found {} candidates:\n", generated.combos.len())?;
    for (idx, combo) in generated.combos.iter().enumerate() {
        writeln!(out, "{:>5}. {}", idx + 1, combo)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn run_serve(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.server.bind.parse()?;
    let generator = CafGenerator::from_boxed(config.reference_source()?).with_limits(config.limits);
    tracing::debug!(
        max_wildcards = generator.limits().max_wildcards,
        max_combinations = generator.limits().max_combinations,
        "expansion limits"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(caf_gen::server::serve(generator, addr))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caf_gen::{CsvReferenceSource, ReferenceIndex, ReferenceRecord, SnapshotSource};

    fn create_generator() -> CafGenerator {
        let index = ReferenceIndex::from_records(vec![ReferenceRecord::new("01", "2025", "99")]);
        CafGenerator::new(SnapshotSource::new(index))
    }

    #[test]
    fn test_expand_lists_candidates() {
        let mut out = Vec::new();
        let code = run_expand(&create_generator(), "ZZ012025**", false, &mut out).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Period: 01/2025 (1 reference codes)"));
        assert!(text.contains("1. ZZ01202599"));
    }

    #[test]
    fn test_expand_json() {
        let mut out = Vec::new();
        run_expand(&create_generator(), "ZZ012025**", true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["combos"], serde_json::json!(["ZZ01202599"]));
        assert_eq!(value["period"]["month"], "01");
    }

    #[test]
    fn test_rejected_pattern_fails_without_output() {
        let mut out = Vec::new();
        let code = run_expand(&create_generator(), "ZZ012025******", false, &mut out).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());

        let code = run_expand(&create_generator(), "ZZ022025**", false, &mut out).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_unreadable_table_is_an_error() {
        let generator = CafGenerator::new(CsvReferenceSource::new("/nonexistent/gabarito.csv"));
        let mut out = Vec::new();
        assert!(run_expand(&generator, "ZZ012025**", false, &mut out).is_err());
    }
}
