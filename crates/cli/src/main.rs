//! iep-qa CLI - validate generated IEP content from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iep_qa_core::{GateComparison, QualityThresholds, ValidationReport, ValidationRequest};
use iep_qa_quality::{ContentValidator, QualityAssuranceEngine};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status when `--strict` is set and the content needs revision.
const EXIT_REQUIRES_REVISION: u8 = 2;

#[derive(Parser)]
#[command(name = "iep-qa")]
#[command(about = "Quality assurance for generated IEP content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request and print the report as JSON
    Validate {
        /// Request JSON file, or `-` for stdin
        request: PathBuf,
        /// Thresholds JSON file (missing fields use defaults)
        #[arg(long)]
        thresholds: Option<PathBuf>,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
        /// Exit with status 2 when the content requires revision
        #[arg(long)]
        strict: bool,
    },
    /// Print the default thresholds
    Thresholds,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            request,
            thresholds,
            compact,
            strict,
        } => {
            let thresholds = match thresholds {
                Some(path) => QualityThresholds::from_file(&path)
                    .with_context(|| format!("Failed to load thresholds from {}", path.display()))?,
                None => QualityThresholds::default(),
            };
            let engine = QualityAssuranceEngine::with_thresholds(thresholds)?;

            let raw = read_request(&request)?;
            let request = ValidationRequest::from_json_str(&raw).context("Malformed validation request")?;

            let report = engine.validate(&request).await?;
            log_summary(&report);

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", json);

            if strict && !report.is_approved() {
                return Ok(ExitCode::from(EXIT_REQUIRES_REVISION));
            }
        }
        Commands::Thresholds => {
            println!("{}", serde_json::to_string_pretty(&QualityThresholds::default())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_request(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read request from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read request from {}", path.display()))
}

fn log_summary(report: &ValidationReport) {
    for gate in &report.quality_gates {
        info!(
            "{:<14} {:>8.3} {} {:<8.3} {}",
            gate.gate.key(),
            gate.actual,
            format_comparison(gate.comparison),
            gate.threshold,
            if gate.passed { "PASS" } else { "FAIL" },
        );
    }
    info!(
        "Overall score {:.3}, {}",
        report.overall_quality_score,
        if report.is_approved() { "APPROVED" } else { "REQUIRES REVISION" }
    );
}

fn format_comparison(comparison: GateComparison) -> &'static str {
    match comparison {
        GateComparison::LessThan => "<",
        GateComparison::AtLeast => ">=",
    }
}
