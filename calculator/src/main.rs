//! Command-line SIA error calculator.

mod range_arg;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sia::{
    AstigmatismMeasurement, BatchEvaluator, BatchFile, CalculatorConfig, CaseInput, ErrorResult, Eye,
};

use crate::range_arg::RangeArg;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Vectorial error between actual and assumed surgically induced astigmatism"
)]
struct Cli {
    /// Calculator configuration (YAML, JSON or TOML)
    #[arg(long, global = true, default_value = "sia-calc.toml")]
    config: PathBuf,

    /// Base log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Directory for rolling log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CaseArgs {
    /// Incision axis in degrees [0, 180]
    #[arg(long)]
    incision_axis: f64,

    /// Actual SIA flattening magnitude in diopters
    #[arg(long)]
    actual_magnitude: f64,

    /// Actual SIA flattening axis in degrees [0, 180]
    #[arg(long)]
    actual_axis: f64,

    /// Axis of the assumed SIA; defaults to the incision axis
    #[arg(long)]
    expected_axis: Option<f64>,

    /// Eye the axes were measured on (RE/LE)
    #[arg(long, default_value_t = Eye::Right)]
    eye: Eye,
}

impl CaseArgs {
    fn to_case(&self, assumed_magnitude: f64) -> Result<CaseInput> {
        let case = CaseInput {
            eye: self.eye,
            incision_axis: self.incision_axis,
            expected_axis: self.expected_axis,
            actual: AstigmatismMeasurement {
                magnitude: self.actual_magnitude,
                axis: self.actual_axis,
            },
            assumed_magnitude,
        };
        sia::validate::validate_case(&case)?;
        Ok(case)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Error of a single assumed SIA
    Single {
        #[command(flatten)]
        case: CaseArgs,

        /// Assumed SIA flattening magnitude in diopters
        #[arg(long, default_value_t = sia::config::DEFAULT_ASSUMED_MAGNITUDE)]
        assumed_magnitude: f64,
    },

    /// Error over a list of assumed SIA magnitudes
    Scan {
        #[command(flatten)]
        case: CaseArgs,

        /// Candidate sweep (start:stop:step)
        #[arg(long, conflicts_with = "candidate")]
        candidates: Option<RangeArg>,

        /// Explicit candidate magnitude, may be repeated
        #[arg(long)]
        candidate: Vec<f64>,
    },

    /// Error between achieved and planned residual cylinder
    Toric {
        /// Post-op cylinder in diopters (either sign convention)
        #[arg(long, allow_hyphen_values = true)]
        post_cyl: f64,

        /// Post-op cylinder axis in degrees
        #[arg(long)]
        post_axis: f64,

        /// Planned residual cylinder in diopters
        #[arg(long, allow_hyphen_values = true)]
        expected_cyl: f64,

        /// Planned residual axis in degrees
        #[arg(long)]
        expected_axis: f64,
    },

    /// Evaluate every row of a case file (YAML, JSON or TOML)
    Batch {
        file: PathBuf,

        /// Report only each row's error against its own assumed SIA
        #[arg(long)]
        errors_only: bool,

        /// Evaluate rows on the rayon thread pool
        #[arg(long)]
        parallel: bool,
    },
}

fn toric_error(
    post_cyl: f64,
    post_axis: f64,
    expected_cyl: f64,
    expected_axis: f64,
) -> Result<ErrorResult> {
    sia::validate::validate_cylinder("post_cyl", post_cyl)?;
    sia::validate::validate_axis("post_axis", post_axis)?;
    sia::validate::validate_cylinder("expected_cyl", expected_cyl)?;
    sia::validate::validate_axis("expected_axis", expected_axis)?;
    Ok(sia::residual_error(
        AstigmatismMeasurement::new(post_cyl, post_axis),
        AstigmatismMeasurement::new(expected_cyl, expected_axis),
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = common::log_setup::setup_logging(&cli.log_level, &cli.log_dir) {
        eprintln!("Logging disabled: {err}");
    }

    let config = CalculatorConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config '{}'", cli.config.display()))?;
    let precision = config.precision;

    let output = match cli.command {
        Command::Single {
            case,
            assumed_magnitude,
        } => {
            let case = case.to_case(assumed_magnitude)?;
            let error = case.evaluate();
            tracing::info!("Single case {:?} -> {:?}", case, error);
            report::format_error("SIA error", &error, precision)
        }
        Command::Scan {
            case,
            candidates,
            candidate,
        } => {
            let candidates = match candidates {
                Some(range) => range.to_vec(),
                None if !candidate.is_empty() => candidate,
                None => config.candidates.clone(),
            };
            sia::validate::validate_candidates(&candidates)?;
            let case = case.to_case(0.0)?;
            let scan = case.scan(&candidates, precision)?;
            report::format_scan(&scan, precision)
        }
        Command::Toric {
            post_cyl,
            post_axis,
            expected_cyl,
            expected_axis,
        } => {
            let error = toric_error(post_cyl, post_axis, expected_cyl, expected_axis)?;
            report::format_error("Vector error", &error, precision)
        }
        Command::Batch {
            file,
            errors_only,
            parallel,
        } => {
            let batch: BatchFile = common::serde_format::read_file(&file)
                .with_context(|| format!("Failed to read batch file '{}'", file.display()))?;
            let evaluator = BatchEvaluator::new(config)?;

            if errors_only {
                report::format_batch_errors(&evaluator.evaluate_errors(&batch.rows), precision)
            } else {
                let candidates = batch
                    .candidates
                    .unwrap_or_else(|| evaluator.config().candidates.clone());
                let outcome = if parallel {
                    evaluator.evaluate_parallel(&batch.rows, &candidates)?
                } else {
                    evaluator.evaluate_with(&batch.rows, &candidates)?
                };
                report::format_batch(&outcome, precision)
            }
        }
    };

    print!("{output}");
    Ok(())
}
