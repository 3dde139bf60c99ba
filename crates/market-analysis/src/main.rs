//! Market analysis CLI
//!
//! Runs the Researcher → Analyst pipeline once and saves the result.
//!
//! # Usage
//!
//! ```bash
//! # Credentials come from the environment or a .env file
//! export OPENAI_API_KEY="sk-..."
//! # Optional: any OpenAI-compatible endpoint and model
//! export OPENAI_API_BASE="http://localhost:1234/v1"
//! export OPENAI_MODEL_NAME="gpt-4o-mini"
//!
//! cargo run --bin market-analysis -- --output-dir reports
//! ```

use anyhow::Context;
use clap::Parser;
use crew_llm::providers::{OpenAIConfig, OpenAIProvider};
use crew_runtime::LlmEngine;
use crew_utils::{ConfigError, Settings, init_tracing_with_default};
use crew_workflow::{Crew, PipelineRunner, ReportMetadata, ResultWriter, preview};
use crew_workflow::report::{DEFAULT_PREFIX, DEFAULT_PREVIEW_CHARS};
use market_analysis::console::print_banner;
use market_analysis::{
    AnalysisOutcome, ConsoleObserver, market_analysis, run_analysis, token_usage,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Exit status when the API credential is missing
const EXIT_MISSING_CREDENTIAL: u8 = 1;
/// Exit status when a pipeline stage failed
const EXIT_PIPELINE_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "market-analysis")]
#[command(about = "Research the AI healthcare market and rank investment opportunities", long_about = None)]
struct Args {
    /// Directory the report or error log is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Filename prefix for the report
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Model to use, overrides OPENAI_MODEL_NAME
    #[arg(short, long)]
    model: Option<String>,

    /// Upper bound on tokens generated per task
    #[arg(long, default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Seconds to wait for each API response
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Run without shared run memory
    #[arg(long)]
    no_memory: bool,

    /// Exit with status 0 even when the analysis fails
    #[arg(long)]
    legacy_exit_code: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing_with_default("warn,crew_workflow=info,crew_runtime=info,market_analysis=info");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(ConfigError::MissingCredential(var)) => {
            println!("❌ Error: {var} not found in environment variables");
            println!("Please ensure your .env file contains: {var}=your-api-key-here");
            return Ok(ExitCode::from(EXIT_MISSING_CREDENTIAL));
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    let settings = match args.model.clone() {
        Some(model) => settings.with_model(model),
        None => settings,
    };
    info!(?settings, "Loaded configuration");

    println!("Starting market analysis...");

    let crew = Crew::from_definition(market_analysis().memory(!args.no_memory))?;

    let provider = OpenAIProvider::with_config(
        OpenAIConfig::new(settings.api_key.clone())
            .with_api_base(settings.api_base.clone())
            .with_timeout(Duration::from_secs(args.timeout)),
    )?;
    info!(endpoint = %provider.config().endpoint(), timeout_secs = args.timeout, "Provider ready");
    let engine = LlmEngine::builder()
        .provider(Arc::new(provider))
        .model(settings.model.clone())
        .max_tokens(args.max_tokens)
        .temperature(args.temperature)
        .build()?;

    let runner = PipelineRunner::new(Arc::new(engine)).with_observer(Arc::new(ConsoleObserver));

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;
    let writer = ResultWriter::new(&args.output_dir)
        .with_prefix(args.prefix.clone())
        .with_metadata(ReportMetadata::from_crew(&crew));

    let outcome = run_analysis(&runner, &crew, &writer).await?;

    match &outcome {
        AnalysisOutcome::Completed { report, output } => {
            println!("\nAnalysis completed!");
            println!("\nResults saved to: {}", report.display());
            print_banner("ANALYSIS SUMMARY");
            println!("{}", preview(&output.raw.raw, DEFAULT_PREVIEW_CHARS));
            if let Some(usage) = token_usage(output) {
                println!(
                    "\nTokens used: {} (prompt {}, completion {})",
                    usage.total(),
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
            }
            println!("\n✅ Market analysis completed successfully!");
            println!("Check the generated files for detailed results.");
        }
        AnalysisOutcome::Failed { error_log, error } => {
            println!("{error}");
            println!("Error log saved to: {}", error_log.display());
            println!("\n❌ Market analysis failed. Check error log for details.");
        }
    }

    Ok(exit_code(outcome.is_success(), args.legacy_exit_code))
}

fn exit_code(success: bool, legacy: bool) -> ExitCode {
    if success || legacy {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_PIPELINE_FAILED)
    }
}
