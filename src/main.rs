//! Docker Volume Frontend
//!
//! Resolves the storage class and volume config for a volume create request
//! against backends described in a YAML configuration, and prints both as
//! JSON.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docker_volume_frontend::{
    FrontendConfig, InMemoryOrchestrator, OptionSet, Result, VolumeFrontend,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Docker Volume Frontend - automatic storage classes for volume options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file with backends and defaults
    #[arg(long, env = "FRONTEND_CONFIG")]
    config: Option<String>,

    /// Volume name
    #[arg(long)]
    name: String,

    /// Volume option as key=value (repeatable)
    #[arg(short = 'o', long = "opt")]
    opts: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, retryable = e.is_retryable(), "Volume preparation failed");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => FrontendConfig::from_file(path)?,
        None => FrontendConfig::default(),
    };

    let mut options = OptionSet::new();
    for opt in &args.opts {
        let (key, value) = OptionSet::parse_pair(opt)?;
        options.insert(key, value);
    }

    info!(
        version = docker_volume_frontend::VERSION,
        backends = config.backends.len(),
        "Starting volume frontend"
    );

    let orchestrator = InMemoryOrchestrator::with_backends(config.backends.clone());
    let frontend = VolumeFrontend::new(orchestrator, config);

    let prepared = frontend.prepare_volume(&args.name, options).await?;

    let output = serde_json::to_string_pretty(&prepared)?;
    println!("{}", output);

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout carries only the JSON result
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

