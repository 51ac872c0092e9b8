use std::path::Path;
use std::process::ExitCode;

use audience_agent::config::credentials::Credentials;
use audience_agent::observability::metrics::get_metrics;
use audience_agent::utils::config_loader;
use audience_agent::utils::io;
use audience_agent::utils::logging;
use audience_agent::utils::logging::LogLevel;
use audience_agent::{Dispatcher, ServiceConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "audience-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run audience operations for every input item
    Run {
        /// JSON file with an array of item parameters, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Report failed items as `{"error": ...}` instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Check that the token endpoint accepts the configured credentials
    TestCredentials,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let mut service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned())?;

    // -------------------------------
    // 2. Resolve credentials
    // -------------------------------

    let credentials = Credentials::resolve(&service_config.credentials)
        .context("failed to resolve credentials")?;

    match args.command {
        Command::TestCredentials => {
            let dispatcher = Dispatcher::from_settings(&service_config.settings, credentials)?;
            dispatcher.token_source().test_credentials().await?;
            info!("credentials accepted by token endpoint");
            println!("credentials OK");
            Ok(())
        }
        Command::Run { input, output, continue_on_fail } => {
            // flag can only switch failure tolerance on
            service_config.settings.continue_on_fail |= continue_on_fail;

            // -------------------------------
            // 3. Read input items
            // -------------------------------

            let items = io::read_items(&input).await?;

            // -------------------------------
            // 4. Dispatch items in order
            // -------------------------------

            let dispatcher = Dispatcher::from_settings(&service_config.settings, credentials)?;
            let result = dispatcher.run(&items).await;

            // -------------------------------
            // 5. Metrics textfile, then output
            // -------------------------------

            write_metrics(&service_config).await;
            let output_items = result?;
            io::write_output(output.as_deref(), &output_items).await
        }
    }
}

async fn write_metrics(service_config: &ServiceConfig) {
    let metrics_config = &service_config.settings.metrics;
    if !metrics_config.is_enabled {
        return;
    }
    let path = Path::new(&metrics_config.path);
    if let Err(err) = get_metrics().await.write_textfile(path).await {
        error!("failed to write metrics to '{}': {:#}", metrics_config.path, err);
    }
}
