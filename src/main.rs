use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use costrelay::cli::{self, Cli, Commands};
use costrelay::config::Config;
use costrelay::errors::RelayError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        built = env!("BUILD_TIMESTAMP"),
        git = option_env!("GIT_HASH").unwrap_or("unknown"),
        "costrelay starting"
    );

    let result = match Config::from_env() {
        Ok(config) => match cli.command {
            Commands::Serve(args) => cli::serve::handle_serve(args, &config).await,
            Commands::Check(args) => cli::check::handle_check(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error_type = e.classify().kind.as_str(), "{}", e);
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            RelayError::Config(_) => 2,
            RelayError::Authentication(_) => 4,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
