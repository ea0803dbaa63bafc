//! setup-texlive - Cached TeX Live provisioning
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use setup_texlive::cli::args::LogFormat;
use setup_texlive::cli::{Cli, Commands};
use setup_texlive::config::ConfigManager;
use setup_texlive::error::SetupResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SetupResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("setup_texlive=warn"),
        1 => EnvFilter::new("setup_texlive=info"),
        _ => EnvFilter::new("setup_texlive=debug"),
    };

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.general.log_format == "json",
    };
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run(args) => setup_texlive::cli::commands::run(args, &config).await,
        Commands::Key(args) => setup_texlive::cli::commands::key(args, &config).await,
        Commands::Mirror(args) => setup_texlive::cli::commands::mirror(args, &config).await,
        Commands::Platform => setup_texlive::cli::commands::platform().await,
        Commands::Config(args) => {
            setup_texlive::cli::commands::config(args, &config_manager, &config).await
        }
    }
}
