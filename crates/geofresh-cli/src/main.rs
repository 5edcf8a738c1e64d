mod processes;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "geofresh")]
#[command(about = "Run GeoFRESH river network processes on an OGC API - Processes service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a process, wait for it and print the GeoJSON result
    Run(RunArgs),
    /// List the processes this client knows about
    Processes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = geofresh_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run::run_process(config, args).await,
        Commands::Processes => {
            processes::print_processes();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
