use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cityd::api::{self, AppState};
use cityd::cli::{self, Cli, Command};
use cityd::repository::CityRepository;
use cityd::store::FileStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "cityd exited with an error");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Arc::new(CityRepository::new(FileStore::new(args.data_file)));

    match args.command {
        Command::Serve { listen, api_key } => {
            let state = AppState { repo, api_key };
            api::serve(state, &listen).await?;
        }
        Command::Stats => cli::stats(&repo)?,
        Command::Seed { count } => cli::seed(&repo, count)?,
    }

    Ok(())
}
