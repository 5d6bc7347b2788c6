use clap::Parser;
use core_config::{
    Environment,
    tracing::{init_cli_tracing, install_color_eyre},
};
use database::common::RetryConfig;
use database::postgres::{PostgresConfig, connect_from_config_with_retry};
use domain_users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};
use tracing::info;

mod console;
mod prompt;

use console::Console;
use prompt::TermPrompter;

/// Interactive user management
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Keep users in process memory instead of PostgreSQL; wins over the URL
    #[arg(long)]
    in_memory: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let args = Args::parse();
    init_cli_tracing(&Environment::from_env());

    if args.in_memory {
        info!("Using in-memory storage");
        return run(UserService::new(InMemoryUserRepository::new())).await;
    }

    let url = args
        .database_url
        .ok_or_else(|| eyre::eyre!("Pass --in-memory or set --database-url / DATABASE_URL"))?;

    let db = connect_from_config_with_retry(
        PostgresConfig::with_pool_size(url, 2, 1),
        Some(RetryConfig::new().with_max_retries(3)),
    )
    .await
    .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let repository = PgUserRepository::new(db.clone());
    repository
        .ensure_schema()
        .await
        .map_err(|e| eyre::eyre!("Failed to prepare users schema: {}", e))?;

    let result = run(UserService::new(repository)).await;

    if let Err(e) = db.close().await {
        tracing::error!("Error closing PostgreSQL: {}", e);
    }
    result
}

async fn run<R: UserRepository>(service: UserService<R>) -> eyre::Result<()> {
    let stdout = std::io::stdout();

    Console::new(service, TermPrompter, stdout.lock())
        .run()
        .await?;
    Ok(())
}
