//! Create an administrator account from the command line.
//!
//! Usage:
//! ```bash
//! cargo run --bin create-superuser -- --email admin@example.com --password s3cret
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use recipe_api_backend::{config::AppConfig, db, services::UserService};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff superuser for the recipe API"
)]
struct Args {
    /// Email address of the new superuser
    #[arg(long)]
    email: String,

    /// Password of the new superuser
    #[arg(long)]
    password: String,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "recipe_api_backend={level},create_superuser={level},sqlx=warn"
        )))
        .init();

    let mut database = AppConfig::load()?.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }
    database.max_connections = 1;

    let pool = db::create_pool(&database).await?;
    db::run_migrations(&pool).await?;

    let user = UserService::create_superuser(&pool, Some(&args.email), &args.password)
        .await
        .map_err(|e| anyhow!("Failed to create superuser: {}", e))?;

    info!(user_id = %user.id, email = %user.email, "Superuser created");
    Ok(())
}
