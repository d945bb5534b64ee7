use clap::Parser;
use discount_rules::errors::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Parse arguments after .env so `DATABASE_URL` can come from it
    cli::Cli::parse().run().await
}
