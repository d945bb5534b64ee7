//! Command-line interface for configuring and checking discount requirements.

use clap::{Args, Parser, Subcommand};
use discount_rules::{
    cache::SettingsCache,
    config::{catalog, database},
    core::{billing_country, customer, discount},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "discount-rules",
    about = "Configure and evaluate discount requirements",
    long_about = None
)]
pub(crate) struct Cli {
    /// Database connection string; falls back to a local SQLite file
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create tables and seed countries and discounts from a TOML file
    Init(InitArgs),
    /// Set the billing country a requirement is keyed on
    Configure(ConfigureArgs),
    /// Check whether a customer meets a single requirement
    Check(CheckArgs),
    /// Check whether a discount applies to a customer right now
    Validate(ValidateArgs),
    /// Print the admin configuration URL for a requirement
    Url(UrlArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Catalog seed file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct ConfigureArgs {
    /// Discount requirement identifier
    #[arg(long)]
    requirement: i64,

    /// Two- or three-letter ISO code of the required billing country; omit to clear
    #[arg(long)]
    country: Option<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Discount requirement identifier
    #[arg(long)]
    requirement: i64,

    /// Customer identifier; omit to check an anonymous customer
    #[arg(long)]
    customer: Option<i64>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Discount identifier
    #[arg(long)]
    discount: i64,

    /// Customer identifier; omit to check an anonymous customer
    #[arg(long)]
    customer: Option<i64>,
}

#[derive(Debug, Args)]
struct UrlArgs {
    /// Discount identifier
    #[arg(long)]
    discount: i64,

    /// Discount requirement identifier, when editing an existing requirement
    #[arg(long)]
    requirement: Option<i64>,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args) => init(&connect(self.database_url).await?, args).await,
            Commands::Configure(args) => {
                configure(&connect(self.database_url).await?, args).await
            }
            Commands::Check(args) => check(&connect(self.database_url).await?, args).await,
            Commands::Validate(args) => {
                validate(&connect(self.database_url).await?, args).await
            }
            Commands::Url(args) => {
                println!(
                    "{}",
                    billing_country::configuration_url(args.discount, args.requirement)
                );
                Ok(())
            }
        }
    }
}

async fn connect(database_url: Option<String>) -> Result<DatabaseConnection> {
    let database_url = database_url.unwrap_or_else(database::get_database_url);
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    Ok(db)
}

async fn init(db: &DatabaseConnection, args: InitArgs) -> Result<()> {
    let config = catalog::load_config(&args.config)?;
    let report = catalog::seed_catalog(db, &config).await?;
    println!(
        "countries created: {}, discounts created: {}, customers created: {}, skipped: {}",
        report.countries_created,
        report.discounts_created,
        report.customers_created,
        report.skipped
    );
    Ok(())
}

async fn configure(db: &DatabaseConnection, args: ConfigureArgs) -> Result<()> {
    billing_country::configure_billing_country(db, args.requirement, args.country.as_deref())
        .await?;
    println!(
        "requirement {}: billing country {}",
        args.requirement,
        args.country.as_deref().unwrap_or("(not configured)")
    );
    Ok(())
}

async fn load_customer(
    db: &DatabaseConnection,
    customer_id: Option<i64>,
) -> Result<Option<customer::CustomerContext>> {
    match customer_id {
        Some(id) => customer::get_customer_context(db, id)
            .await?
            .ok_or(Error::CustomerNotFound { id })
            .map(Some),
        None => Ok(None),
    }
}

async fn check(db: &DatabaseConnection, args: CheckArgs) -> Result<()> {
    let requirement = discount::get_requirement_by_id(db, args.requirement)
        .await?
        .ok_or(Error::DiscountRequirementNotFound {
            id: args.requirement,
        })?;
    let customer = load_customer(db, args.customer).await?;

    let settings = SettingsCache::load(db).await?;
    let met = discount::check_requirement(&settings, &requirement, customer.as_ref()).await?;

    info!("Requirement {} met: {}", args.requirement, met);
    println!("{}", if met { "met" } else { "not met" });
    Ok(())
}

async fn validate(db: &DatabaseConnection, args: ValidateArgs) -> Result<()> {
    let customer = load_customer(db, args.customer).await?;
    let settings = SettingsCache::load(db).await?;
    let now = chrono::Utc::now().naive_utc();

    let valid =
        discount::is_discount_valid(db, &settings, args.discount, customer.as_ref(), now).await?;
    println!("{}", if valid { "applies" } else { "does not apply" });
    Ok(())
}
