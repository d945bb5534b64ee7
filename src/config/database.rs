//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation uses `IF NOT EXISTS` and is safe to run on every start.

use crate::entities::{Address, Country, Customer, Discount, DiscountRequirement, Setting};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/discount_rules.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Referenced tables are created before the tables that point at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Country).await?;
    create_table(db, Address).await?;
    create_table(db, Customer).await?;
    create_table(db, Discount).await?;
    create_table(db, DiscountRequirement).await?;
    create_table(db, Setting).await?;

    info!("Database tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;

    debug!("Ensured table '{}'", entity.table_name());
    Ok(())
}
