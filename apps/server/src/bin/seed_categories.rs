//! Populates the category table with a taxonomy.
//!
//! Uses `SF_SEED_FILE` when set, the built-in taxonomy otherwise. Safe to run
//! repeatedly: existing categories are reused and only missing ones created.

use std::sync::Arc;

use anyhow::Context;
use storefront_core::categories::{
    default_seed_tree, parse_seed_tree, CategoryService, CategoryServiceTrait,
};
use storefront_server::{config::Config, init_tracing};
use storefront_storage_sqlite::{categories::CategoryRepository, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let tree = match &config.seed_file {
        Some(path) => {
            tracing::info!("Reading taxonomy from {}", path.display());
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_seed_tree(&raw)?
        }
        None => default_seed_tree()?,
    };

    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let service = CategoryService::new(Arc::new(CategoryRepository::new(pool, writer)));
    let report = service
        .seed_categories(&tree)
        .await
        .context("Category seeding failed")?;

    tracing::info!(
        "Seeded {}: {} created, {} already present",
        db_path,
        report.created,
        report.existing
    );
    Ok(())
}
