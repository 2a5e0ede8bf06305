use std::sync::Arc;

use crate::config::Config;
use storefront_core::categories::{CategoryService, CategoryServiceTrait};
use storefront_core::products::{ProductService, ProductServiceTrait};
use storefront_storage_sqlite::{
    categories::CategoryRepository,
    db::{self, write_actor},
    products::ProductRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub category_service: Arc<dyn CategoryServiceTrait + Send + Sync>,
    pub product_service: Arc<dyn ProductServiceTrait + Send + Sync>,
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded into tracing by the subscriber's log bridge.
pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // A second call (tests building several states) keeps the first subscriber.
    let result = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!("Tracing already initialised: {}", e);
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let product_repository = Arc::new(ProductRepository::new(pool.clone(), writer.clone()));

    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let product_service = Arc::new(ProductService::new(
        product_repository,
        category_repository,
    ));

    Ok(Arc::new(AppState {
        category_service,
        product_service,
    }))
}
