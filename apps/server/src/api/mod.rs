use std::sync::Arc;

use crate::{config::Config, main_lib::AppState, models};
use anyhow::Context;
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod categories;
pub mod products;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/api/v1/readyz", responses((status = 200, description = "Ready")))]
pub async fn readyz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        readyz,
        categories::get_category_tree,
        categories::get_category_lineage,
        categories::get_category_picker,
        categories::list_admin_categories,
        categories::create_admin_category,
        products::list_products,
        products::get_product_by_slug,
        products::list_admin_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product
    ),
    components(schemas(
        models::Category,
        models::NewCategory,
        models::ParentRef,
        models::AdminCategory,
        models::CategoryNode,
        models::Product,
        models::ProductDetail,
        models::NewProduct,
        models::ProductUpdate
    )),
    tags((name = "storefront"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.cors_allow.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new().allow_origin(Any));
    }
    let origins = config
        .cors_allow
        .iter()
        .map(|o| {
            o.parse()
                .with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new().allow_origin(origins))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(config)?;
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(categories::router())
        .merge(products::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
