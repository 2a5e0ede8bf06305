use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{NewProduct, Product, ProductDetail, ProductUpdate},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use storefront_core::products::ProductQuery;
use tracing::debug;
use utoipa::IntoParams;

/// Storefront listing parameters.
///
/// The category can arrive under three names; `cid` wins over `categoryId`,
/// which wins over `mainId`. Values that are not integers are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub cid: Option<String>,
    pub category_id: Option<String>,
    pub main_id: Option<String>,
    /// Case-insensitive name search.
    pub q: Option<String>,
}

impl ProductListParams {
    fn selected_category(&self) -> Option<i32> {
        [&self.cid, &self.category_id, &self.main_id]
            .into_iter()
            .flatten()
            .map(|raw| raw.trim())
            .find(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<i32>().ok())
    }
}

// ============================================================================
// Storefront
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListParams),
    responses((status = 200, body = [Product]))
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductListParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let query = ProductQuery::storefront(params.selected_category(), params.q.clone());
    debug!("Listing products for {:?}...", query);
    let products = state.product_service.list_products(&query)?;
    Ok(Json(products.into_iter().map(Product::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses((status = 200, body = ProductDetail), (status = 404, description = "Unknown slug"))
)]
pub async fn get_product_by_slug(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ProductDetail>> {
    debug!("Fetching product {}...", slug);
    let detail = state.product_service.get_product_by_slug(&slug)?;
    Ok(Json(ProductDetail::from(detail)))
}

// ============================================================================
// Admin
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    responses((status = 200, body = [Product]))
)]
pub async fn list_admin_products(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Product>>> {
    debug!("Listing all products...");
    let products = state
        .product_service
        .list_products(&ProductQuery::default())?;
    Ok(Json(products.into_iter().map(Product::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    request_body = NewProduct,
    responses((status = 201, body = Product), (status = 400), (status = 409))
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    debug!("Creating product {}...", product.slug);
    let created = state.product_service.create_product(product.into()).await?;
    Ok((StatusCode::CREATED, Json(Product::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses((status = 200, body = Product), (status = 404))
)]
pub async fn get_product(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Product>> {
    debug!("Fetching product {}...", id);
    let product = state.product_service.get_product(id)?;
    Ok(Json(Product::from(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses((status = 200, body = Product), (status = 400), (status = 404), (status = 409))
)]
pub async fn update_product(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    debug!("Updating product {}...", id);
    let updated = state
        .product_service
        .update_product(id, update.into())
        .await?;
    Ok(Json(Product::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses((status = 204), (status = 404))
)]
pub async fn delete_product(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    debug!("Deleting product {}...", id);
    state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{slug}", get(get_product_by_slug))
        .route(
            "/admin/products",
            get(list_admin_products).post(create_product),
        )
        .route(
            "/admin/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(cid: Option<&str>, category_id: Option<&str>, main_id: Option<&str>) -> Option<i32> {
        ProductListParams {
            cid: cid.map(String::from),
            category_id: category_id.map(String::from),
            main_id: main_id.map(String::from),
            q: None,
        }
        .selected_category()
    }

    #[test]
    fn test_category_param_precedence() {
        assert_eq!(pick(Some("3"), Some("2"), Some("1")), Some(3));
        assert_eq!(pick(None, Some("2"), Some("1")), Some(2));
        assert_eq!(pick(None, None, Some("1")), Some(1));
        assert_eq!(pick(Some(""), None, Some("1")), Some(1));
        assert_eq!(pick(None, None, None), None);
    }

    #[test]
    fn test_non_numeric_category_is_ignored() {
        assert_eq!(pick(Some("abc"), None, None), None);
        // The first present parameter decides even when it does not parse.
        assert_eq!(pick(Some("abc"), Some("2"), None), None);
    }
}
