use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{AdminCategory, Category, CategoryNode, NewCategory},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TreeQuery {
    /// Case-insensitive name filter; ancestors of matches are kept.
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PickerQuery {
    /// Selected ids from the root down, comma separated (e.g. `1,2,3`).
    pub path: Option<String>,
}

fn parse_path(raw: Option<&str>) -> ApiResult<Vec<i32>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|segment| {
            segment
                .trim()
                .parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid category id '{}'", segment)))
        })
        .collect()
}

// ============================================================================
// Storefront
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/categories/tree",
    params(TreeQuery),
    responses((status = 200, body = [CategoryNode]))
)]
pub async fn get_category_tree(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TreeQuery>,
) -> Json<Vec<CategoryNode>> {
    debug!("Fetching category tree (q = {:?})...", query.q);
    // The navigation tree is decoration; a storage hiccup renders an empty menu.
    match state.category_service.get_tree_nodes(query.q.as_deref()) {
        Ok(nodes) => Json(nodes.into_iter().map(CategoryNode::from).collect()),
        Err(e) => {
            warn!("Failed to load category tree: {}", e);
            Json(Vec::new())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/lineage",
    params(("id" = i32, Path, description = "Category id")),
    responses((status = 200, body = [Category]))
)]
pub async fn get_category_lineage(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Category>>> {
    debug!("Fetching lineage of category {}...", id);
    let lineage = state.category_service.get_lineage(id)?;
    Ok(Json(lineage.into_iter().map(Category::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/picker",
    params(PickerQuery),
    responses((status = 200, body = Vec<Vec<Category>>))
)]
pub async fn get_category_picker(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<Vec<Vec<Category>>>> {
    let path = parse_path(query.path.as_deref())?;
    debug!("Fetching picker levels for {:?}...", path);
    let levels = state.category_service.get_picker_levels(&path)?;
    Ok(Json(
        levels
            .into_iter()
            .map(|level| level.into_iter().map(Category::from).collect())
            .collect(),
    ))
}

// ============================================================================
// Admin
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/admin/categories",
    responses((status = 200, body = [AdminCategory]))
)]
pub async fn list_admin_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AdminCategory>>> {
    debug!("Fetching admin category list...");
    let categories = state.category_service.get_admin_categories()?;
    Ok(Json(categories.into_iter().map(AdminCategory::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/categories",
    request_body = NewCategory,
    responses(
        (status = 201, body = [AdminCategory]),
        (status = 400, description = "Missing name"),
        (status = 404, description = "Unknown parent"),
        (status = 409, description = "Duplicate name under the same parent")
    )
)]
pub async fn create_admin_category(
    State(state): State<Arc<AppState>>,
    Json(category): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Vec<AdminCategory>>)> {
    debug!("Creating category {}...", category.name);
    state.category_service.create_category(category.into()).await?;
    let categories = state.category_service.get_admin_categories()?;
    Ok((
        StatusCode::CREATED,
        Json(categories.into_iter().map(AdminCategory::from).collect()),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories/tree", get(get_category_tree))
        .route("/categories/picker", get(get_category_picker))
        .route("/categories/{id}/lineage", get(get_category_lineage))
        .route(
            "/admin/categories",
            get(list_admin_categories).post(create_admin_category),
        )
}
