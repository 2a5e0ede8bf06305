//! Product service implementation.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::categories::{CategoryRepositoryTrait, CategoryTree};
use crate::errors::{DatabaseError, ValidationError};
use crate::Result;

use super::{
    NewProduct, Product, ProductDetail, ProductFilter, ProductQuery, ProductRepositoryTrait,
    ProductServiceTrait, ProductUpdate,
};

/// Ids a category selection expands to.
///
/// `None` when nothing is selected. Otherwise the selected id and all of its
/// descendants; an id missing from the tree selects just itself. When the
/// categories cannot be read the selection is dropped and the listing
/// renders unfiltered.
pub fn resolve_category_scope(
    categories: &dyn CategoryRepositoryTrait,
    category_id: Option<i32>,
) -> Option<HashSet<i32>> {
    let id = category_id?;
    let records = match categories.get_categories() {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "Failed to load categories for product filter, ignoring category {}: {}",
                id, err
            );
            return None;
        }
    };
    let scope = CategoryTree::build(records)
        .descendant_ids(id)
        .unwrap_or_else(|| HashSet::from([id]));
    Some(scope)
}

pub struct ProductService {
    repository: Arc<dyn ProductRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    fn ensure_category_exists(&self, category_id: Option<i32>) -> Result<()> {
        if let Some(id) = category_id {
            if self.category_repository.get_category(id)?.is_none() {
                return Err(
                    ValidationError::InvalidInput(format!("Unknown category {}", id)).into(),
                );
            }
        }
        Ok(())
    }

    fn not_found(what: String) -> crate::Error {
        DatabaseError::NotFound(what).into()
    }
}

#[async_trait]
impl ProductServiceTrait for ProductService {
    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        debug!("Listing products for {:?}", query);
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let filter = ProductFilter {
            category_ids: resolve_category_scope(
                self.category_repository.as_ref(),
                query.category_id,
            ),
            search,
            in_stock_only: query.in_stock_only,
        };
        self.repository.list_products(&filter)
    }

    fn get_product(&self, id: i32) -> Result<Product> {
        self.repository
            .get_product(id)?
            .ok_or_else(|| Self::not_found(format!("Product {} not found", id)))
    }

    fn get_product_by_slug(&self, slug: &str) -> Result<ProductDetail> {
        let product = self
            .repository
            .get_product_by_slug(slug)?
            .ok_or_else(|| Self::not_found(format!("Product '{}' not found", slug)))?;

        let breadcrumb = match product.category_id {
            Some(category_id) => match self.category_repository.get_categories() {
                Ok(records) => CategoryTree::build(records).lineage(category_id),
                Err(err) => {
                    warn!("Failed to load breadcrumb for product {}: {}", product.id, err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(ProductDetail {
            product,
            breadcrumb,
        })
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let product = product.validated()?;
        self.ensure_category_exists(product.category_id)?;
        debug!("Creating product '{}'", product.slug);
        self.repository.create_product(product).await
    }

    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<Product> {
        let update = update.validated()?;
        self.ensure_category_exists(update.category_id)?;
        if self.repository.get_product(id)?.is_none() {
            return Err(Self::not_found(format!("Product {} not found", id)));
        }
        debug!("Updating product {}", id);
        self.repository.update_product(id, update).await
    }

    async fn delete_product(&self, id: i32) -> Result<()> {
        debug!("Deleting product {}", id);
        match self.repository.delete_product(id).await? {
            0 => Err(Self::not_found(format!("Product {} not found", id))),
            _ => Ok(()),
        }
    }
}
