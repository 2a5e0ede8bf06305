//! Traits for product repository and service.

use async_trait::async_trait;

use crate::errors::Result;

use super::{
    NewProduct, Product, ProductDetail, ProductFilter, ProductQuery, ProductUpdate,
};

/// Repository trait for product persistence operations.
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    /// Products matching `filter`, newest first.
    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>>;
    fn get_product(&self, id: i32) -> Result<Option<Product>>;
    fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>>;
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<Product>;
    /// Returns the number of deleted rows.
    async fn delete_product(&self, id: i32) -> Result<usize>;
}

/// Service trait for product business logic.
#[async_trait]
pub trait ProductServiceTrait: Send + Sync {
    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;
    fn get_product(&self, id: i32) -> Result<Product>;
    fn get_product_by_slug(&self, slug: &str) -> Result<ProductDetail>;
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<Product>;
    async fn delete_product(&self, id: i32) -> Result<()>;
}
