//! Products module - listing scoped by the category tree, plus admin CRUD.

mod products_model;
mod products_service;
mod products_traits;

pub use products_model::{
    validate_slug, NewProduct, Product, ProductDetail, ProductFilter, ProductQuery, ProductUpdate,
};
pub use products_service::{resolve_category_scope, ProductService};
pub use products_traits::{ProductRepositoryTrait, ProductServiceTrait};
