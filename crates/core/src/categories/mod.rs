//! Categories module - domain models, tree engine, seeding, services, and traits.
//!
//! Categories are stored flat (adjacency list). The hierarchy only exists in
//! memory, rebuilt from a fresh snapshot on every read.

mod categories_model;
mod categories_service;
mod categories_traits;
mod category_order;
mod category_seed;
mod category_tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use categories_model::{
    validate_name, Category, CategoryNode, CategoryWithParent, NewCategory, ParentRef,
};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
pub use category_order::{compare_categories, natural_cmp};
pub use category_seed::{
    default_seed_tree, parse_seed_tree, seed_category_tree, SeedNode, SeedReport,
    DEFAULT_TAXONOMY_JSON,
};
pub use category_tree::{
    breadcrumb_label, check_integrity, is_selected_or_ancestor, lineage, CategoryTree,
    IntegrityIssue,
};
