//! Traits for category repository and service.

use async_trait::async_trait;

use crate::errors::Result;

use super::{
    Category, CategoryNode, CategoryTree, CategoryWithParent, NewCategory, SeedNode, SeedReport,
};

/// Repository trait for category persistence operations.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// All categories ordered by parent id, then name.
    fn get_categories(&self) -> Result<Vec<Category>>;
    fn get_category(&self, id: i32) -> Result<Option<Category>>;
    /// Exact lookup of a sibling by name; `None` parent means the top level.
    fn find_by_name_and_parent(&self, name: &str, parent_id: Option<i32>)
        -> Result<Option<Category>>;
    async fn create_category(&self, category: NewCategory) -> Result<Category>;
}

/// Service trait for category business logic.
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn get_categories(&self) -> Result<Vec<Category>>;
    fn get_category_tree(&self) -> Result<CategoryTree>;
    /// Nested tree, optionally narrowed by a name search.
    fn get_tree_nodes(&self, query: Option<&str>) -> Result<Vec<CategoryNode>>;
    fn get_lineage(&self, id: i32) -> Result<Vec<Category>>;
    fn get_picker_levels(&self, path: &[i32]) -> Result<Vec<Vec<Category>>>;
    fn get_admin_categories(&self) -> Result<Vec<CategoryWithParent>>;
    async fn create_category(&self, category: NewCategory) -> Result<Category>;
    async fn seed_categories(&self, tree: &[SeedNode]) -> Result<SeedReport>;
}
