//! Category service implementation.

use async_trait::async_trait;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{DatabaseError, Error};
use crate::Result;

use super::category_order::natural_cmp;
use super::category_seed::seed_category_tree;
use super::{
    Category, CategoryNode, CategoryRepositoryTrait, CategoryServiceTrait, CategoryTree,
    CategoryWithParent, NewCategory, ParentRef, SeedNode, SeedReport,
};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Roots sort first (empty parent name), then by parent name and name.
    fn admin_cmp(a: &CategoryWithParent, b: &CategoryWithParent) -> Ordering {
        let parent_name = |c: &CategoryWithParent| {
            c.parent.as_ref().map(|p| p.name.clone()).unwrap_or_default()
        };
        natural_cmp(&parent_name(a), &parent_name(b))
            .then_with(|| natural_cmp(&a.category.name, &b.category.name))
            .then_with(|| a.category.id.cmp(&b.category.id))
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn get_categories(&self) -> Result<Vec<Category>> {
        self.repository.get_categories()
    }

    fn get_category_tree(&self) -> Result<CategoryTree> {
        Ok(CategoryTree::build(self.repository.get_categories()?))
    }

    fn get_tree_nodes(&self, query: Option<&str>) -> Result<Vec<CategoryNode>> {
        let tree = self.get_category_tree()?;
        Ok(match query {
            Some(q) => tree.filter(q),
            None => tree.to_nodes(),
        })
    }

    fn get_lineage(&self, id: i32) -> Result<Vec<Category>> {
        Ok(self.get_category_tree()?.lineage(id))
    }

    fn get_picker_levels(&self, path: &[i32]) -> Result<Vec<Vec<Category>>> {
        Ok(self.get_category_tree()?.picker_levels(path))
    }

    fn get_admin_categories(&self) -> Result<Vec<CategoryWithParent>> {
        let categories = self.repository.get_categories()?;
        let names: HashMap<i32, String> = categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let mut items: Vec<CategoryWithParent> = categories
            .into_iter()
            .map(|category| {
                let parent = category.parent_id.and_then(|pid| {
                    names.get(&pid).map(|name| ParentRef {
                        id: pid,
                        name: name.clone(),
                    })
                });
                CategoryWithParent::new(category, parent)
            })
            .collect();

        items.sort_by(Self::admin_cmp);
        Ok(items)
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let category = category.validated()?;
        debug!(
            "Creating category '{}' under {:?}",
            category.name, category.parent_id
        );

        if let Some(parent_id) = category.parent_id {
            if self.repository.get_category(parent_id)?.is_none() {
                return Err(DatabaseError::NotFound(format!(
                    "Parent category {} not found",
                    parent_id
                ))
                .into());
            }
        }

        if self
            .repository
            .find_by_name_and_parent(&category.name, category.parent_id)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "Category '{}' already exists at this level",
                category.name
            )));
        }

        self.repository.create_category(category).await
    }

    async fn seed_categories(&self, tree: &[SeedNode]) -> Result<SeedReport> {
        seed_category_tree(self.repository.as_ref(), tree).await
    }
}
