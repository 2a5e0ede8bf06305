//! In-memory category repository shared by unit tests.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Category, CategoryRepositoryTrait, NewCategory};
use crate::errors::{DatabaseError, Result};

pub(crate) struct MockCategoryRepository {
    categories: RwLock<Vec<Category>>,
    creates_left: RwLock<usize>,
    hidden_lookups: RwLock<HashSet<String>>,
    fail_reads: RwLock<bool>,
}

impl Default for MockCategoryRepository {
    fn default() -> Self {
        Self {
            categories: RwLock::new(Vec::new()),
            creates_left: RwLock::new(usize::MAX),
            hidden_lookups: RwLock::new(HashSet::new()),
            fail_reads: RwLock::new(false),
        }
    }
}

impl MockCategoryRepository {
    pub(crate) fn with_categories(categories: Vec<Category>) -> Self {
        let repo = Self::default();
        *repo.categories.write().unwrap() = categories;
        repo
    }

    pub(crate) fn snapshot(&self) -> Vec<Category> {
        self.categories.read().unwrap().clone()
    }

    /// Lets `n` more creates succeed, then fails every create.
    pub(crate) fn fail_creates_after(&self, n: usize) {
        *self.creates_left.write().unwrap() = n;
    }

    /// Makes the next name lookup for `name` miss, simulating a concurrent
    /// writer that inserts between lookup and create.
    pub(crate) fn hide_next_lookup(&self, name: &str) {
        self.hidden_lookups
            .write()
            .unwrap()
            .insert(name.to_string());
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        *self.fail_reads.write().unwrap() = fail;
    }

    fn check_reads(&self) -> Result<()> {
        if *self.fail_reads.read().unwrap() {
            return Err(DatabaseError::ConnectionFailed("unavailable".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepositoryTrait for MockCategoryRepository {
    fn get_categories(&self) -> Result<Vec<Category>> {
        self.check_reads()?;
        let mut all = self.snapshot();
        all.sort_by(|a, b| {
            a.parent_id
                .cmp(&b.parent_id)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(all)
    }

    fn get_category(&self, id: i32) -> Result<Option<Category>> {
        self.check_reads()?;
        Ok(self.snapshot().into_iter().find(|c| c.id == id))
    }

    fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i32>,
    ) -> Result<Option<Category>> {
        self.check_reads()?;
        if self.hidden_lookups.write().unwrap().remove(name) {
            return Ok(None);
        }
        Ok(self
            .snapshot()
            .into_iter()
            .find(|c| c.name == name && c.parent_id == parent_id))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        {
            let mut left = self.creates_left.write().unwrap();
            if *left == 0 {
                return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
            }
            *left -= 1;
        }

        let mut categories = self.categories.write().unwrap();
        if categories
            .iter()
            .any(|c| c.name == category.name && c.parent_id == category.parent_id)
        {
            return Err(DatabaseError::UniqueViolation(
                "UNIQUE constraint failed: categories.name, categories.parent_id".to_string(),
            )
            .into());
        }
        let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = Category::new(id, category.name, category.parent_id);
        categories.push(created.clone());
        Ok(created)
    }
}
