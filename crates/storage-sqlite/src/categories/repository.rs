//! Repository implementation for categories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use storefront_core::categories::{Category, CategoryRepositoryTrait, NewCategory};
use storefront_core::Result;

use super::model::{CategoryDB, NewCategoryDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_categories(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let results = categories::table
            .order((categories::parent_id.asc(), categories::name.asc()))
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Category::from).collect())
    }

    fn get_category(&self, id: i32) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let result = categories::table
            .find(id)
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(result.map(Category::from))
    }

    fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i32>,
    ) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table
            .filter(categories::name.eq(name))
            .select(CategoryDB::as_select())
            .into_boxed();
        query = match parent_id {
            Some(pid) => query.filter(categories::parent_id.eq(pid)),
            None => query.filter(categories::parent_id.is_null()),
        };
        let result = query
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(result.map(Category::from))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let db: NewCategoryDB = category.into();
                let result = diesel::insert_into(categories::table)
                    .values(&db)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                debug!("Inserted category {} '{}'", result.id, result.name);
                Ok(Category::from(result))
            })
            .await
    }
}
