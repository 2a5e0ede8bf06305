//! Repository implementation for products.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;

use storefront_core::products::{
    NewProduct, Product, ProductFilter, ProductRepositoryTrait, ProductUpdate,
};
use storefront_core::Result;

use super::model::{NewProductDB, ProductChangesetDB, ProductDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::products;
use crate::utils::{chunk_for_sqlite, sorted_ids};

pub struct ProductRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    /// Stock and name filters plus newest-first ordering; the category
    /// restriction is added per chunk by the caller.
    fn filtered_query(filter: &ProductFilter) -> products::BoxedQuery<'static, Sqlite> {
        let mut query = products::table.into_boxed();
        if filter.in_stock_only {
            query = query.filter(products::in_stock.eq(true));
        }
        if let Some(search) = &filter.search {
            // LIKE is case-insensitive for ASCII in SQLite.
            query = query.filter(products::name.like(like_pattern(search)).escape('\\'));
        }
        query.order((products::created_at.desc(), products::id.desc()))
    }
}

fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;

        let Some(category_ids) = &filter.category_ids else {
            let results = Self::filtered_query(filter)
                .load::<ProductDB>(&mut conn)
                .map_err(StorageError::from)?;
            return Ok(results.into_iter().map(Product::from).collect());
        };

        let ids = sorted_ids(category_ids);
        let mut results: Vec<ProductDB> = Vec::new();
        for chunk in chunk_for_sqlite(&ids) {
            let rows = Self::filtered_query(filter)
                .filter(products::category_id.eq_any(chunk.to_vec()))
                .load::<ProductDB>(&mut conn)
                .map_err(StorageError::from)?;
            results.extend(rows);
        }
        // Chunks are each ordered; merge them back into one newest-first list.
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(results.into_iter().map(Product::from).collect())
    }

    fn get_product(&self, id: i32) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let result = products::table
            .find(id)
            .first::<ProductDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(Product::from))
    }

    fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let result = products::table
            .filter(products::slug.eq(slug))
            .first::<ProductDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(result.map(Product::from))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Product> {
                let db = NewProductDB::new(product, chrono::Utc::now().naive_utc());
                let result = diesel::insert_into(products::table)
                    .values(&db)
                    .returning(ProductDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Product::from(result))
            })
            .await
    }

    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<Product> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Product> {
                let changes = ProductChangesetDB::new(update, chrono::Utc::now().naive_utc());
                let result = diesel::update(products::table.find(id))
                    .set(&changes)
                    .returning(ProductDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Product::from(result))
            })
            .await
    }

    async fn delete_product(&self, id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(products::table.find(id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryRepository;
    use crate::db::{create_pool, init, run_migrations, spawn_writer};
    use std::collections::HashSet;
    use storefront_core::categories::{CategoryRepositoryTrait, NewCategory};
    use storefront_core::errors::{DatabaseError, Error};
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        products: ProductRepository,
        categories: CategoryRepository,
    }

    fn setup() -> Fixture {
        let dir = tempdir().unwrap();
        let db_path = init(dir.path().join("products.db").to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer((*pool).clone());
        Fixture {
            _dir: dir,
            products: ProductRepository::new(pool.clone(), writer.clone()),
            categories: CategoryRepository::new(pool, writer),
        }
    }

    fn new_product(slug: &str, category_id: Option<i32>) -> NewProduct {
        NewProduct {
            name: slug.replace('-', " "),
            slug: slug.to_string(),
            price_cents: 1999,
            quantity: 3,
            description: String::new(),
            image: String::new(),
            in_stock: true,
            category_id,
        }
    }

    fn ids(products: &[Product]) -> HashSet<i32> {
        products.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_list_filters_by_category_set_and_stock() {
        let f = setup();
        let lighting = f
            .categories
            .create_category(NewCategory::new("Lighting", None))
            .await
            .unwrap();
        let indoor = f
            .categories
            .create_category(NewCategory::new("Indoor", Some(lighting.id)))
            .await
            .unwrap();

        let p1 = f
            .products
            .create_product(new_product("pendant", Some(indoor.id)))
            .await
            .unwrap();
        let p2 = f
            .products
            .create_product(new_product("floor-lamp", Some(lighting.id)))
            .await
            .unwrap();
        let p3 = f
            .products
            .create_product(NewProduct {
                in_stock: false,
                ..new_product("sold-out", Some(indoor.id))
            })
            .await
            .unwrap();

        let scoped = f
            .products
            .list_products(&ProductFilter {
                category_ids: Some(HashSet::from([lighting.id, indoor.id])),
                search: None,
                in_stock_only: true,
            })
            .unwrap();
        assert_eq!(ids(&scoped), HashSet::from([p1.id, p2.id]));

        let everything = f.products.list_products(&ProductFilter::default()).unwrap();
        assert_eq!(ids(&everything), HashSet::from([p1.id, p2.id, p3.id]));
        // Newest first.
        assert_eq!(everything[0].id, p3.id);

        let empty_scope = f
            .products
            .list_products(&ProductFilter {
                category_ids: Some(HashSet::new()),
                ..ProductFilter::default()
            })
            .unwrap();
        assert!(empty_scope.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_large_category_set() {
        let f = setup();
        let root = f
            .categories
            .create_category(NewCategory::new("Root", None))
            .await
            .unwrap();
        let p = f
            .products
            .create_product(new_product("only", Some(root.id)))
            .await
            .unwrap();

        let mut scope: HashSet<i32> = (10_000..11_200).collect();
        scope.insert(root.id);
        let listed = f
            .products
            .list_products(&ProductFilter {
                category_ids: Some(scope),
                ..ProductFilter::default()
            })
            .unwrap();
        assert_eq!(ids(&listed), HashSet::from([p.id]));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_literal() {
        let f = setup();
        f.products
            .create_product(NewProduct {
                name: "LED Floor Lamp".to_string(),
                ..new_product("led-floor-lamp", None)
            })
            .await
            .unwrap();
        f.products
            .create_product(NewProduct {
                name: "100% Brass Sconce".to_string(),
                ..new_product("brass-sconce", None)
            })
            .await
            .unwrap();

        let search = |q: &str| {
            f.products
                .list_products(&ProductFilter {
                    search: Some(q.to_string()),
                    ..ProductFilter::default()
                })
                .unwrap()
                .len()
        };
        assert_eq!(search("floor lamp"), 1);
        assert_eq!(search("%"), 1);
        assert_eq!(search("_"), 0);
    }

    #[tokio::test]
    async fn test_slug_unique_update_and_delete() {
        let f = setup();
        let created = f
            .products
            .create_product(new_product("lamp", None))
            .await
            .unwrap();
        let err = f
            .products
            .create_product(new_product("lamp", None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));

        let updated = f
            .products
            .update_product(
                created.id,
                ProductUpdate {
                    name: "Desk Lamp".to_string(),
                    slug: "desk-lamp".to_string(),
                    price_cents: 2599,
                    quantity: 0,
                    description: "Brushed metal".to_string(),
                    image: "/images/desk-lamp.jpg".to_string(),
                    in_stock: false,
                    category_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "desk-lamp");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(
            f.products.get_product_by_slug("desk-lamp").unwrap(),
            Some(updated)
        );

        assert_eq!(f.products.delete_product(created.id).await.unwrap(), 1);
        assert_eq!(f.products.delete_product(created.id).await.unwrap(), 0);
        assert_eq!(f.products.get_product(created.id).unwrap(), None);
    }
}
