//! Database models for products.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use storefront_core::products::{NewProduct, Product, ProductUpdate};

/// Database model for products
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ProductDB {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub description: String,
    pub image: String,
    pub in_stock: bool,
    pub category_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new product
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProductDB {
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub description: String,
    pub image: String,
    pub in_stock: bool,
    pub category_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable columns of a product. `category_id` is always written so an
/// edit can clear it.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangesetDB {
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub description: String,
    pub image: String,
    pub in_stock: bool,
    pub category_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            slug: db.slug,
            price_cents: db.price_cents,
            quantity: db.quantity,
            description: db.description,
            image: db.image,
            in_stock: db.in_stock,
            category_id: db.category_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl NewProductDB {
    pub fn new(product: NewProduct, now: NaiveDateTime) -> Self {
        Self {
            name: product.name,
            slug: product.slug,
            price_cents: product.price_cents,
            quantity: product.quantity,
            description: product.description,
            image: product.image,
            in_stock: product.in_stock,
            category_id: product.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductChangesetDB {
    pub fn new(update: ProductUpdate, now: NaiveDateTime) -> Self {
        Self {
            name: update.name,
            slug: update.slug,
            price_cents: update.price_cents,
            quantity: update.quantity,
            description: update.description,
            image: update.image,
            in_stock: update.in_stock,
            category_id: update.category_id,
            updated_at: now,
        }
    }
}
