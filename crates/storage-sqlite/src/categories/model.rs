//! Database models for categories.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for categories
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CategoryDB {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

/// Database model for creating a new category
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryDB {
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<CategoryDB> for storefront_core::categories::Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            parent_id: db.parent_id,
        }
    }
}

impl From<storefront_core::categories::NewCategory> for NewCategoryDB {
    fn from(domain: storefront_core::categories::NewCategory) -> Self {
        Self {
            name: domain.name,
            parent_id: domain.parent_id,
        }
    }
}
