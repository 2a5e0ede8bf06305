use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use storefront_core::categories as core_categories;
use storefront_core::products as core_products;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<core_categories::Category> for Category {
    fn from(c: core_categories::Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            parent_id: c.parent_id,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl From<NewCategory> for core_categories::NewCategory {
    fn from(c: NewCategory) -> Self {
        core_categories::NewCategory::new(c.name, c.parent_id)
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub id: i32,
    pub name: String,
}

/// Back-office row: the category, its parent, and a "Parent → Name" label.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminCategory {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub parent: Option<ParentRef>,
    pub label: String,
}

impl From<core_categories::CategoryWithParent> for AdminCategory {
    fn from(c: core_categories::CategoryWithParent) -> Self {
        Self {
            id: c.category.id,
            name: c.category.name,
            parent_id: c.category.parent_id,
            parent: c.parent.map(|p| ParentRef {
                id: p.id,
                name: p.name,
            }),
            label: c.label,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub children: Vec<CategoryNode>,
}

impl From<core_categories::CategoryNode> for CategoryNode {
    fn from(n: core_categories::CategoryNode) -> Self {
        Self {
            id: n.id,
            name: n.name,
            parent_id: n.parent_id,
            children: n.children.into_iter().map(CategoryNode::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
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

impl From<core_products::Product> for Product {
    fn from(p: core_products::Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            price_cents: p.price_cents,
            quantity: p.quantity,
            description: p.description,
            image: p.image,
            in_stock: p.in_stock,
            category_id: p.category_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Product page payload: the product plus its category breadcrumb, root first.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub breadcrumb: Vec<Category>,
}

impl From<core_products::ProductDetail> for ProductDetail {
    fn from(d: core_products::ProductDetail) -> Self {
        Self {
            product: Product::from(d.product),
            breadcrumb: d.breadcrumb.into_iter().map(Category::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub category_id: Option<i32>,
}

fn default_in_stock() -> bool {
    true
}

impl From<NewProduct> for core_products::NewProduct {
    fn from(p: NewProduct) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            price_cents: p.price_cents,
            quantity: p.quantity,
            description: p.description,
            image: p.image,
            in_stock: p.in_stock,
            category_id: p.category_id,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub quantity: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub in_stock: bool,
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl From<ProductUpdate> for core_products::ProductUpdate {
    fn from(p: ProductUpdate) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            price_cents: p.price_cents,
            quantity: p.quantity,
            description: p.description,
            image: p.image,
            in_stock: p.in_stock,
            category_id: p.category_id,
        }
    }
}
