//! Domain models for products.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::categories::{validate_name, Category};
use crate::errors::{Result, ValidationError};

/// A sellable product, optionally filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Used in storefront URLs: /products/{slug}
    pub slug: String,
    /// In cents, e.g. 1999 is $19.99
    pub price_cents: i64,
    pub quantity: i32,
    pub description: String,
    pub image: String,
    pub in_stock: bool,
    pub category_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

impl NewProduct {
    /// Trims text fields and checks the shape of every value.
    pub fn validated(mut self) -> Result<Self> {
        self.name = validate_name(&self.name)?;
        self.slug = validate_slug(&self.slug)?;
        validate_amounts(self.price_cents, self.quantity)?;
        self.description = self.description.trim().to_string();
        self.image = self.image.trim().to_string();
        Ok(self)
    }
}

/// Full replacement of a product's editable fields (admin edit form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

impl ProductUpdate {
    pub fn validated(mut self) -> Result<Self> {
        self.name = validate_name(&self.name)?;
        self.slug = validate_slug(&self.slug)?;
        validate_amounts(self.price_cents, self.quantity)?;
        self.description = self.description.trim().to_string();
        self.image = self.image.trim().to_string();
        Ok(self)
    }
}

/// Listing parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Selected category; products in it or any descendant match.
    pub category_id: Option<i32>,
    /// Case-insensitive name search.
    pub search: Option<String>,
    #[serde(default)]
    pub in_stock_only: bool,
}

impl ProductQuery {
    pub fn storefront(category_id: Option<i32>, search: Option<String>) -> Self {
        Self {
            category_id,
            search,
            in_stock_only: true,
        }
    }
}

/// Resolved filter handed to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// `None` means no category restriction.
    pub category_ids: Option<HashSet<i32>>,
    pub search: Option<String>,
    pub in_stock_only: bool,
}

/// A product together with the root-first path of its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub breadcrumb: Vec<Category>,
}

/// Lowercase letters, digits and single dashes.
pub fn validate_slug(slug: &str) -> Result<String> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(ValidationError::MissingField("slug".to_string()).into());
    }
    let well_formed = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");
    if !well_formed {
        return Err(ValidationError::InvalidInput(format!(
            "Invalid slug '{}': use lowercase letters, digits and dashes",
            slug
        ))
        .into());
    }
    Ok(slug.to_string())
}

fn validate_amounts(price_cents: i64, quantity: i32) -> Result<()> {
    if price_cents < 0 {
        return Err(ValidationError::InvalidInput("Price cannot be negative".to_string()).into());
    }
    if quantity < 0 {
        return Err(
            ValidationError::InvalidInput("Quantity cannot be negative".to_string()).into(),
        );
    }
    Ok(())
}
