//! Catalog entities as exchanged with the collection service.
//!
//! The service speaks PascalCase field names (`ProductId`, `IsActive`, ...),
//! so every wire struct renames its fields accordingly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All backend primary keys are integer identities.
pub type DbId = i64;

/// Maximum length of a product name.
pub const PRODUCT_NAME_MAX_LEN: usize = 150;
/// Maximum length of a product description.
pub const PRODUCT_DESCRIPTION_MAX_LEN: usize = 500;
/// Maximum length of a product SKU.
pub const PRODUCT_SKU_MAX_LEN: usize = 50;

/// A product row returned by the collection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub product_id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    pub category_id: DbId,
    pub is_active: bool,
    /// Denormalized category, present for display only.
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Product {
    /// Category name for display, `-` when the service did not embed it.
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("-", |c| c.name.as_str())
    }
}

/// The embedded category reference carried by a [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryRef {
    #[serde(default)]
    pub category_id: Option<DbId>,
    pub name: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub category_id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub category_id: DbId,
    pub is_active: bool,
}

/// Payload for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Keep only the categories an operator may filter or assign by.
pub fn active_categories(categories: Vec<Category>) -> Vec<Category> {
    categories.into_iter().filter(|c| c.is_active).collect()
}
