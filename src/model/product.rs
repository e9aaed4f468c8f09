//! Product catalog entities.

use crate::model::identifiers::ProductId;
use serde::{Deserialize, Serialize};

/// One row of the products list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Whether the product is visible in the storefront.
    pub available: bool,
    /// Unit price in the shop currency.
    pub price: f64,
    /// Units in stock.
    pub quantity: u32,
    /// Average customer rating, 0.0 to 5.0.
    pub rating: f64,
    /// Units sold to date.
    pub sold_items: u64,
    /// Category names this product belongs to.
    pub categories: Vec<String>,
}

/// Editable subset of a product, sent to and echoed by the update endpoint.
///
/// The endpoint returns the fields it actually persisted; the feed patches
/// only these into the matching row, leaving rating, sold count, and
/// categories untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    /// New display name.
    pub name: String,
    /// New unit price.
    pub price: f64,
    /// New stock quantity.
    pub quantity: u32,
}

impl ProductPatch {
    /// Local validation before any request is issued.
    ///
    /// Rejects an empty name and a negative price; quantity is unsigned by
    /// construction.
    pub fn validate(&self) -> Result<(), crate::model::FeedError> {
        if self.name.trim().is_empty() {
            return Err(crate::model::FeedError::Validation {
                message: "product name cannot be empty".to_string(),
            });
        }
        if self.price < 0.0 {
            return Err(crate::model::FeedError::Validation {
                message: "product price cannot be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Apply this patch to a product row in place.
    pub fn apply_to(&self, product: &mut ProductSummary) {
        product.name = self.name.clone();
        product.price = self.price;
        product.quantity = self.quantity;
    }
}
