//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Quantity};

/// One product entry in the cart, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product name. Unique within a cart.
    pub name: String,
    /// URL of the product image.
    pub image: String,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Units in the cart.
    pub quantity: Quantity,
}

/// A product being added to the cart for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub name: String,
    pub image: String,
    pub unit_price: Price,
}

impl From<NewCartItem> for CartLineItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            name: item.name,
            image: item.image,
            unit_price: item.unit_price,
            quantity: Quantity::ONE,
        }
    }
}
