//! Derived cart values.
//!
//! Nothing here is cached on the store; a summary is rebuilt from each
//! snapshot the view renders.

use crate::types::{Price, PriceError, Quantity};

use super::store::Cart;

/// Per-line figures for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSummary {
    pub name: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: Quantity,
    /// `quantity x unit_price`, rounded to two decimal places.
    pub subtotal: Price,
}

/// Subtotals and total for a whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<LineSummary>,
    /// Sum of the rounded line subtotals.
    pub total: Price,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartSummary {
    /// Compute line subtotals and the cart total.
    ///
    /// The total is the sum of the already-rounded subtotals, so it always
    /// matches the figures shown on each line.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if an amount does not fit in a decimal.
    pub fn from_cart(cart: &Cart) -> Result<Self, PriceError> {
        let mut total = Price::zero(cart.currency_code());
        let mut lines = Vec::with_capacity(cart.len());

        for item in cart.items() {
            let subtotal = item.unit_price.times(item.quantity)?.rounded();
            total = total.checked_add(&subtotal)?;
            lines.push(LineSummary {
                name: item.name.clone(),
                image: item.image.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                subtotal,
            });
        }

        Ok(Self {
            lines,
            total,
            item_count: cart.total_quantity(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
