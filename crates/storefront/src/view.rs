//! Cart display data for templates.
//!
//! A [`CartView`] is rebuilt from a cart snapshot for every render; it holds
//! only formatted strings. [`CartViewPublisher`] is the store observer that
//! rebuilds the view after each mutation and publishes it to live subscribers.

use paradise_nursery_core::{Cart, CartObserver, CartSummary, CurrencyCode, Price, PriceError};
use tokio::sync::watch;

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Unit price, e.g. `$5.00`.
    pub price: String,
    /// Line subtotal, e.g. `$10.00`.
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Total cart amount, e.g. `$13.50`.
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            total: Price::zero(currency).display(),
            item_count: 0,
        }
    }

    /// Derive subtotals and total from a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if an amount does not fit in a decimal.
    pub fn from_cart(cart: &Cart) -> Result<Self, PriceError> {
        let summary = CartSummary::from_cart(cart)?;
        Ok(Self::from(&summary))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checkout is unavailable while the cart is empty.
    #[must_use]
    pub fn checkout_disabled(&self) -> bool {
        self.is_empty()
    }
}

impl From<&CartSummary> for CartView {
    fn from(summary: &CartSummary) -> Self {
        Self {
            items: summary
                .lines
                .iter()
                .map(|line| CartItemView {
                    name: line.name.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity.get(),
                    price: line.unit_price.display(),
                    line_price: line.subtotal.display(),
                })
                .collect(),
            total: summary.total.display(),
            item_count: summary.item_count,
        }
    }
}

/// Store observer that republishes a fresh [`CartView`] on every change.
///
/// Subscribers hold the receiving end of a `watch` channel, so a slow reader
/// only ever sees the latest view.
pub struct CartViewPublisher {
    sender: watch::Sender<CartView>,
}

impl CartViewPublisher {
    #[must_use]
    pub const fn new(sender: watch::Sender<CartView>) -> Self {
        Self { sender }
    }
}

impl CartObserver for CartViewPublisher {
    fn cart_changed(&self, cart: &Cart) {
        match CartView::from_cart(cart) {
            Ok(view) => {
                self.sender.send_replace(view);
            }
            Err(e) => tracing::warn!("Failed to rebuild cart view: {e}"),
        }
    }
}
