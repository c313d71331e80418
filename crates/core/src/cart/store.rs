//! Cart store: the single source of truth for a session's cart.
//!
//! All writes go through [`CartStore::add_item`], [`CartStore::update_quantity`],
//! and [`CartStore::remove_item`]. Each successful write notifies every
//! subscribed [`CartObserver`] with the new cart before returning, so a view
//! always re-renders from a state where the write has fully applied.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{CartLineItem, NewCartItem};
use crate::types::{CurrencyCode, Quantity, QuantityError};

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line item with this name is in the cart.
    #[error("item not in cart: {0}")]
    ItemNotFound(String),

    /// The item is priced in a different currency than the cart.
    #[error("cart is priced in {expected}, item is priced in {found}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    /// The requested quantity is not valid.
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// An ordered collection of line items in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    currency_code: CurrencyCode,
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new(currency_code: CurrencyCode) -> Self {
        Self {
            currency_code,
            items: Vec::new(),
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line item by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Whether an item with this name is in the cart.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// The currency every line is priced in.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }
}

/// Receives the new cart after every successful store mutation.
pub trait CartObserver: Send + Sync {
    /// Called synchronously from inside the mutating call.
    fn cart_changed(&self, cart: &Cart);
}

/// Handle returned by [`CartStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns a [`Cart`] and notifies observers when it changes.
pub struct CartStore {
    cart: Cart,
    observers: Vec<(SubscriptionId, Arc<dyn CartObserver>)>,
    next_subscription: u64,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// Create a store holding an empty cart.
    #[must_use]
    pub const fn new(currency_code: CurrencyCode) -> Self {
        Self {
            cart: Cart::new(currency_code),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read access to the current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// Register an observer. It is not called until the next mutation.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if the ID was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity incremented; otherwise a
    /// new line is appended with quantity 1. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in
    /// another currency, or [`CartError::Quantity`] if the line is already at
    /// the maximum quantity.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<Quantity, CartError> {
        let found = item.unit_price.currency_code();
        if found != self.cart.currency_code {
            return Err(CartError::CurrencyMismatch {
                expected: self.cart.currency_code,
                found,
            });
        }

        let quantity = if let Some(line) = self
            .cart
            .items
            .iter_mut()
            .find(|line| line.name == item.name)
        {
            line.quantity = line.quantity.increment()?;
            line.quantity
        } else {
            self.cart.items.push(CartLineItem::from(item));
            Quantity::ONE
        };

        self.notify();
        Ok(quantity)
    }

    /// Set the quantity of a line already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this name.
    pub fn update_quantity(&mut self, name: &str, quantity: Quantity) -> Result<(), CartError> {
        let line = self
            .cart
            .items
            .iter_mut()
            .find(|line| line.name == name)
            .ok_or_else(|| CartError::ItemNotFound(name.to_string()))?;
        line.quantity = quantity;

        self.notify();
        Ok(())
    }

    /// Remove a line regardless of its quantity.
    ///
    /// Returns the removed line, or `None` if it was not in the cart. Observers
    /// are only notified when something was removed.
    pub fn remove_item(&mut self, name: &str) -> Option<CartLineItem> {
        let index = self.cart.position(name)?;
        let removed = self.cart.items.remove(index);

        self.notify();
        Some(removed)
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer.cart_changed(&self.cart);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::Price;

    pub(crate) fn plant(name: &str, cost: &str) -> NewCartItem {
        NewCartItem {
            name: name.to_string(),
            image: format!("https://example.com/{name}.jpg"),
            unit_price: Price::parse(cost, CurrencyCode::USD).unwrap(),
        }
    }

    /// Records the item names seen on each notification.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) seen: Mutex<Vec<Vec<(String, u32)>>>,
    }

    impl CartObserver for Recorder {
        fn cart_changed(&self, cart: &Cart) {
            let lines = cart
                .items()
                .iter()
                .map(|item| (item.name.clone(), item.quantity.get()))
                .collect();
            self.seen.lock().unwrap().push(lines);
        }
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let mut store = CartStore::new(CurrencyCode::USD);
        assert_eq!(store.add_item(plant("Rose", "$5.00")).unwrap(), Quantity::ONE);
        assert_eq!(store.add_item(plant("Tulip", "$3.50")).unwrap(), Quantity::ONE);

        let names: Vec<_> = store.cart().items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Rose", "Tulip"]);
    }

    #[test]
    fn test_add_existing_item_increments_instead_of_duplicating() {
        let mut store = CartStore::new(CurrencyCode::USD);
        store.add_item(plant("Rose", "$5.00")).unwrap();
        store.add_item(plant("Tulip", "$3.50")).unwrap();
        let quantity = store.add_item(plant("Rose", "$5.00")).unwrap();

        assert_eq!(quantity.get(), 2);
        assert_eq!(store.cart().len(), 2);
        assert_eq!(store.cart().items()[0].name, "Rose");
        assert_eq!(store.cart().total_quantity(), 3);
    }

    #[test]
    fn test_add_rejects_other_currency() {
        let mut store = CartStore::new(CurrencyCode::USD);
        let item = NewCartItem {
            name: "Fern".to_string(),
            image: String::new(),
            unit_price: Price::parse("€2.00", CurrencyCode::EUR).unwrap(),
        };

        assert_eq!(
            store.add_item(item),
            Err(CartError::CurrencyMismatch {
                expected: CurrencyCode::USD,
                found: CurrencyCode::EUR,
            })
        );
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut store = CartStore::new(CurrencyCode::USD);
        store.add_item(plant("Rose", "$5.00")).unwrap();
        store
            .update_quantity("Rose", Quantity::new(7).unwrap())
            .unwrap();

        assert_eq!(store.cart().get("Rose").unwrap().quantity.get(), 7);
    }

    #[test]
    fn test_update_quantity_missing_item() {
        let mut store = CartStore::new(CurrencyCode::USD);
        assert_eq!(
            store.update_quantity("Rose", Quantity::ONE),
            Err(CartError::ItemNotFound("Rose".to_string()))
        );
    }

    #[test]
    fn test_remove_item_regardless_of_quantity() {
        let mut store = CartStore::new(CurrencyCode::USD);
        store.add_item(plant("Rose", "$5.00")).unwrap();
        store
            .update_quantity("Rose", Quantity::new(5).unwrap())
            .unwrap();

        let removed = store.remove_item("Rose").unwrap();
        assert_eq!(removed.quantity.get(), 5);
        assert!(!store.cart().contains("Rose"));
        assert!(store.remove_item("Rose").is_none());
    }

    #[test]
    fn test_observers_notified_once_per_successful_mutation() {
        let mut store = CartStore::new(CurrencyCode::USD);
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        store.add_item(plant("Rose", "$5.00")).unwrap();
        store
            .update_quantity("Rose", Quantity::new(3).unwrap())
            .unwrap();
        store.remove_item("Rose");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                vec![("Rose".to_string(), 1)],
                vec![("Rose".to_string(), 3)],
                vec![],
            ]
        );
    }

    #[test]
    fn test_observers_not_notified_on_failure() {
        let mut store = CartStore::new(CurrencyCode::USD);
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        let _ = store.update_quantity("Rose", Quantity::ONE);
        let _ = store.remove_item("Rose");

        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = CartStore::new(CurrencyCode::USD);
        let recorder = Arc::new(Recorder::default());
        let id = store.subscribe(recorder.clone());

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        store.add_item(plant("Rose", "$5.00")).unwrap();
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = CartStore::new(CurrencyCode::USD);
        store.add_item(plant("Rose", "$5.00")).unwrap();
        let snapshot = store.snapshot();
        store.remove_item("Rose");

        assert!(snapshot.contains("Rose"));
        assert!(store.cart().is_empty());
    }
}
