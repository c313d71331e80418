//! User intents on cart lines.
//!
//! The view never edits cart data itself. Each button maps to a
//! [`CartAction`], which reads the current line and issues the matching store
//! mutation.

use super::store::{CartError, CartStore};
use crate::types::Quantity;

/// A user interaction on a single cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// "+" button: one more unit.
    Increment { name: String },
    /// "-" button: one fewer unit, removing the line at quantity 1.
    Decrement { name: String },
    /// "Delete" button: drop the line whatever its quantity.
    Remove { name: String },
}

/// What a dispatched [`CartAction`] did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The line is still present with this quantity.
    QuantityChanged { name: String, quantity: Quantity },
    /// The line was removed.
    Removed { name: String },
    /// Nothing matched; the cart is unchanged.
    Unchanged,
}

impl CartAction {
    /// Apply this action to the store.
    ///
    /// # Errors
    ///
    /// Increment and decrement return [`CartError::ItemNotFound`] when the line
    /// is gone (e.g. a stale page). Remove of a missing line is not an error
    /// and yields [`ActionOutcome::Unchanged`].
    pub fn apply(self, store: &mut CartStore) -> Result<ActionOutcome, CartError> {
        match self {
            Self::Increment { name } => {
                let quantity = current_quantity(store, &name)?.increment()?;
                store.update_quantity(&name, quantity)?;
                Ok(ActionOutcome::QuantityChanged { name, quantity })
            }
            Self::Decrement { name } => match current_quantity(store, &name)?.decrement() {
                Some(quantity) => {
                    store.update_quantity(&name, quantity)?;
                    Ok(ActionOutcome::QuantityChanged { name, quantity })
                }
                None => {
                    store.remove_item(&name);
                    Ok(ActionOutcome::Removed { name })
                }
            },
            Self::Remove { name } => Ok(match store.remove_item(&name) {
                Some(_) => ActionOutcome::Removed { name },
                None => ActionOutcome::Unchanged,
            }),
        }
    }
}

fn current_quantity(store: &CartStore, name: &str) -> Result<Quantity, CartError> {
    store
        .cart()
        .get(name)
        .map(|line| line.quantity)
        .ok_or_else(|| CartError::ItemNotFound(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::store::tests::plant;
    use crate::cart::summary::CartSummary;
    use crate::types::CurrencyCode;

    fn store_with(lines: &[(&str, &str, u32)]) -> CartStore {
        let mut store = CartStore::new(CurrencyCode::USD);
        for (name, cost, quantity) in lines {
            store.add_item(plant(name, cost)).unwrap();
            store
                .update_quantity(name, Quantity::new(*quantity).unwrap())
                .unwrap();
        }
        store
    }

    fn subtotal(store: &CartStore, name: &str) -> String {
        let summary = CartSummary::from_cart(store.cart()).unwrap();
        summary
            .lines
            .iter()
            .find(|line| line.name == name)
            .unwrap()
            .subtotal
            .amount_string()
    }

    #[test]
    fn test_increment_adds_one_unit_price_to_subtotal() {
        let mut store = store_with(&[("Tulip", "$3.50", 2)]);
        assert_eq!(subtotal(&store, "Tulip"), "7.00");

        let outcome = CartAction::Increment {
            name: "Tulip".to_string(),
        }
        .apply(&mut store)
        .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::QuantityChanged {
                name: "Tulip".to_string(),
                quantity: Quantity::new(3).unwrap(),
            }
        );
        assert_eq!(subtotal(&store, "Tulip"), "10.50");
    }

    #[test]
    fn test_decrement_above_one_keeps_item() {
        let mut store = store_with(&[("Rose", "$5.00", 2)]);

        CartAction::Decrement {
            name: "Rose".to_string(),
        }
        .apply(&mut store)
        .unwrap();

        assert_eq!(store.cart().get("Rose").unwrap().quantity, Quantity::ONE);
    }

    #[test]
    fn test_decrement_at_one_removes_item() {
        let mut store = store_with(&[("Rose", "$5.00", 1), ("Tulip", "$3.50", 1)]);

        let outcome = CartAction::Decrement {
            name: "Rose".to_string(),
        }
        .apply(&mut store)
        .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Removed {
                name: "Rose".to_string()
            }
        );
        assert!(!store.cart().contains("Rose"));
        assert!(store.cart().contains("Tulip"));
    }

    #[test]
    fn test_remove_regardless_of_quantity() {
        let mut store = store_with(&[("Rose", "$5.00", 9)]);

        CartAction::Remove {
            name: "Rose".to_string(),
        }
        .apply(&mut store)
        .unwrap();

        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_remove_missing_is_unchanged() {
        let mut store = store_with(&[]);
        let outcome = CartAction::Remove {
            name: "Rose".to_string(),
        }
        .apply(&mut store)
        .unwrap();
        assert_eq!(outcome, ActionOutcome::Unchanged);
    }

    #[test]
    fn test_increment_and_decrement_missing_item() {
        let mut store = store_with(&[]);
        for action in [
            CartAction::Increment {
                name: "Rose".to_string(),
            },
            CartAction::Decrement {
                name: "Rose".to_string(),
            },
        ] {
            assert_eq!(
                action.apply(&mut store),
                Err(CartError::ItemNotFound("Rose".to_string()))
            );
        }
    }
}
