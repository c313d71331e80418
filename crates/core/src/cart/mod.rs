//! The shopping cart.
//!
//! - [`CartStore`] owns the ordered line items and is the only write surface.
//! - [`CartAction`] turns a user interaction into a store mutation.
//! - [`CartSummary`] derives subtotals and the total from a [`Cart`] snapshot.

pub mod action;
pub mod item;
pub mod store;
pub mod summary;

pub use action::{ActionOutcome, CartAction};
pub use item::{CartLineItem, NewCartItem};
pub use store::{Cart, CartError, CartObserver, CartStore, SubscriptionId};
pub use summary::{CartSummary, LineSummary};
