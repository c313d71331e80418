//! Paradise Nursery Core - Cart domain library.
//!
//! This crate provides the cart model shared by the storefront:
//! - [`types`] - Newtype wrappers for prices, quantities, and cart IDs
//! - [`cart`] - The cart store, user intents, and derived totals
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no HTTP,
//! no rendering. The storefront owns one [`cart::CartStore`] per session and
//! renders views from its snapshots.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::*;
pub use types::*;
