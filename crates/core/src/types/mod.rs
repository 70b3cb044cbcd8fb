//! Core types for Greenhollow Farms.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod customer;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartItem, StockError};
pub use customer::{CustomerInfo, CustomerInfoError};
pub use id::{OrderId, ProductId};
pub use price::{CurrencyCode, Price};
pub use product::Product;
