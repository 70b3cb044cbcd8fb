//! Greenhollow Core - Shared types library.
//!
//! This crate provides the domain types used across the Greenhollow Farms
//! components:
//! - `storefront` - Public-facing farm shop site
//! - `integration-tests` - HTTP-level tests over the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and their pure operations - no I/O, no
//! storage, no HTTP clients. The cart's arithmetic and invariants live here
//! so they can be tested without a runtime; persistence and synchronization
//! are layered on top in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Products, cart state, prices, ids, and customer details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
