//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod id;
pub mod order;
pub mod product;
pub mod user;

pub use id::*;
pub use order::Order;
pub use product::Product;
pub use user::{ProfileResponse, User};
