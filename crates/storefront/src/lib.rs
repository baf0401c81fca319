//! Shopfront storefront client.
//!
//! Client-side state and data loading for the Shopfront storefront:
//!
//! - [`stores`] - observable auth and cart containers (the cart is persisted)
//! - [`bridge`] - keeps UI components in sync with the containers
//! - [`loaders`] - per-page data loaders backed by the storefront API
//! - [`app`] - composition root that wires everything together
//!
//! Hosts call [`telemetry::init`] once to route logs and errors to Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod loaders;
pub mod storage;
pub mod stores;
pub mod telemetry;

pub use app::{Navigation, PageData, Route, Storefront};
pub use error::PageError;
