//! Shopfront Core - Shared data contracts.
//!
//! This crate provides the shapes exchanged with the remote storefront API:
//! - [`Product`] - catalog entries listed and shown on product pages
//! - [`User`] - the server-asserted identity of the current session
//! - [`Order`] - order history entries, opaque to the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! The state containers and loaders live in `shopfront-storefront`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
