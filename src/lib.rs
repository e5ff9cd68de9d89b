//! Glowcart - skincare shop backend
//!
//! ## Features
//! - Product catalog with aggregate ratings
//! - Per-user cart with idempotent merge-on-add
//! - Atomic cart-to-order checkout
//! - Per-user order history

pub mod domain;
pub mod error;
pub mod http;
pub mod service;
pub mod store;

pub use error::{Error, Result};
