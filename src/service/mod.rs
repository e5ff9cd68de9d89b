//! Core operations, independent of the HTTP transport. Every operation
//! takes the storage port and the acting user as explicit arguments.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod rating;
