//! Domain entities: plain data rows, no behavior attached.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartLine};
pub use order::{Order, OrderItem};
pub use product::{Category, Product, ProductRating};
pub use user::User;
