//! Storage ports.
//!
//! `Store` covers the synchronous CRUD paths; `StoreTx` is the isolated
//! transaction scope checkout runs in. `PgStore` is the production sqlx
//! implementation, `MemStore` backs the test suite.

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{CartItem, CartLine, Category, Order, OrderItem, Product, ProductRating, User};
use crate::error::Result;

/// Filter over the product listing. Criteria combine with AND.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    /// Case-insensitive exact match over the product name.
    pub name: Option<String>,
    /// Case-insensitive substring match over the product name.
    pub search: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewRating {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub total_amount: Option<Decimal>,
    pub paid: bool,
}

#[derive(Clone, Debug)]
pub struct NewOrderItem {
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub price: Decimal,
    pub quantity: i32,
}

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    /// Opens an isolated transaction scope. Dropping the returned
    /// transaction without committing rolls every change back.
    async fn begin(&self) -> Result<Self::Tx>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>>;
    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<ProductRating>>;
    async fn user_has_rated(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;
    async fn insert_rating(&self, rating: NewRating) -> Result<ProductRating>;

    /// Atomic merge-on-add: sums `quantity` into any existing row for this
    /// (user, product) pair and stamps the current product price on the
    /// result, or inserts a fresh row. Returns `None` when the product does
    /// not exist.
    async fn upsert_cart_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>>;

    async fn cart_for_user(&self, user_id: Uuid) -> Result<Vec<CartLine>>;

    /// One user's orders, newest first, each with its items.
    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<(Order, Vec<OrderItem>)>>;
}

#[async_trait]
pub trait StoreTx: Send {
    /// Snapshots and removes the user's cart rows in one step, so the
    /// working set and the deletion cover the same rows by construction.
    async fn drain_cart(&mut self, user_id: Uuid) -> Result<Vec<CartItem>>;

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order>;
    async fn insert_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem>;

    async fn commit(self) -> Result<()>;
}
