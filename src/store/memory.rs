//! In-memory implementation of the storage ports, used by the test suite.
//!
//! All state sits behind one async mutex; a transaction holds the lock for
//! its whole lifetime and keeps an undo copy, so commit/rollback semantics
//! match the Postgres store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::{
    CartItem, CartLine, Category, Order, OrderItem, Product, ProductRating, User,
};
use crate::error::Result;
use crate::store::{NewOrder, NewOrderItem, NewRating, ProductFilter, Store, StoreTx};

#[derive(Clone, Debug, Default)]
struct State {
    users: Vec<User>,
    products: Vec<Product>,
    ratings: Vec<ProductRating>,
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(
        &self,
        username: &str,
        first_name: &str,
        email: &str,
        address: &str,
    ) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: first_name.into(),
            email: email.into(),
            address: address.into(),
            created: Utc::now(),
        };
        self.state.lock().await.users.push(user.clone());
        user
    }

    pub async fn add_product(
        &self,
        name: &str,
        price: Decimal,
        stock: i32,
        category: Category,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            price,
            stock,
            category,
            created: now,
            updated: now,
        };
        self.state.lock().await.products.push(product.clone());
        product
    }

    pub async fn set_product_price(&self, id: Uuid, price: Decimal) {
        let mut state = self.state.lock().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.id == id) {
            product.price = price;
            product.updated = Utc::now();
        }
    }
}

#[async_trait]
impl Store for MemStore {
    type Tx = MemTx;

    async fn begin(&self) -> Result<MemTx> {
        let guard = self.state.clone().lock_owned().await;
        let undo = guard.clone();
        Ok(MemTx {
            guard,
            undo: Some(undo),
        })
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let state = self.state.lock().await;
        // Insertion order is creation order; newest first.
        Ok(state
            .products
            .iter()
            .rev()
            .filter(|p| {
                filter.category.map_or(true, |c| p.category == c)
                    && filter
                        .name
                        .as_deref()
                        .map_or(true, |n| p.name.eq_ignore_ascii_case(n))
                    && filter
                        .search
                        .as_deref()
                        .map_or(true, |s| p.name.to_lowercase().contains(&s.to_lowercase()))
            })
            .cloned()
            .collect())
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<ProductRating>> {
        let state = self.state.lock().await;
        Ok(state
            .ratings
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn user_has_rated(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .ratings
            .iter()
            .any(|r| r.user_id == user_id && r.product_id == product_id))
    }

    async fn insert_rating(&self, rating: NewRating) -> Result<ProductRating> {
        let row = ProductRating {
            id: Uuid::new_v4(),
            user_id: rating.user_id,
            product_id: rating.product_id,
            rating: rating.rating,
            comment: rating.comment,
            created: Utc::now(),
        };
        self.state.lock().await.ratings.push(row.clone());
        Ok(row)
    }

    async fn upsert_cart_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let mut state = self.state.lock().await;
        let Some(price) = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.price)
        else {
            return Ok(None);
        };
        if let Some(existing) = state
            .cart_items
            .iter_mut()
            .find(|c| c.user_id == user_id && c.product_id == product_id)
        {
            existing.quantity += quantity;
            existing.price = price;
            return Ok(Some(existing.clone()));
        }
        let item = CartItem {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            price,
            quantity,
            created: Utc::now(),
        };
        state.cart_items.push(item.clone());
        Ok(Some(item))
    }

    async fn cart_for_user(&self, user_id: Uuid) -> Result<Vec<CartLine>> {
        let state = self.state.lock().await;
        Ok(state
            .cart_items
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| CartLine {
                id: c.id,
                user_id: c.user_id,
                product_id: c.product_id,
                product_name: state
                    .products
                    .iter()
                    .find(|p| p.id == c.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                price: c.price,
                quantity: c.quantity,
            })
            .collect())
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<(Order, Vec<OrderItem>)>> {
        let state = self.state.lock().await;
        // Insertion order is creation order; newest first.
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .map(|o| {
                let items = state
                    .order_items
                    .iter()
                    .filter(|i| i.order_id == o.id)
                    .cloned()
                    .collect();
                (o.clone(), items)
            })
            .collect())
    }
}

pub struct MemTx {
    guard: OwnedMutexGuard<State>,
    undo: Option<State>,
}

impl Drop for MemTx {
    fn drop(&mut self) {
        // Not committed: restore the pre-transaction state.
        if let Some(undo) = self.undo.take() {
            *self.guard = undo;
        }
    }
}

#[async_trait]
impl StoreTx for MemTx {
    async fn drain_cart(&mut self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let cart = std::mem::take(&mut self.guard.cart_items);
        let (drained, kept): (Vec<_>, Vec<_>) =
            cart.into_iter().partition(|c| c.user_id == user_id);
        self.guard.cart_items = kept;
        Ok(drained)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order> {
        let row = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            name: order.name,
            email: order.email,
            address: order.address,
            total_amount: order.total_amount,
            paid: order.paid,
            tracking_number: Uuid::new_v4(),
            created: Utc::now(),
        };
        self.guard.orders.push(row.clone());
        Ok(row)
    }

    async fn insert_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem> {
        let row = OrderItem {
            id: Uuid::new_v4(),
            order_id: item.order_id,
            product_id: item.product_id,
            price: item.price,
            quantity: item.quantity,
            created: Utc::now(),
        };
        self.guard.order_items.push(row.clone());
        Ok(row)
    }

    async fn commit(mut self) -> Result<()> {
        self.undo = None;
        Ok(())
    }
}
