//! sqlx Postgres implementation of the storage ports.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{CartItem, CartLine, Order, OrderItem, Product, ProductRating, User};
use crate::error::Result;
use crate::store::{NewOrder, NewOrderItem, NewRating, ProductFilter, Store, StoreTx};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx> {
        Ok(PgTx {
            tx: self.pool.begin().await?,
        })
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products \
             WHERE ($1::product_category IS NULL OR category = $1) \
               AND ($2::text IS NULL OR lower(name) = lower($2)) \
               AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%') \
             ORDER BY created DESC",
        )
        .bind(filter.category)
        .bind(filter.name.as_deref())
        .bind(filter.search.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<ProductRating>> {
        let ratings = sqlx::query_as::<_, ProductRating>(
            "SELECT * FROM product_ratings WHERE product_id = $1 ORDER BY created",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ratings)
    }

    async fn user_has_rated(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM product_ratings WHERE user_id = $1 AND product_id = $2)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    async fn insert_rating(&self, rating: NewRating) -> Result<ProductRating> {
        let row = sqlx::query_as::<_, ProductRating>(
            "INSERT INTO product_ratings (id, user_id, product_id, rating, comment, created) \
             VALUES ($1, $2, $3, $4, $5, now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(rating.user_id)
        .bind(rating.product_id)
        .bind(rating.rating)
        .bind(&rating.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_cart_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        // Single statement so two concurrent adds can never both insert;
        // the merge also re-stamps the current product price.
        let item = sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (id, user_id, product_id, price, quantity, created) \
             SELECT $1, $2, p.id, p.price, $4, now() FROM products p WHERE p.id = $3 \
             ON CONFLICT (user_id, product_id) DO UPDATE \
             SET quantity = cart_items.quantity + EXCLUDED.quantity, price = EXCLUDED.price \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn cart_for_user(&self, user_id: Uuid) -> Result<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT c.id, c.user_id, c.product_id, p.name AS product_name, c.price, c.quantity \
             FROM cart_items c JOIN products p ON p.id = c.product_id \
             WHERE c.user_id = $1 ORDER BY c.created",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<(Order, Vec<OrderItem>)>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let mut out = Vec::with_capacity(orders.len());
        for order in orders {
            let items = sqlx::query_as::<_, OrderItem>(
                "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created",
            )
            .bind(order.id)
            .fetch_all(&self.pool)
            .await?;
            out.push((order, items));
        }
        Ok(out)
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn drain_cart(&mut self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "DELETE FROM cart_items WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(items)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order> {
        let row = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, name, email, address, total_amount, paid, tracking_number, created) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(order.user_id)
        .bind(&order.name)
        .bind(&order.email)
        .bind(&order.address)
        .bind(order.total_amount)
        .bind(order.paid)
        .bind(Uuid::new_v4())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem> {
        let row = sqlx::query_as::<_, OrderItem>(
            "INSERT INTO order_items (id, order_id, product_id, price, quantity, created) \
             VALUES ($1, $2, $3, $4, $5, now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.price)
        .bind(item.quantity)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
