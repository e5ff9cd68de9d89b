use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product category. Stored as the `product_category` enum type in Postgres.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "product_category", rename_all = "lowercase")]
pub enum Category {
    Face,
    Body,
    Hair,
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price, two fractional digits.
    pub price: Decimal,
    /// Informational only; no operation in this service decrements it.
    pub stock: i32,
    pub category: Category,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// One user's rating of one product. At most one row per (user, product)
/// pair, enforced by the rate operation. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created: DateTime<Utc>,
}
