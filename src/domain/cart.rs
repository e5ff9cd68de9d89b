use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cart line for one (user, product) pair. At most one row per pair at
/// any time; adds merge into the existing row instead of duplicating it.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Price snapshot, re-stamped from the current product price on every
    /// add/merge (not only the first add).
    pub price: Decimal,
    /// May go negative through decrement adds.
    pub quantity: i32,
    pub created: DateTime<Utc>,
}

/// Cart item joined with the product's display name, for list/response use.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
}
