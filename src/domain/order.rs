use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable order snapshot produced by checkout. Name/email/address are
/// copied from the user's profile at creation time, never live-joined.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    /// `None` when the order was checked out from an empty cart: the sum
    /// over an empty working set is a null aggregate, kept as-is.
    pub total_amount: Option<Decimal>,
    pub paid: bool,
    /// Opaque token for external reference, assigned once at creation.
    pub tracking_number: Uuid,
    pub created: DateTime<Utc>,
}

/// Immutable order line. `product_id` is a weak reference: deleting the
/// product later keeps the line's price/quantity but drops the linkage.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub price: Decimal,
    pub quantity: i32,
    pub created: DateTime<Utc>,
}
