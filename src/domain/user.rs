use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shop customer. Accounts are provisioned outside this service; orders
/// denormalize first_name/email/address at checkout time.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub email: String,
    pub address: String,
    pub created: DateTime<Utc>,
}
