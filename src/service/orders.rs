//! Order ledger read path.

use crate::domain::User;
use crate::error::Result;
use crate::service::checkout::CheckedOutOrder;
use crate::store::Store;

/// The acting user's orders, newest first, each with its items. Never
/// returns another user's orders.
pub async fn list_orders<S: Store>(store: &S, user: &User) -> Result<Vec<CheckedOutOrder>> {
    Ok(store
        .orders_for_user(user.id)
        .await?
        .into_iter()
        .map(|(order, items)| CheckedOutOrder { order, items })
        .collect())
}
