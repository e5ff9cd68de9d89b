//! Cart store: idempotent merge-on-add and the cart listing.

use uuid::Uuid;

use crate::domain::{CartLine, User};
use crate::error::{Error, Result};
use crate::store::Store;

/// Adds `quantity` of a product to the user's cart. If the pair already has
/// a row the quantities merge into it, so a retried request never creates a
/// duplicate. Every add, first or merge, stamps the current product price
/// onto the row. Negative quantities are a defined decrement, not an error.
pub async fn add_to_cart<S: Store>(
    store: &S,
    user: &User,
    product_id: Uuid,
    quantity: i32,
) -> Result<CartLine> {
    let product = store
        .product_by_id(product_id)
        .await?
        .ok_or(Error::NotFound("product"))?;
    let item = store
        .upsert_cart_item(user.id, product_id, quantity)
        .await?
        .ok_or(Error::NotFound("product"))?;
    tracing::debug!(user = %user.id, product = %product_id, quantity = item.quantity, "cart updated");
    Ok(CartLine {
        id: item.id,
        user_id: item.user_id,
        product_id: item.product_id,
        product_name: product.name,
        price: item.price,
        quantity: item.quantity,
    })
}

pub async fn list_cart<S: Store>(store: &S, user: &User) -> Result<Vec<CartLine>> {
    store.cart_for_user(user.id).await
}
