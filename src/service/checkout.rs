//! Checkout engine: atomic conversion of a cart into an order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Order, OrderItem, User};
use crate::error::Result;
use crate::store::{NewOrder, NewOrderItem, Store, StoreTx};

/// An order together with its line items, as produced by checkout and the
/// order ledger.
#[derive(Clone, Debug, Serialize)]
pub struct CheckedOutOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Converts the user's cart into an immutable order inside one transaction:
/// the cart rows are drained (snapshot and deletion are the same statement),
/// the total is computed from the drained rows, the order and its items are
/// written, then everything commits together. Any failure rolls the whole
/// thing back, cart included.
///
/// The total over an empty cart is `None`, not zero. Stock is neither
/// checked nor decremented here.
pub async fn checkout<S: Store>(store: &S, user: &User, paid: bool) -> Result<CheckedOutOrder> {
    let mut tx = store.begin().await?;

    let cart = tx.drain_cart(user.id).await?;
    let total_amount = if cart.is_empty() {
        None
    } else {
        Some(
            cart.iter()
                .map(|c| c.price * Decimal::from(c.quantity))
                .sum::<Decimal>(),
        )
    };

    let order = tx
        .insert_order(NewOrder {
            user_id: user.id,
            name: user.first_name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            total_amount,
            paid,
        })
        .await?;

    let mut items = Vec::with_capacity(cart.len());
    for line in cart {
        items.push(
            tx.insert_order_item(NewOrderItem {
                order_id: order.id,
                product_id: Some(line.product_id),
                price: line.price,
                quantity: line.quantity,
            })
            .await?,
        );
    }

    tx.commit().await?;
    tracing::info!(order = %order.id, user = %user.id, total = ?order.total_amount, "checkout committed");
    Ok(CheckedOutOrder { order, items })
}
