//! Rating aggregation and creation.

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::domain::{ProductRating, User};
use crate::error::{Error, Result};
use crate::store::{NewRating, Store};

/// Arithmetic mean of the given ratings, rounded to one decimal place with
/// half-away-from-zero tie-breaking. A product with zero ratings scores
/// exactly 0. Computed fresh on every call; nothing is cached.
pub fn average_rating(ratings: &[ProductRating]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.rating)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len() as i64))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Records one user's rating of one product. A (user, product) pair can
/// rate at most once.
pub async fn rate_product<S: Store>(
    store: &S,
    user: &User,
    product_id: Uuid,
    rating: i32,
    comment: String,
) -> Result<ProductRating> {
    if rating < 1 {
        return Err(Error::out_of_range(
            "rating",
            "Ensure this value is greater than or equal to 1.",
        ));
    }
    if rating > 5 {
        return Err(Error::out_of_range(
            "rating",
            "Ensure this value is less than or equal to 5.",
        ));
    }
    store
        .product_by_id(product_id)
        .await?
        .ok_or(Error::NotFound("product"))?;
    if store.user_has_rated(user.id, product_id).await? {
        return Err(Error::duplicate_rating());
    }
    store
        .insert_rating(NewRating {
            user_id: user.id,
            product_id,
            rating,
            comment,
        })
        .await
}
