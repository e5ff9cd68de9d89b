//! Catalog read path: listing and detail view models.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, Product, ProductRating};
use crate::error::{Error, Result};
use crate::service::rating::average_rating;
use crate::store::{ProductFilter, Store};

#[derive(Clone, Debug, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub in_stock: bool,
    pub category: Category,
    pub rating: Decimal,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub stock: i32,
    pub in_stock: bool,
    pub category: Category,
    pub rating: Decimal,
    pub ratings: Vec<RatingEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RatingEntry {
    pub id: Uuid,
    pub user: Uuid,
    pub product: Uuid,
    pub rating: i32,
    pub comment: String,
}

impl From<ProductRating> for RatingEntry {
    fn from(r: ProductRating) -> Self {
        Self {
            id: r.id,
            user: r.user_id,
            product: r.product_id,
            rating: r.rating,
            comment: r.comment,
        }
    }
}

pub fn in_stock(product: &Product) -> bool {
    product.stock > 0
}

fn summarize(product: Product, ratings: &[ProductRating]) -> ProductSummary {
    ProductSummary {
        in_stock: in_stock(&product),
        rating: average_rating(ratings),
        id: product.id,
        name: product.name,
        price: product.price,
        stock: product.stock,
        category: product.category,
    }
}

pub async fn list_products<S: Store>(
    store: &S,
    filter: &ProductFilter,
) -> Result<Vec<ProductSummary>> {
    let products = store.list_products(filter).await?;
    let mut out = Vec::with_capacity(products.len());
    for product in products {
        let ratings = store.ratings_for_product(product.id).await?;
        out.push(summarize(product, &ratings));
    }
    Ok(out)
}

pub async fn get_product<S: Store>(store: &S, id: Uuid) -> Result<ProductDetail> {
    let product = store
        .product_by_id(id)
        .await?
        .ok_or(Error::NotFound("product"))?;
    let ratings = store.ratings_for_product(product.id).await?;
    Ok(ProductDetail {
        in_stock: in_stock(&product),
        rating: average_rating(&ratings),
        id: product.id,
        name: product.name,
        price: product.price,
        description: product.description,
        stock: product.stock,
        category: product.category,
        ratings: ratings.into_iter().map(RatingEntry::from).collect(),
    })
}
