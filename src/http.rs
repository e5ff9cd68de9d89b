//! HTTP surface: router, request/response shapes, and the acting-user
//! extractor. Session management is external; the routing layer identifies
//! the acting user via the `x-user-id` header and every authenticated
//! operation receives that user as an explicit argument.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::{CartLine, User};
use crate::error::{Error, Result};
use crate::service::catalog::{ProductDetail, ProductSummary, RatingEntry};
use crate::service::checkout::CheckedOutOrder;
use crate::service::{cart, catalog, checkout, orders, rating};
use crate::store::{ProductFilter, Store};

#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
}

pub fn router<S: Store>(store: S) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "service": "glowcart"})) }),
        )
        .route("/products", get(list_products::<S>))
        .route("/products/:id", get(get_product::<S>))
        .route("/rating", axum::routing::post(rate_product::<S>))
        .route("/orders", get(list_orders::<S>).post(create_order::<S>))
        .route("/cart", get(list_cart::<S>).post(add_to_cart::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

/// The authenticated user. Missing or unknown `x-user-id` is Forbidden on
/// every route that extracts this, cart routes included.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S: Store> FromRequestParts<AppState<S>> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState<S>) -> Result<Self> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(Error::Forbidden)?;
        let user = state
            .store
            .user_by_id(id)
            .await?
            .ok_or(Error::Forbidden)?;
        Ok(Self(user))
    }
}

async fn list_products<S: Store>(
    State(state): State<AppState<S>>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(catalog::list_products(&state.store, &filter).await?))
}

async fn get_product<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetail>> {
    Ok(Json(catalog::get_product(&state.store, id).await?))
}

#[derive(Debug, Deserialize)]
struct RateRequest {
    product: Option<Uuid>,
    rating: Option<i32>,
    comment: Option<String>,
}

async fn rate_product<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RateRequest>,
) -> Result<(StatusCode, Json<RatingEntry>)> {
    let product = req.product.ok_or_else(|| Error::missing_field("product"))?;
    let value = req.rating.ok_or_else(|| Error::missing_field("rating"))?;
    let comment = req.comment.ok_or_else(|| Error::missing_field("comment"))?;
    let row = rating::rate_product(&state.store, &user, product, value, comment).await?;
    Ok((StatusCode::CREATED, Json(RatingEntry::from(row))))
}

#[derive(Debug, Serialize)]
struct CartProductRef {
    id: Uuid,
    name: String,
}

#[derive(Debug, Serialize)]
struct CartItemResponse {
    user: Uuid,
    product: CartProductRef,
    price: Decimal,
    quantity: i32,
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        Self {
            user: line.user_id,
            product: CartProductRef {
                id: line.product_id,
                name: line.product_name,
            },
            price: line.price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddToCartRequest {
    product: Option<Uuid>,
    quantity: Option<i32>,
}

async fn add_to_cart<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>)> {
    let product = req.product.ok_or_else(|| Error::missing_field("product"))?;
    let quantity = req.quantity.ok_or_else(|| Error::missing_field("quantity"))?;
    let line = cart::add_to_cart(&state.store, &user, product, quantity).await?;
    Ok((StatusCode::CREATED, Json(CartItemResponse::from(line))))
}

async fn list_cart<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartItemResponse>>> {
    let lines = cart::list_cart(&state.store, &user).await?;
    Ok(Json(lines.into_iter().map(CartItemResponse::from).collect()))
}

#[derive(Debug, Serialize)]
struct OrderItemResponse {
    product: Option<Uuid>,
    price: Decimal,
    quantity: i32,
}

#[derive(Debug, Serialize)]
struct OrderResponse {
    id: Uuid,
    user: Uuid,
    name: String,
    email: String,
    address: String,
    total_amount: Option<Decimal>,
    created: DateTime<Utc>,
    paid: bool,
    tracking_number: Uuid,
    ordered_items: Vec<Uuid>,
    order_items: Vec<OrderItemResponse>,
}

impl From<CheckedOutOrder> for OrderResponse {
    fn from(result: CheckedOutOrder) -> Self {
        Self {
            id: result.order.id,
            user: result.order.user_id,
            name: result.order.name,
            email: result.order.email,
            address: result.order.address,
            total_amount: result.order.total_amount,
            created: result.order.created,
            paid: result.order.paid,
            tracking_number: result.order.tracking_number,
            ordered_items: result.items.iter().filter_map(|i| i.product_id).collect(),
            order_items: result
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product: i.product_id,
                    price: i.price,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CreateOrderRequest {
    #[serde(default)]
    paid: bool,
}

async fn create_order<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let result = checkout::checkout(&state.store, &user, req.paid).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(result))))
}

async fn list_orders<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let results = orders::list_orders(&state.store, &user).await?;
    Ok(Json(results.into_iter().map(OrderResponse::from).collect()))
}
