//! End-to-end tests over the HTTP router, backed by the in-memory store.

use std::str::FromStr;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use glowcart::domain::{Category, User};
use glowcart::http::router;
use glowcart::store::MemStore;

async fn setup() -> (Router, MemStore) {
    let store = MemStore::new();
    (router(store.clone()), store)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, user: &User) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user.id.to_string())
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, user: Option<&User>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serializes as a string")).unwrap()
}

#[tokio::test]
async fn product_listing_carries_rating_and_stock_flag() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let bob = store.add_user("bob", "Bob", "bob@example.com", "2 Elm St").await;
    let cream = store
        .add_product("Day Cream", Decimal::new(1099, 2), 5, Category::Face)
        .await;
    store
        .add_product("Bar Soap", Decimal::new(299, 2), 0, Category::Body)
        .await;

    for (user, score) in [(&ann, 5), (&bob, 3)] {
        let resp = app
            .clone()
            .oneshot(post(
                "/rating",
                Some(user),
                json!({"product": cream.id, "rating": score, "comment": "ok"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.clone().oneshot(get("/products")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    let cream_row = products
        .iter()
        .find(|p| p["id"] == json!(cream.id))
        .unwrap();
    assert_eq!(decimal(&cream_row["rating"]), Decimal::new(40, 1));
    assert_eq!(cream_row["in_stock"], json!(true));
    let soap_row = products
        .iter()
        .find(|p| p["name"] == json!("Bar Soap"))
        .unwrap();
    assert_eq!(soap_row["in_stock"], json!(false));
}

#[tokio::test]
async fn empty_category_filter_returns_ok_and_empty() {
    let (app, store) = setup().await;
    store
        .add_product("Day Cream", Decimal::new(1099, 2), 5, Category::Face)
        .await;

    let resp = app
        .clone()
        .oneshot(get("/products?category=hair"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn unknown_product_detail_is_404() {
    let (app, _store) = setup().await;
    let resp = app
        .clone()
        .oneshot(get(&format!("/products/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"detail": "Not found."}));
}

#[tokio::test]
async fn rating_requires_authentication() {
    let (app, store) = setup().await;
    let product = store
        .add_product("Day Cream", Decimal::new(1099, 2), 5, Category::Face)
        .await;

    let resp = app
        .clone()
        .oneshot(post(
            "/rating",
            None,
            json!({"product": product.id, "rating": 5, "comment": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(resp).await,
        json!({"detail": "Authentication credentials were not provided."})
    );
}

#[tokio::test]
async fn out_of_range_rating_is_a_field_error() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1099, 2), 5, Category::Face)
        .await;

    let resp = app
        .clone()
        .oneshot(post(
            "/rating",
            Some(&ann),
            json!({"product": product.id, "rating": 10, "comment": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["rating"][0],
        json!("Ensure this value is less than or equal to 5.")
    );
}

#[tokio::test]
async fn duplicate_rating_is_a_non_field_error() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1099, 2), 5, Category::Face)
        .await;

    let first = app
        .clone()
        .oneshot(post(
            "/rating",
            Some(&ann),
            json!({"product": product.id, "rating": 5, "comment": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .clone()
        .oneshot(post(
            "/rating",
            Some(&ann),
            json!({"product": product.id, "rating": 4, "comment": "again"}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(second).await,
        json!({"non_field_errors": ["Product already has been rated!"]})
    );
}

#[tokio::test]
async fn missing_body_field_is_a_field_error() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;

    let resp = app
        .clone()
        .oneshot(post("/cart", Some(&ann), json!({"quantity": 2})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({"product": ["This field is required."]})
    );
}

#[tokio::test]
async fn cart_adds_merge_into_one_line() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1000, 2), 5, Category::Face)
        .await;

    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(post(
                "/cart",
                Some(&ann),
                json!({"product": product.id, "quantity": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.clone().oneshot(get_as("/cart", &ann)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let lines = body.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], json!(4));
    assert_eq!(lines[0]["product"]["name"], json!("Day Cream"));
    assert_eq!(decimal(&lines[0]["price"]), Decimal::new(1000, 2));
}

#[tokio::test]
async fn cart_requires_authentication() {
    let (app, store) = setup().await;
    let product = store
        .add_product("Day Cream", Decimal::new(1000, 2), 5, Category::Face)
        .await;

    let resp = app.clone().oneshot(get("/cart")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(post(
            "/cart",
            None,
            json!({"product": product.id, "quantity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn checkout_turns_the_cart_into_an_order() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1000, 2), 5, Category::Face)
        .await;

    let resp = app
        .clone()
        .oneshot(post(
            "/cart",
            Some(&ann),
            json!({"product": product.id, "quantity": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(post("/orders", Some(&ann), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = body_json(resp).await;
    assert_eq!(order["user"], json!(ann.id));
    assert_eq!(order["name"], json!("Ann"));
    assert_eq!(order["email"], json!("ann@example.com"));
    assert_eq!(order["address"], json!("1 Oak St"));
    assert_eq!(order["paid"], json!(false));
    assert_eq!(decimal(&order["total_amount"]), Decimal::new(2000, 2));
    assert_eq!(order["ordered_items"], json!([product.id]));
    let items = order["order_items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], json!(2));
    assert_eq!(decimal(&items[0]["price"]), Decimal::new(1000, 2));

    let resp = app.clone().oneshot(get_as("/cart", &ann)).await.unwrap();
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn unauthenticated_checkout_creates_no_order() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1000, 2), 5, Category::Face)
        .await;
    app.clone()
        .oneshot(post(
            "/cart",
            Some(&ann),
            json!({"product": product.id, "quantity": 1}),
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(post("/orders", None, json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.clone().oneshot(get_as("/orders", &ann)).await.unwrap();
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn orders_never_leak_across_users() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;
    let bob = store.add_user("bob", "Bob", "bob@example.com", "2 Elm St").await;
    let product = store
        .add_product("Day Cream", Decimal::new(1000, 2), 5, Category::Face)
        .await;

    for user in [&ann, &bob] {
        app.clone()
            .oneshot(post(
                "/cart",
                Some(user),
                json!({"product": product.id, "quantity": 1}),
            ))
            .await
            .unwrap();
        let resp = app
            .clone()
            .oneshot(post("/orders", Some(user), json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.clone().oneshot(get_as("/orders", &ann)).await.unwrap();
    let body = body_json(resp).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["user"], json!(ann.id));
}

#[tokio::test]
async fn empty_cart_checkout_has_null_total() {
    let (app, store) = setup().await;
    let ann = store.add_user("ann", "Ann", "ann@example.com", "1 Oak St").await;

    let resp = app
        .clone()
        .oneshot(post("/orders", Some(&ann), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = body_json(resp).await;
    assert_eq!(order["total_amount"], Value::Null);
    assert_eq!(order["order_items"], json!([]));
}
