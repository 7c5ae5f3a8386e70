//! HTTP API tests driven through the router with `tower::ServiceExt`.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use serde_json::{Value, json};
use tower::ServiceExt;

use storeroom_integration_tests::{TestStores, seed_customer, seed_product};
use storeroom_server::config::ServerConfig;
use storeroom_server::routes;
use storeroom_server::state::AppState;

const BOUNDARY: &str = "------------------------storeroom-test";

fn app(stores: &TestStores) -> Router {
    routes::router(AppState::with_retail(
        ServerConfig::default(),
        stores.service(),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
}

/// Build a multipart body from text fields and optional file parts.
fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_multipart(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, files)))
            .expect("request"),
    )
    .await
}

#[tokio::test]
async fn health_returns_ok() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn customer_lifecycle_over_http() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, created) = post_multipart(
        &app,
        "/customers",
        &[
            ("first_name", "Grace"),
            ("last_name", "Hopper"),
            ("email", "grace@example.com"),
            ("phone", "555 867 5309"),
        ],
        &[("id_image", "passport.png", b"png bytes")],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "Grace");
    let id = created["id"].as_str().expect("id").to_owned();
    // The id image landed on the documents share.
    assert!(created["id_image_path"].as_str().is_some());

    let (status, list) = get(&app, "/customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().expect("array").len(), 1);

    let (status, updated) = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri(format!("/customers/{id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": "grace@navy.mil", "phone": "555 000 0000"}).to_string(),
            ))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "grace@navy.mil");
    // Name fields are not updatable through this endpoint.
    assert_eq!(updated["last_name"], "Hopper");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/customers/{id}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_read_as_missing_records() {
    let stores = TestStores::new();
    let app = app(&stores);

    // A garbage id addresses nothing, same as a fresh uuid would.
    let (status, body) = get(&app, "/customers/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "customer not found");

    let (status, body) = get(&app, "/products/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "product not found");

    let (status, body) = get(&app, "/orders/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "order not found");
}

#[tokio::test]
async fn product_create_with_image_over_http() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, created) = post_multipart(
        &app,
        "/products",
        &[
            ("name", "Anvil"),
            ("description", "Drop-forged"),
            ("price", "199.99"),
            ("stock_quantity", "3"),
            ("category", "Hardware"),
        ],
        &[("image", "anvil.jpg", b"jpeg bytes")],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Anvil");
    assert_eq!(created["stock_quantity"], 3);
    let image_url = created["image_url"].as_str().expect("image url");
    assert!(image_url.contains("productimages"));
    assert!(image_url.ends_with(".jpg"));
}

#[tokio::test]
async fn product_validation_failures_are_bad_request() {
    let stores = TestStores::new();
    let app = app(&stores);

    // Negative price.
    let (status, _) = post_multipart(
        &app,
        "/products",
        &[
            ("name", "Anvil"),
            ("description", ""),
            ("price", "-5"),
            ("stock_quantity", "3"),
            ("category", "Hardware"),
        ],
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing required field.
    let (status, _) = post_multipart(
        &app,
        "/products",
        &[("description", ""), ("price", "5"), ("stock_quantity", "3")],
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn purchase_and_return_flow_over_http() {
    let stores = TestStores::new();
    let service = stores.service();
    let customer = seed_customer(&service).await;
    let product = seed_product(&service, 200.0, 3).await;
    let app = app(&stores);

    let (status, order) = post_json(
        &app,
        "/orders",
        &json!({
            "customer_id": customer.id.to_string(),
            "product_id": product.id.to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Completed");
    assert_eq!(order["total_amount"], "200.00");
    assert_eq!(order["snapshot"]["full_name"], "Grace Hopper");
    let order_id = order["id"].as_str().expect("order id").to_owned();

    let (status, returned) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/orders/{order_id}/return"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "Returned");

    // Second return is rejected.
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/orders/{order_id}/return"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "order is not active");
}

#[tokio::test]
async fn purchase_with_unknown_or_garbage_ids_is_conflict() {
    let stores = TestStores::new();
    let app = app(&stores);

    // Garbage ids fail exactly like unknown ids.
    for body in [
        json!({"customer_id": "garbage", "product_id": "also garbage"}),
        json!({
            "customer_id": storeroom_core::CustomerId::new().to_string(),
            "product_id": storeroom_core::ProductId::new().to_string(),
        }),
    ] {
        let (status, payload) = post_json(&app, "/orders", &body).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(payload["error"], "invalid product or customer");
    }
}

#[tokio::test]
async fn return_of_unknown_order_is_not_found() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/orders/not-even-a-uuid/return")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_admin_delete_over_http() {
    let stores = TestStores::new();
    let service = stores.service();
    let customer = seed_customer(&service).await;
    let product = seed_product(&service, 10.0, 2).await;
    let order = service
        .purchase(customer.id, product.id)
        .await
        .expect("purchase");
    let app = app(&stores);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/orders/{}", order.id))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Administrative delete bypasses the workflow: stock is untouched.
    let (status, list) = get(&app, "/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().expect("array").is_empty());
    let (_, product_json) = get(&app, &format!("/products/{}", product.id)).await;
    assert_eq!(product_json["stock_quantity"], 1);
}

#[tokio::test]
async fn activity_feed_over_http() {
    let stores = TestStores::new();
    let service = stores.service();
    let customer = seed_customer(&service).await;
    let product = seed_product(&service, 10.0, 2).await;
    service
        .purchase(customer.id, product.id)
        .await
        .expect("purchase");
    let app = app(&stores);

    let (status, feed) = get(&app, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = feed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("New customer registered: Grace Hopper"));
    assert!(lines[2].contains("Order placed: Grace Hopper bought 'Anvil'"));

    let (status, feed) = get(&app, "/activities?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn dashboard_over_http() {
    let stores = TestStores::new();
    let service = stores.service();
    let customer = seed_customer(&service).await;
    let product = seed_product(&service, 19.99, 3).await;
    service
        .purchase(customer.id, product.id)
        .await
        .expect("purchase");
    let app = app(&stores);

    let (status, stats) = get(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_customers"], 1);
    assert_eq!(stats["total_products"], 1);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["available_stock"], 2);
    assert_eq!(stats["total_revenue"], "19.99");
}

#[tokio::test]
async fn contracts_enforce_pdf_only() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, body) = post_multipart(
        &app,
        "/contracts",
        &[],
        &[("file", "terms.docx", b"not a pdf")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "please select a valid PDF file");

    let (status, _) = post_multipart(
        &app,
        "/contracts",
        &[],
        &[("file", "Terms.PDF", b"%PDF-1.7")],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = get(&app, "/contracts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!(["Terms.PDF"]));
}

#[tokio::test]
async fn document_upload_and_download() {
    let stores = TestStores::new();
    let app = app(&stores);

    let (status, _) = post_multipart(
        &app,
        "/documents",
        &[],
        &[("file", "report.txt", b"quarterly numbers")],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/documents/report.txt")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type"),
        "text/plain"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("disposition"),
        "attachment; filename=\"report.txt\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&bytes[..], b"quarterly numbers");

    let (status, _) = get(&app, "/documents/missing.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
