//! Router tests. Every request here is answered before a database
//! connection is needed; the pool is built lazily and never dialed.

use std::sync::Arc;
use std::time::Duration;

use app_config::{AppConfig, ConfigEnvironment};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use cache::InMemoryOtpStore;
use http_body_util::BodyExt;
use repository::{
    PgAdminRepository, PgComboRepository, PgOrderRepository, PgUserRepository, Repositories,
};
use serde_json::{json, Value};
use server::{router, AppState, ListSettings, Metrics};
use service::{AuthServiceImpl, ComboServiceImpl, LogSmsSender, OrderServiceImpl};
use tower::ServiceExt;
use uuid::Uuid;

const API: &str = "/food/api/v1";

fn app() -> Router {
    let cfg = AppConfig::from_env(ConfigEnvironment::default().source(Some(Default::default())))
        .unwrap();
    let pool = db::build_pool(&cfg).unwrap();

    let state = AppState {
        orders: Arc::new(OrderServiceImpl::new(PgOrderRepository::new(pool.clone()))),
        combos: Arc::new(ComboServiceImpl::new(PgComboRepository::new(pool.clone()))),
        auth: Arc::new(AuthServiceImpl::new(
            PgUserRepository::new(pool.clone()),
            PgAdminRepository::new(pool.clone()),
            InMemoryOtpStore::new(),
            LogSmsSender,
            Duration::from_secs(120),
        )),
        repos: Repositories::postgres(pool),
        lists: ListSettings::default(),
        metrics: Arc::new(Metrics::new().unwrap()),
    };
    router(state)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn order_body(quantity: i32) -> Value {
    json!({
        "order": {
            "user_id": Uuid::new_v4(),
            "delivery_status": "delivery",
            "longitude": 69.24,
            "latitude": 41.29,
            "address_name": "Chilonzor 9"
        },
        "items": [
            { "product_id": Uuid::new_v4(), "quantity": 2 },
            { "product_id": Uuid::new_v4(), "quantity": quantity }
        ]
    })
}

#[tokio::test]
async fn health_is_ok() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn metrics_use_route_templates() {
    let app = app();
    let id = Uuid::new_v4();
    send(&app, get(&format!("{API}/orders/{id}/x"))).await;
    send(&app, get(&format!("{API}/orders?page=0"))).await;

    let resp = app.clone().oneshot(get("/metrics")).await.unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#"endpoint="/food/api/v1/orders""#));
    assert!(!text.contains(&id.to_string()));
}

#[tokio::test]
async fn zero_quantity_is_a_validation_error() {
    let (status, body) = send(
        &app(),
        json_request(Method::POST, &format!("{API}/orders"), order_body(0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn empty_order_is_a_validation_error() {
    let mut body = order_body(1);
    body["items"] = json!([]);
    let (status, body) = send(
        &app(),
        json_request(Method::POST, &format!("{API}/orders"), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("{API}/orders"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"order\": "))
        .unwrap();
    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_path_id_is_a_validation_error() {
    let (status, body) = send(&app(), get(&format!("{API}/orders/not-a-uuid"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn bad_paging_is_a_validation_error() {
    let app = app();
    for query in ["page=0", "page=abc", "limit=0", "limit=5000"] {
        let (status, body) = send(&app, get(&format!("{API}/products?{query}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn unknown_status_is_a_validation_error() {
    let (status, body) = send(
        &app(),
        json_request(
            Method::PATCH,
            &format!("{API}/orders/{}/status", Uuid::new_v4()),
            json!({ "status": "lost" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn user_with_bad_phone_is_rejected() {
    let (status, body) = send(
        &app(),
        json_request(
            Method::POST,
            &format!("{API}/users"),
            json!({ "name": "Aziz", "phone": "12345" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn send_code_checks_the_phone() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("{API}/sendcode"),
            json!({ "mobile_phone": "901234567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("{API}/sendcode"),
            json!({ "mobile_phone": "+998901234567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn confirm_without_code_is_not_found() {
    let (status, body) = send(
        &app(),
        json_request(
            Method::POST,
            &format!("{API}/user/byphoneconfirm"),
            json!({ "mobile_phone": "+998907654321", "smscode": "123456" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn wrong_code_is_unauthorized() {
    let app = app();
    let phone = "+998901112233";
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("{API}/sendcode"),
            json!({ "mobile_phone": phone }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("{API}/user/byphoneconfirm"),
            json!({ "mobile_phone": phone, "smscode": "abc" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_confirm_without_code_is_not_found() {
    let (status, body) = send(
        &app(),
        json_request(
            Method::POST,
            &format!("{API}/admin/login"),
            json!({ "mobile_phone": "+998907654321", "smscode": "123456" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let resp = app().oneshot(get("/food/api/v1/nothing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
