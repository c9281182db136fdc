// Router-level tests driving the full axum stack with
// tower::ServiceExt::oneshot over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::build_cors;
use server::{build_router, AppState};
use models::subscription::{Model, NewSubscription};
use service::errors::ServiceError;
use service::subscription::{
    repository::memory::InMemorySubscriptionRepository, SubscriptionRepository, SubscriptionService,
};

const ORIGIN: &str = "https://subscriptionmanagerbyak.netlify.app";

fn app() -> Router {
    let svc = SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::new()));
    build_router(AppState::new(svc), build_cors(ORIGIN).unwrap())
}

fn netflix() -> Value {
    json!({
        "name": "Netflix",
        "amount": 15.99,
        "billingCycle": "Monthly",
        "nextBillingDate": "2024-06-01",
        "category": "Entertainment"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn netflix_scenario_create_get_delete() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/subscriptions", Some(netflix())).await;
    assert_eq!(status, StatusCode::OK);
    let created = json_of(&body);
    let mut expected = netflix();
    expected["id"] = json!(1);
    assert_eq!(created, expected);

    let (status, body) = send(&app, Method::GET, "/api/subscriptions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), created);

    let (status, body) = send(&app, Method::DELETE, "/api/subscriptions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::GET, "/api/subscriptions/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn list_starts_empty_and_keeps_creation_order() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!([]));

    for name in ["Netflix", "Spotify"] {
        let mut payload = netflix();
        payload["name"] = json!(name);
        let (status, _) = send(&app, Method::POST, "/api/subscriptions", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, Method::GET, "/api/subscriptions", None).await;
    let list = json_of(&body);
    let names: Vec<_> = list.as_array().unwrap().iter().map(|v| v["name"].clone()).collect();
    assert_eq!(names, vec![json!("Netflix"), json!("Spotify")]);
    assert_eq!(list[0]["id"], json!(1));
    assert_eq!(list[1]["id"], json!(2));
}

#[tokio::test]
async fn create_rejects_invalid_fields_with_field_map() {
    let app = app();
    let mut payload = netflix();
    payload["amount"] = json!(0);
    payload["billingCycle"] = json!("Daily");

    let (status, body) = send(&app, Method::POST, "/api/subscriptions", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_of(&body),
        json!({"amount": "Amount must be positive", "billingCycle": "Invalid billing cycle"})
    );

    // nothing reached the store
    let (_, body) = send(&app, Method::GET, "/api/subscriptions", None).await;
    assert_eq!(json_of(&body), json!([]));
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/subscriptions", Some(json!({"name": "Netflix"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json_of(&body);
    assert_eq!(errors["amount"], json!("Amount is required"));
    assert_eq!(errors["billingCycle"], json!("Billing cycle is required"));
    assert_eq!(errors["nextBillingDate"], json!("Next billing date is required"));
    assert_eq!(errors["category"], json!("Category is required"));
    assert!(errors.get("name").is_none());
}

#[tokio::test]
async fn smallest_positive_amount_is_accepted() {
    let app = app();
    let mut payload = netflix();
    payload["amount"] = json!(0.01);
    let (status, body) = send(&app, Method::POST, "/api/subscriptions", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["amount"], json!(0.01));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/subscriptions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert!(json_of(&body)["error"].is_string());

    let mut payload = netflix();
    payload["amount"] = json!("lots");
    let (status, _) = send(&app, Method::POST, "/api/subscriptions", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_overwrites_and_keeps_id() {
    let app = app();
    send(&app, Method::POST, "/api/subscriptions", Some(netflix())).await;

    let changes = json!({
        "id": 99,
        "name": "Netflix Premium",
        "amount": 22.99,
        "billingCycle": "Yearly",
        "nextBillingDate": "2025-01-01",
        "category": "Streaming"
    });
    let (status, body) = send(&app, Method::PUT, "/api/subscriptions/1", Some(changes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!({
            "id": 1,
            "name": "Netflix Premium",
            "amount": 22.99,
            "billingCycle": "Yearly",
            "nextBillingDate": "2025-01-01",
            "category": "Streaming"
        })
    );
}

#[tokio::test]
async fn update_and_delete_unknown_id_are_404_with_empty_body() {
    let app = app();
    let (status, body) = send(&app, Method::PUT, "/api/subscriptions/7", Some(netflix())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::DELETE, "/api/subscriptions/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn update_validates_before_existence_check() {
    let app = app();
    let mut payload = netflix();
    payload["name"] = json!("");
    let (status, body) = send(&app, Method::PUT, "/api/subscriptions/7", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_of(&body), json!({"name": "Name is required"}));
}

/// Store whose every call fails the way a lost database connection does.
struct UnavailableStore;

#[async_trait]
impl SubscriptionRepository for UnavailableStore {
    async fn list(&self) -> Result<Vec<Model>, ServiceError> { Err(down()) }
    async fn get(&self, _id: i64) -> Result<Option<Model>, ServiceError> { Err(down()) }
    async fn create(&self, _input: &NewSubscription) -> Result<Model, ServiceError> { Err(down()) }
    async fn update(&self, _id: i64, _input: &NewSubscription) -> Result<Model, ServiceError> { Err(down()) }
    async fn delete(&self, _id: i64) -> Result<(), ServiceError> { Err(down()) }
}

fn down() -> ServiceError {
    ServiceError::Db("connection refused".into())
}

#[tokio::test]
async fn storage_failure_is_500_not_404() {
    let svc = SubscriptionService::new(Arc::new(UnavailableStore));
    let app = build_router(AppState::new(svc), build_cors(ORIGIN).unwrap());

    let calls = [
        (Method::GET, "/api/subscriptions", None),
        (Method::GET, "/api/subscriptions/1", None),
        (Method::POST, "/api/subscriptions", Some(netflix())),
        (Method::PUT, "/api/subscriptions/1", Some(netflix())),
        (Method::DELETE, "/api/subscriptions/1", None),
    ];
    for (method, uri, body) in calls {
        let (status, bytes) = send(&app, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(json_of(&bytes), json!({"error": "internal server error"}), "{method} {uri}");
    }
}

#[tokio::test]
async fn cors_allows_only_configured_origin() {
    let app = app();
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/subscriptions")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let res = app.clone().oneshot(preflight(ORIGIN)).await.unwrap();
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.to_str().unwrap()),
        Some(ORIGIN)
    );

    let res = app.clone().oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"status": "ok"}));

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let doc = json_of(&body);
    assert!(doc["paths"]["/api/subscriptions"].is_object());
    assert!(doc["paths"]["/api/subscriptions/{id}"].is_object());
}
