//! Router tests that never reach the database (lazily connected pool)

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use casfos_server::{
    api,
    config::AppConfig,
    models::{AssetType, Role, UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let services = Services::new(
        Repository::new(pool),
        config.auth.clone(),
        config.uploads.clone(),
    );
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (api::router(state), config)
}

fn token(config: &AppConfig, role: Role, access: Vec<AssetType>) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "store.keeper".to_string(),
        user_id: 1,
        role,
        access,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

fn post_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn store_with_ids(ids: &[&str]) -> Value {
    json!({
        "assetType": "Permanent",
        "assetCategory": "Furniture",
        "entryDate": "2024-01-10",
        "purchaseDate": "2024-01-05",
        "supplierName": "Acme Furnishers",
        "items": [{
            "itemName": "Chair",
            "quantityReceived": ids.len(),
            "unitPrice": "1500",
            "showIdInputs": true,
            "itemIds": ids
        }]
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/api/assets/pending").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_item_ids_rejected_before_storage() {
    let (app, config) = app();
    let token = token(&config, Role::AssetEntry, vec![AssetType::Permanent]);

    let response = app
        .oneshot(post_json(
            "/api/assets/storeTempAsset",
            &token,
            &store_with_ids(&["A1", "A1"]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Please correct the following errors");
    let details = body["details"].as_array().expect("details");
    assert!(details
        .iter()
        .filter_map(Value::as_str)
        .any(|d| d.contains("Duplicate item IDs") && d.contains("A1")));
}

#[tokio::test]
async fn test_entry_requires_asset_type_grant() {
    let (app, config) = app();
    let token = token(&config, Role::AssetEntry, vec![AssetType::Consumable]);

    let response = app
        .oneshot(post_json(
            "/api/assets/storeTempAsset",
            &token,
            &store_with_ids(&["A1", "A2"]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_viewer_cannot_enter_assets() {
    let (app, config) = app();
    let token = token(&config, Role::Viewer, vec![]);

    let response = app
        .oneshot(post_json(
            "/api/assets/storeTempAsset",
            &token,
            &store_with_ids(&["A1"]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_export_unknown_tab() {
    let (app, config) = app();
    let token = token(&config, Role::Principal, vec![]);

    let response = app
        .oneshot(post_json("/api/assets/export/inventory", &token, &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/assets/storeTempAsset"].is_object());
}

#[tokio::test]
async fn test_responses_gzip_when_accepted() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
}
