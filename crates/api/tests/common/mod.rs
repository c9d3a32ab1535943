//! Shared test harness: app construction mirroring `main.rs`, request
//! helpers, and database seeding helpers.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use hrx_api::auth::jwt::{generate_access_token, JwtConfig};
use hrx_api::auth::password::hash_password;
use hrx_api::config::ServerConfig;
use hrx_api::rate_limit::RateLimiter;
use hrx_api::routes;
use hrx_api::state::AppState;
use hrx_db::models::project::{CreateProject, Project};
use hrx_db::models::supplier::{CreateSupplier, Supplier};
use hrx_db::models::user::User;
use hrx_db::repositories::{ProjectRepo, SupplierRepo, UserRepo};
use hrx_email::{EmailQueue, EmailWorker, LogMailer};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. Outbound email runs through a real
/// worker backed by [`LogMailer`], so `email_logs` rows reach their final
/// state. The geocoder points at a closed local port, so lookups fail fast
/// and create paths proceed without coordinates.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let (email_queue, email_rx) = EmailQueue::channel();
    let worker = EmailWorker::new(pool.clone(), Arc::new(LogMailer));
    let cancel = tokio_util::sync::CancellationToken::new();
    tokio::spawn(async move {
        worker.run(email_rx, cancel).await;
    });

    let geocoder = Arc::new(hrx_geo::Geocoder::new(hrx_geo::GeoConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..hrx_geo::GeoConfig::default()
    }));

    let state = AppState {
        pool,
        config: Arc::new(config),
        email: email_queue,
        geocoder,
        rate_limiter: Arc::new(RateLimiter::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with a bearer token and no body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON: {e}: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return it with a valid access
/// token signed with the test JWT secret.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let hash = hash_password("test_password_123!").expect("hashing should succeed");
    let user = UserRepo::create(pool, email, &hash, "Test User", role)
        .await
        .expect("user creation should succeed");
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create an admin user and return it with a valid token.
pub async fn create_admin(pool: &PgPool) -> (User, String) {
    create_user(pool, "admin@test.com", "admin").await
}

/// Insert a minimal project directly through the repository.
pub async fn seed_project(pool: &PgPool, created_by: Option<i64>) -> Project {
    let input = CreateProject {
        client_name: "Ana Souza".to_string(),
        client_email: "ana@example.com".to_string(),
        client_phone: "11987654321".to_string(),
        client_company: None,
        client_cnpj: None,
        event_name: "Festival de Verão".to_string(),
        event_type: "festival".to_string(),
        event_description: None,
        event_date: Some("2026-11-20".to_string()),
        start_time: None,
        end_time: None,
        expected_attendance: Some(500),
        venue_name: None,
        venue_address: "Av. Paulista, 1000".to_string(),
        venue_city: "São Paulo".to_string(),
        venue_state: "SP".to_string(),
        venue_zip: None,
        budget_range: None,
        client_budget: None,
        is_urgent: false,
        additional_notes: None,
        profit_margin: None,
    };
    ProjectRepo::create(pool, &input, created_by, None, None)
        .await
        .expect("project creation should succeed")
}

/// Insert a supplier directly through the repository.
pub async fn seed_supplier(pool: &PgPool, company: &str, email: &str) -> Supplier {
    let input = CreateSupplier {
        company_name: company.to_string(),
        legal_name: String::new(),
        contact_name: "Carlos Lima".to_string(),
        email: email.to_string(),
        phone: "1133334444".to_string(),
        cnpj: String::new(),
        address: None,
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
        zip_code: String::new(),
        equipment_types: vec!["som".to_string(), "luz".to_string()],
        delivery_radius_km: None,
        shipping_fee_per_km: None,
    };
    SupplierRepo::create(pool, &input, None, None)
        .await
        .expect("supplier creation should succeed")
}
