//! HTTP-level integration tests for delivery tracking: scoping, the status
//! state machine, and location pings.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_admin, create_user, get_auth, patch_json_auth, post_json_auth, seed_project,
    seed_supplier,
};
use sqlx::PgPool;

/// Create a delivery assigned to the given supplier user via the API.
async fn create_delivery(
    pool: &PgPool,
    app: Router,
    admin_token: &str,
    supplier_user_id: Option<i64>,
) -> i64 {
    let project = seed_project(pool, None).await;
    let supplier = seed_supplier(pool, "Logística Rápida", &format!("log{}@example.com", project.id)).await;

    let response = post_json_auth(
        app,
        "/api/v1/deliveries",
        admin_token,
        serde_json::json!({
            "project_id": project.id,
            "supplier_id": supplier.id,
            "supplier_user_id": supplier_user_id,
            "equipment_description": "2x PA, 4x moving head",
            "destination_address": "Av. Paulista, 1000 - São Paulo"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn patch_status(app: Router, token: &str, id: i64, status: &str) -> axum::response::Response {
    patch_json_auth(
        app,
        &format!("/api/v1/deliveries/{id}/status"),
        token,
        serde_json::json!({ "status": status }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Creation and scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_delivery_starts_pending(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = get_auth(app, &format!("/api/v1/deliveries/{id}"), &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_delivery_for_unknown_project_returns_404(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let supplier = seed_supplier(&pool, "Logística", "log@example.com").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/deliveries",
        &admin_token,
        serde_json::json!({
            "project_id": 999999,
            "supplier_id": supplier.id,
            "destination_address": "Rua X, 1"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A supplier user sees only deliveries assigned to them; admins see all.
#[sqlx::test(migrations = "../../db/migrations")]
async fn supplier_list_is_scoped_to_own_deliveries(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let (courier, courier_token) = create_user(&pool, "courier@test.com", "supplier").await;
    let app = common::build_test_app(pool.clone());

    let own = create_delivery(&pool, app.clone(), &admin_token, Some(courier.id)).await;
    create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = get_auth(app.clone(), "/api/v1/deliveries", &courier_token).await;
    let json = body_json(response).await;
    let list = json["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], own);

    let response = get_auth(app, "/api/v1/deliveries", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn supplier_cannot_touch_foreign_delivery(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let (_, courier_token) = create_user(&pool, "courier@test.com", "supplier").await;
    let app = common::build_test_app(pool.clone());

    // Assigned to nobody, so the courier has no claim on it.
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/deliveries/{id}"),
        &courier_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_status(app, &courier_token, id, "preparing").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn happy_path_transitions_succeed(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    for status in ["preparing", "in_transit", "delivered"] {
        let response = patch_status(app.clone(), &admin_token, id, status).await;
        assert_eq!(response.status(), StatusCode::OK, "transition to {status}");
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], status);
    }

    // Arrival timestamps are set along the way.
    let json = body_json(
        get_auth(app, &format!("/api/v1/deliveries/{id}"), &admin_token).await,
    )
    .await;
    assert!(json["data"]["actual_pickup_time"].is_string());
    assert!(json["data"]["actual_delivery_time"].is_string());

    // Delivery completion notifies the admins.
    let notified: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE notification_type = 'delivery_completed'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(notified, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn skipping_states_returns_409(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = patch_status(app, &admin_token, id, "delivered").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_state_accepts_no_transition(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = patch_status(app.clone(), &admin_token, id, "cancelled").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = patch_status(app, &admin_token, id, "preparing").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_returns_400(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let response = patch_status(app, &admin_token, id, "shipped").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Location pings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_ping_requires_in_transit(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    let ping = serde_json::json!({ "latitude": -23.56, "longitude": -46.65, "speed_kmh": 42.0 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/deliveries/{id}/location"),
        &admin_token,
        ping,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_ping_updates_position_and_history(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    patch_status(app.clone(), &admin_token, id, "preparing").await;
    patch_status(app.clone(), &admin_token, id, "in_transit").await;

    let ping = serde_json::json!({ "latitude": -23.56, "longitude": -46.65, "speed_kmh": 42.0 });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/deliveries/{id}/location"),
        &admin_token,
        ping,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["current_latitude"], -23.56);
    assert_eq!(json["data"]["current_longitude"], -46.65);
    assert!(json["data"]["last_location_update"].is_string());

    let response = get_auth(
        app,
        &format!("/api/v1/deliveries/{id}/location"),
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    let history = json["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["latitude"], -23.56);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_coordinates_return_400(pool: PgPool) {
    let (_, admin_token) = create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_delivery(&pool, app.clone(), &admin_token, None).await;

    patch_status(app.clone(), &admin_token, id, "preparing").await;
    patch_status(app.clone(), &admin_token, id, "in_transit").await;

    let ping = serde_json::json!({ "latitude": 91.0, "longitude": 0.0 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/deliveries/{id}/location"),
        &admin_token,
        ping,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
