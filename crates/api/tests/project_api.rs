//! HTTP-level integration tests for the project resource and its financial
//! rollup.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, get_auth, patch_json_auth, post_auth, post_json_auth, seed_project,
};
use sqlx::PgPool;

/// Derived prices are DOUBLE PRECISION all the way down, so compare with a
/// tolerance instead of bit equality.
fn assert_close(value: &serde_json::Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn create_body() -> serde_json::Value {
    serde_json::json!({
        "client_name": "Bruno Dias",
        "client_email": "bruno@example.com",
        "event_name": "Conferência Tech",
        "event_type": "corporate",
        "venue_address": "Rua Augusta, 500",
        "venue_city": "São Paulo",
        "venue_state": "SP"
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_returns_201_with_defaults(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/projects", &token, create_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let project = &json["data"];
    assert!(project["id"].is_number());
    assert_eq!(project["status"], "new");
    assert_eq!(project["profit_margin"], 30.0);
    assert_eq!(project["total_cost"], 0.0);
    assert_eq!(project["total_client_price"], 0.0);

    // A human-readable project number is assigned on insert.
    let number = project["project_number"].as_str().unwrap();
    assert!(!number.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_without_event_name_returns_400(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let mut body = create_body();
    body["event_name"] = serde_json::json!("   ");
    let response = post_json_auth(app, "/api/v1/projects", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_with_margin_out_of_range_returns_400(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let mut body = create_body();
    body["profit_margin"] = serde_json::json!(150.0);
    let response = post_json_auth(app, "/api/v1/projects", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_project_returns_404(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/projects/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_projects_filters_by_status(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    sqlx::query("UPDATE event_projects SET status = 'in_progress' WHERE id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();
    seed_project(&pool, Some(admin.id)).await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app.clone(),
        "/api/v1/projects?status=in_progress",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], project.id);

    let response = get_auth(app, "/api/v1/projects", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_with_unknown_status_returns_400(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/projects?status=archived", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_project_status(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        app,
        &format!("/api/v1/projects/{}", project.id),
        &token,
        serde_json::json!({ "status": "in_progress" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
}

// ---------------------------------------------------------------------------
// Rollup: margin change recomputes derived totals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn margin_change_recomputes_totals(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);

    // One staffing line: 2 people x 3 days x 100/day = 600.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        serde_json::json!({
            "external_name": "Equipe Local",
            "role": "security",
            "quantity": 2,
            "daily_rate": 100.0,
            "duration_days": 3
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Default margin is 30%: client price 780, profit 180.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/projects/{}", project.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_close(&json["data"]["total_team_cost"], 600.0);
    assert_close(&json["data"]["total_cost"], 600.0);
    assert_close(&json["data"]["total_client_price"], 780.0);
    assert_close(&json["data"]["total_profit"], 180.0);

    // Raising the margin to 50% reprices the same cost base.
    let response = patch_json_auth(
        app,
        &format!("/api/v1/projects/{}", project.id),
        &token,
        serde_json::json!({ "profit_margin": 50.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["profit_margin"], 50.0);
    assert_close(&json["data"]["total_cost"], 600.0);
    assert_close(&json["data"]["total_client_price"], 900.0);
    assert_close(&json["data"]["total_profit"], 300.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recalculate_repairs_drifted_totals(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;

    // Simulate drift from a manual intervention.
    sqlx::query("UPDATE event_projects SET total_cost = 9999 WHERE id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        &format!("/api/v1/projects/{}/recalculate", project.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_cost"], 0.0);

    let stored: f64 = sqlx::query_scalar("SELECT total_cost FROM event_projects WHERE id = $1")
        .bind(project.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0.0);
}
