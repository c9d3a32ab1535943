//! HTTP-level integration tests for project staffing lines and the
//! invitation issuing flow.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, delete_auth, patch_json_auth, post_auth, post_json_auth,
    seed_project,
};
use sqlx::PgPool;

fn line_body() -> serde_json::Value {
    serde_json::json!({
        "external_name": "Equipe Local",
        "role": "security",
        "category": "seguranca",
        "quantity": 4,
        "daily_rate": 150.0,
        "duration_days": 2
    })
}

async fn create_line(app: axum::Router, project_id: i64, token: &str) -> i64 {
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/team"),
        token,
        line_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn project_totals(pool: &PgPool, project_id: i64) -> (f64, f64) {
    sqlx::query_as::<_, (f64, f64)>(
        "SELECT total_team_cost, total_cost FROM event_projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Staffing line CRUD and rollup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_line_derives_total_and_rolls_up(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        line_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    // 4 people x 2 days x 150/day.
    assert_eq!(json["data"]["total_cost"], 1200.0);
    assert_eq!(json["data"]["status"], "draft");

    let (team_cost, total_cost) = project_totals(&pool, project.id).await;
    assert_eq!(team_cost, 1200.0);
    assert_eq!(total_cost, 1200.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_line_requires_professional_or_external_name(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        serde_json::json!({
            "role": "security",
            "quantity": 1,
            "daily_rate": 100.0,
            "duration_days": 1
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_line_rejects_non_positive_quantity(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);

    let mut body = line_body();
    body["quantity"] = serde_json::json!(0);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_line_recomputes_rollup(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool.clone());
    let member_id = create_line(app.clone(), project.id, &token).await;

    let response = patch_json_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}", project.id),
        &token,
        serde_json::json!({ "quantity": 1, "duration_days": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_cost"], 150.0);

    let (team_cost, _) = project_totals(&pool, project.id).await;
    assert_eq!(team_cost, 150.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_line_returns_204_and_zeroes_rollup(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool.clone());
    let member_id = create_line(app.clone(), project.id, &token).await;

    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}", project.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (team_cost, total_cost) = project_totals(&pool, project.id).await;
    assert_eq!(team_cost, 0.0);
    assert_eq!(total_cost, 0.0);
}

/// A line is only addressable under the project it belongs to.
#[sqlx::test(migrations = "../../db/migrations")]
async fn line_under_wrong_project_returns_404(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project_a = seed_project(&pool, Some(admin.id)).await;
    let project_b = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);
    let member_id = create_line(app.clone(), project_a.id, &token).await;

    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}", project_b.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Invitation issuing
// ---------------------------------------------------------------------------

async fn seed_professional(pool: &PgPool) -> i64 {
    use hrx_db::models::professional::CreateProfessional;
    use hrx_db::repositories::ProfessionalRepo;

    let input = CreateProfessional {
        full_name: "Marcos Paulo".to_string(),
        cpf: "12345678900".to_string(),
        email: "marcos@example.com".to_string(),
        phone: "11912345678".to_string(),
        birth_date: None,
        cep: String::new(),
        street: None,
        number: None,
        complement: None,
        neighborhood: None,
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        categories: vec!["seguranca".to_string()],
        availability: serde_json::json!({}),
        has_experience: true,
        years_of_experience: None,
        experience_description: None,
        service_radius_km: None,
    };
    ProfessionalRepo::create(pool, &input, None, None)
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invite_issues_token_and_records_email(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let professional_id = seed_professional(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        serde_json::json!({
            "professional_id": professional_id,
            "role": "security",
            "quantity": 1,
            "daily_rate": 200.0,
            "duration_days": 2
        }),
    )
    .await;
    let member_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}/invite", project.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "invited");
    assert!(json["data"]["invited_at"].is_string());
    assert!(json["data"]["token_expires_at"].is_string());
    // The token itself never appears in API responses.
    assert!(json["data"].get("invitation_token").is_none());

    let stored_token: Option<String> =
        sqlx::query_scalar("SELECT invitation_token FROM project_team WHERE id = $1")
            .bind(member_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored_token.unwrap().len(), 32);

    // The invitation email was logged for the professional.
    let (recipient, template): (String, String) = sqlx::query_as(
        "SELECT recipient_email, template_used FROM email_logs WHERE related_id = $1 AND related_type = 'team_member'",
    )
    .bind(member_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(recipient, "marcos@example.com");
    assert_eq!(template, "team_invitation");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invite_external_line_returns_400(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let app = common::build_test_app(pool);
    let member_id = create_line(app.clone(), project.id, &token).await;

    let response = post_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}/invite", project.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invite_decided_line_returns_409(pool: PgPool) {
    let (admin, token) = create_admin(&pool).await;
    let project = seed_project(&pool, Some(admin.id)).await;
    let professional_id = seed_professional(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{}/team", project.id),
        &token,
        serde_json::json!({
            "professional_id": professional_id,
            "role": "security",
            "quantity": 1,
            "daily_rate": 200.0,
            "duration_days": 2
        }),
    )
    .await;
    let member_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    sqlx::query("UPDATE project_team SET status = 'confirmed' WHERE id = $1")
        .bind(member_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_auth(
        app,
        &format!("/api/v1/projects/{}/team/{member_id}/invite", project.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
