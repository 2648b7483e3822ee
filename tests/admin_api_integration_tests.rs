/*!
 * Admin & Super-admin API Integration Tests
 *
 * End-to-end coverage of the Basic-auth surfaces:
 * - Credential handling (401 challenge, wrong zone rejection)
 * - Catalog writes and membership replacement
 * - Weekly schedule read/replace round trip
 * - Admin booking CRUD
 * - Tenant lifecycle (super-admin)
 *
 * Requires a live PostgreSQL instance (TEST_DATABASE_URL); every test is
 * `#[ignore]`-gated for that reason.
 */

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

mod test_utils;
use test_utils::{
    basic_auth, seed_master, seed_salon, seed_service, teardown_test_db, TestApp,
    SUPER_ADMIN_PASSWORD, SUPER_ADMIN_USERNAME,
};

async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

fn admin_request(method: &str, uri: &str, auth: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ============================================================================
// Test: Credentials
// ============================================================================

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_bad_credentials_get_basic_challenge() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let response = app
        .oneshot(admin_request(
            "GET",
            "/admin/api/services",
            &basic_auth("nobody", "wrong"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Basic")
    );
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_super_admin_has_no_tenant_scope() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let response = app
        .oneshot(admin_request(
            "GET",
            "/admin/api/services",
            &basic_auth(SUPER_ADMIN_USERNAME, SUPER_ADMIN_PASSWORD),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_tenant_credentials_rejected_on_superadmin_api() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "not_super").await;

    let response = app
        .oneshot(admin_request(
            "GET",
            "/superadmin/salons",
            &basic_auth(&salon.name, &salon.admin_password),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Test: Catalog writes
// ============================================================================

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_service_create_update_delete() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "svc_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/api/services",
            &auth,
            Some(json!({"name": "Оформление бровей", "price": 1500, "duration_minutes": 45})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let service_id = body_to_json(response.into_body()).await["id"].as_i64().unwrap();

    // Zero duration is rejected
    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/api/services",
            &auth,
            Some(json!({"name": "Сломанная", "price": 100, "duration_minutes": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/admin/api/services/{}", service_id),
            &auth,
            Some(json!({"name": "Оформление бровей", "price": 1800, "duration_minutes": 45})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["price"], 1800);

    let response = app
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/api/services/{}", service_id),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_master_membership_replacement_is_idempotent() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "membership_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);
    let manicure = seed_service(&pool, salon.id, "Маникюр", 90).await;
    let eyebrows = seed_service(&pool, salon.id, "Брови", 45).await;

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/api/masters",
            &auth,
            Some(json!({
                "name": "Анна Смирнова",
                "specialization": "Мастер маникюра",
                "service_ids": [manicure, eyebrows]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let master_id = body_to_json(response.into_body()).await["id"].as_i64().unwrap();

    // Replacing with the same set twice leaves exactly one row per pair
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(admin_request(
                "PUT",
                &format!("/admin/api/masters/{}", master_id),
                &auth,
                Some(json!({
                    "name": "Анна Смирнова",
                    "specialization": "Мастер маникюра",
                    "service_ids": [manicure]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let memberships: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM master_services WHERE master_id = $1")
            .bind(master_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(memberships, 1);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_master_with_foreign_service_id_is_404() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon_a = seed_salon(&pool, "own_services").await;
    let salon_b = seed_salon(&pool, "foreign_services").await;
    let foreign = seed_service(&pool, salon_b.id, "Чужая услуга", 60).await;

    let response = app
        .oneshot(admin_request(
            "POST",
            "/admin/api/masters",
            &basic_auth(&salon_a.name, &salon_a.admin_password),
            Some(json!({
                "name": "Мария",
                "specialization": "Универсал",
                "service_ids": [foreign]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_delete_master_with_appointments_is_conflict() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "restrict_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);
    let service = seed_service(&pool, salon.id, "Стрижка", 60).await;
    let master = seed_master(&pool, salon.id, "Елена", &[service]).await;

    // Seed a client and an appointment directly
    let client_id: i64 = sqlx::query_scalar(
        "INSERT INTO clients (salon_id, external_user_id, name) VALUES ($1, 1, 'Ольга') RETURNING id",
    )
    .bind(salon.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO appointments (salon_id, client_id, master_id, service_id, start_time, end_time)
        VALUES ($1, $2, $3, $4, '2030-01-07 10:00', '2030-01-07 11:00')
        "#,
    )
    .bind(salon.id)
    .bind(client_id)
    .bind(master)
    .bind(service)
    .execute(&pool)
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/api/masters/{}", master),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/api/services/{}", service),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Test: Weekly schedule
// ============================================================================

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_schedule_read_replace_round_trip() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "schedule_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);
    let service = seed_service(&pool, salon.id, "Стрижка", 60).await;
    let master = seed_master(&pool, salon.id, "Елена", &[service]).await;

    let response = app
        .clone()
        .oneshot(admin_request(
            "GET",
            &format!("/admin/api/masters/{}/schedule", master),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let schedule = body_to_json(response.into_body()).await;
    assert_eq!(schedule["days"].as_array().unwrap().len(), 7);

    // Replaying the exact schedule back leaves it observationally unchanged
    let response = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/admin/api/masters/{}/schedule", master),
            &auth,
            Some(json!({"items": schedule["days"]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let replayed = body_to_json(response.into_body()).await;
    assert_eq!(replayed, schedule);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_schedule_replace_skips_invalid_entries() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "skip_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);
    let service = seed_service(&pool, salon.id, "Стрижка", 60).await;
    let master = seed_master(&pool, salon.id, "Елена", &[service]).await;

    // Day 1 valid, day 2 has a broken time string, the rest off
    let mut items = vec![
        json!({"day_of_week": 1, "is_working": true, "start_time": "10:00", "end_time": "19:00"}),
        json!({"day_of_week": 2, "is_working": true, "start_time": "garbage", "end_time": "19:00"}),
    ];
    for day in 3..=7 {
        items.push(json!({
            "day_of_week": day, "is_working": false, "start_time": "", "end_time": ""
        }));
    }

    let response = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/admin/api/masters/{}/schedule", master),
            &auth,
            Some(json!({"items": items})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let schedule = body_to_json(response.into_body()).await;
    let days = schedule["days"].as_array().unwrap();
    assert_eq!(days[0]["is_working"], true);
    assert_eq!(days[0]["start_time"], "10:00");
    // The invalid entry was skipped, not persisted
    assert_eq!(days[1]["is_working"], false);
}

// ============================================================================
// Test: Admin booking CRUD
// ============================================================================

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_admin_booking_create_update_cancel() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let salon = seed_salon(&pool, "booking_admin").await;
    let auth = basic_auth(&salon.name, &salon.admin_password);
    let service = seed_service(&pool, salon.id, "Стрижка", 60).await;
    let master = seed_master(&pool, salon.id, "Елена", &[service]).await;

    // Manually created client
    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/api/clients",
            &auth,
            Some(json!({"name": "Ольга", "phone_number": "+79990000000"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let client = body_to_json(response.into_body()).await;
    let client_id = client["id"].as_i64().unwrap();
    // Synthetic negative external id for admin-created clients
    assert!(client["external_user_id"].as_i64().unwrap() < 0);

    let date = test_utils::future_monday();
    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/api/appointments",
            &auth,
            Some(json!({
                "client_id": client_id,
                "master_id": master,
                "service_id": service,
                "start_time": format!("{}T10:00:00", date)
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let appointment_id = body_to_json(response.into_body()).await["id"].as_i64().unwrap();

    // Rescheduling onto its own interval is not a conflict (row excluded)
    let response = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/admin/api/appointments/{}", appointment_id),
            &auth,
            Some(json!({
                "master_id": master,
                "service_id": service,
                "start_time": format!("{}T10:30:00", date)
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The day schedule shows the moved appointment
    let response = app
        .clone()
        .oneshot(admin_request(
            "GET",
            &format!("/admin/api/appointments?selected_date={}", date),
            &auth,
            None,
        ))
        .await
        .unwrap();
    let day = body_to_json(response.into_body()).await;
    assert_eq!(day.as_array().unwrap().len(), 1);
    assert_eq!(day[0]["client_name"], "Ольга");
    assert!(day[0]["start_time"].as_str().unwrap().contains("10:30"));

    let response = app
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/api/appointments/{}", appointment_id),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Test: Tenant lifecycle
// ============================================================================

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_superadmin_creates_and_disables_salon() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    let auth = basic_auth(SUPER_ADMIN_USERNAME, SUPER_ADMIN_PASSWORD);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/superadmin/salons")
                .header("authorization", &auth)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "name=eleganse&title=Eleganse&token=eleganse-bot-token&password=eleganse-admin",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let salon = body_to_json(response.into_body()).await;
    let salon_id = salon["id"].as_i64().unwrap();
    assert_eq!(salon["is_active"], true);
    assert_eq!(salon["timezone"], "Europe/Moscow");

    // The new tenant's token works
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/services")
                .header("X-Salon-Token", "eleganse-bot-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Disable the salon
    let response = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/superadmin/salons/{}", salon_id),
            &auth,
            Some(json!({
                "name": "eleganse",
                "title": "Eleganse",
                "bot_token": "eleganse-bot-token",
                "admin_password": "eleganse-admin",
                "is_active": false
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The token is now rejected
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/services")
                .header("X-Salon-Token", "eleganse-bot-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires database to be running
async fn test_superadmin_duplicate_salon_name_is_conflict() {
    let (app, pool) = TestApp::new().await;
    teardown_test_db(&pool).await;

    seed_salon(&pool, "taken_name").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/superadmin/salons")
                .header(
                    "authorization",
                    basic_auth(SUPER_ADMIN_USERNAME, SUPER_ADMIN_PASSWORD),
                )
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "name=taken_name&title=Dup&token=fresh-token-123&password=pw",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
