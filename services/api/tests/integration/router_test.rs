use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use cardoctor_api::router::build_router;
use cardoctor_api::state::AppState;
use cardoctor_api_schema::documents;
use cardoctor_testing::auth::MockAuth;

use crate::helpers::{TEST_SECRET, test_booking};

fn app(db: DatabaseConnection) -> Router {
    build_router(AppState::new(db, TEST_SECRET))
}

fn idle_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn row(collection: &str, doc: Value) -> documents::Model {
    documents::Model {
        id: Uuid::now_v7(),
        collection: collection.to_owned(),
        doc,
        created_at: Utc::now(),
    }
}

fn booking_row(email: &str) -> documents::Model {
    row("bookings", Value::Object(test_booking(email)))
}

/// SQL of every statement the mock connection received, in order.
fn executed_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
    let db = Arc::try_unwrap(db)
        .ok()
        .expect("router still holds the connection");
    db.into_transaction_log()
        .iter()
        .map(|txn| format!("{txn:?}"))
        .collect()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cookies, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    json_request(Method::POST, uri, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── Greeting ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_returns_greeting() {
    let response = app(idle_db()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Car Doctor server is running");
}

// ── Auth gate on GET /bookings ───────────────────────────────────────────────

#[tokio::test]
async fn should_return_401_without_cookie() {
    let (status, _, body) = send(app(idle_db()), get("/bookings?email=a@x.com")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_return_401_with_malformed_cookie() {
    let request = get_with_cookie("/bookings?email=a@x.com", "token=not.a.jwt");
    let (status, _, _) = send(app(idle_db()), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_401_for_token_signed_with_other_secret() {
    let auth = MockAuth::with_email("a@x.com", "some-other-secret");
    let cookie = format!("token={}", auth.token());
    let (status, _, _) = send(
        app(idle_db()),
        get_with_cookie("/bookings?email=a@x.com", &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_403_for_other_users_email() {
    let (name, value) = MockAuth::with_email("a@x.com", TEST_SECRET).cookie_header();
    let request = Request::builder()
        .uri("/bookings?email=b@x.com")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app(idle_db()), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_return_owned_bookings_with_valid_cookie() {
    let row = booking_row("a@x.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();
    let (name, value) = MockAuth::with_email("a@x.com", TEST_SECRET).cookie_header();
    let request = Request::builder()
        .uri("/bookings?email=a@x.com")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app(db), request).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["_id"], row.id.to_string());
    assert_eq!(bookings[0]["email"], "a@x.com");
}

#[tokio::test]
async fn booking_mutations_are_not_gated() {
    let (status, _, body) = send(
        app(idle_db()),
        Request::builder()
            .method(Method::DELETE)
            .uri("/bookings/not-an-id")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    // Reaches the handler without a cookie and fails on the id instead.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_ID");
}

// ── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_sets_session_cookie() {
    let (status, cookies, body) =
        send(app(idle_db()), post_json("/jwt", json!({"email": "a@x.com"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn login_rejects_reserved_claims() {
    let (status, cookies, body) = send(
        app(idle_db()),
        post_json("/jwt", json!({"email": "a@x.com", "exp": 9_999_999_999u64})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_CLAIMS");
    assert!(cookies.is_empty());
}

#[tokio::test]
async fn logout_expires_cookie() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/logout")
        .body(Body::empty())
        .unwrap();

    let (status, cookies, body) = send(app(idle_db()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn login_cookie_opens_gated_route() {
    let (_, cookies, _) =
        send(app(idle_db()), post_json("/jwt", json!({"email": "a@x.com"}))).await;
    let token_pair = cookies[0].split(';').next().unwrap().to_owned();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_row("a@x.com")]])
        .into_connection();
    let (status, _, body) = send(
        app(db),
        get_with_cookie("/bookings?email=a@x.com", &token_pair),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _, _) = send(
        app(idle_db()),
        get_with_cookie("/bookings?email=b@x.com", &token_pair),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ── Lookups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_service_is_null() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<documents::Model>::new()])
        .into_connection();

    let uri = format!("/services/{}", Uuid::now_v7());
    let (status, _, body) = send(app(db), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn malformed_service_id_is_400() {
    let (status, _, body) = send(app(idle_db()), get("/services/64f1c2aa")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_ID");
}

#[tokio::test]
async fn store_failure_is_500() {
    // No query results queued: the mock connection errors on the first query.
    let (status, _, body) = send(app(idle_db()), get("/services")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "INTERNAL");
}

#[tokio::test]
async fn login_with_registered_claims_opens_gated_route() {
    let claims = json!({
        "email": "a@x.com",
        "aud": "car-doctor",
        "iss": "car-doctor-web",
        "sub": "user-42",
    });
    let (status, cookies, _) = send(app(idle_db()), post_json("/jwt", claims)).await;
    assert_eq!(status, StatusCode::OK);
    let token_pair = cookies[0].split(';').next().unwrap().to_owned();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_row("a@x.com")]])
        .into_connection();
    let (status, _, _) = send(
        app(db),
        get_with_cookie("/bookings?email=a@x.com", &token_pair),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ── Booking lifecycle ────────────────────────────────────────────────────────

#[tokio::test]
async fn created_booking_is_updated_then_listed_for_owner() {
    let stored = booking_row("a@x.com");
    let mut confirmed = stored.clone();
    confirmed.doc["status"] = json!("confirm");

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // INSERT .. RETURNING, then the gated SELECT
            .append_query_results([vec![stored.clone()], vec![confirmed.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
    );
    let app = build_router(AppState::new(Arc::clone(&db), TEST_SECRET));

    // No cookie: creating a booking is open.
    let (status, _, created) = send(
        app.clone(),
        post_json("/bookings", Value::Object(test_booking("a@x.com"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["acknowledged"], true);
    let inserted_id = created["insertedId"].as_str().unwrap().to_owned();
    assert!(inserted_id.parse::<Uuid>().is_ok());

    let (status, _, updated) = send(
        app.clone(),
        json_request(
            Method::PATCH,
            &format!("/bookings/{inserted_id}"),
            json!({"status": "confirm"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["matchedCount"], 1);
    assert_eq!(updated["modifiedCount"], 1);
    assert_eq!(updated["upsertedId"], Value::Null);

    let (name, value) = MockAuth::with_email("a@x.com", TEST_SECRET).cookie_header();
    let request = Request::builder()
        .uri("/bookings?email=a@x.com")
        .header(name, value)
        .body(Body::empty())
        .unwrap();
    let (status, _, listed) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["_id"], confirmed.id.to_string());
    assert_eq!(listed[0]["email"], "a@x.com");
    assert_eq!(listed[0]["status"], "confirm");

    let sql = executed_sql(db);
    assert_eq!(sql.len(), 3);
    assert!(sql[0].contains("INSERT"));
    assert!(sql[1].contains("UPDATE") && sql[1].contains(" || $"));
    assert!(sql[2].contains("SELECT") && sql[2].contains(" ->> $"));
}

#[tokio::test]
async fn update_of_unknown_booking_matches_nothing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let uri = format!("/bookings/{}", Uuid::now_v7());
    let (status, _, body) = send(
        app(db),
        json_request(Method::PATCH, &uri, json!({"status": "confirm"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 0);
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn users_can_be_created_listed_and_fetched() {
    let user = row("users", json!({"email": "a@x.com", "name": "Alice"}));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()], vec![user.clone()], vec![user.clone()]])
        .into_connection();
    let app = app(db);

    let (status, _, created) = send(
        app.clone(),
        post_json("/users", json!({"email": "a@x.com", "name": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["acknowledged"], true);

    let (status, _, listed) = send(app.clone(), get("/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["name"], "Alice");

    let (status, _, found) = send(app, get(&format!("/users/{}", user.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["_id"], user.id.to_string());
    assert_eq!(found["email"], "a@x.com");
}
