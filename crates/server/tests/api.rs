use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use migration::MigratorTrait;
use server::{ServerState, router};

const PASSWORD: &str = "hunter2";

async fn app_with_db() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    let state = ServerState {
        engine: Arc::new(engine),
        db: db.clone(),
    };
    (router(state), db)
}

async fn seed_user(db: &DatabaseConnection, username: &str) -> Uuid {
    let id = Uuid::new_v4();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, username, password) VALUES (?, ?, ?)",
        vec![id.to_string().into(), username.into(), PASSWORD.into()],
    ))
    .await
    .unwrap();
    id
}

fn basic_auth(username: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{PASSWORD}"));
    format!("Basic {encoded}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    username: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(username));
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn rejects_missing_or_bad_credentials() {
    let (app, _db) = app_with_db().await;

    let request = Request::builder()
        .method("POST")
        .uri("/groups")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    // No Authorization header at all.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/groups/unused/members", "nobody", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn group_expense_balance_settlement_flow() {
    let (app, db) = app_with_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let carol = seed_user(&db, "carol").await;

    let (status, group) = send(
        &app,
        "POST",
        "/groups",
        "alice",
        Some(json!({"name": "ski trip", "description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = group["id"].as_str().unwrap().to_string();

    for member in [bob, carol] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/groups/{group_id}/members"),
            "alice",
            Some(json!({"user_id": member})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Adding bob again conflicts.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/groups/{group_id}/members"),
        "alice",
        Some(json!({"user_id": bob})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_exists");

    // Equal split of 90.00 paid by alice.
    let (status, expense) = send(
        &app,
        "POST",
        &format!("/groups/{group_id}/expenses"),
        "alice",
        Some(json!({
            "description": "dinner",
            "total_cents": 9000,
            "paid_by": alice,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["debts"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/groups/{group_id}/balances"),
        "bob",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let balances = body["balances"].as_array().unwrap();
    let balance_of = |id: Uuid| {
        balances
            .iter()
            .find(|b| b["user_id"] == json!(id))
            .unwrap()["balance_cents"]
            .as_i64()
            .unwrap()
    };
    assert_eq!(balance_of(alice), 6000);
    assert_eq!(balance_of(bob), -3000);
    assert_eq!(balance_of(carol), -3000);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/groups/{group_id}/settlements"),
        "bob",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payments = body["payments"].as_array().unwrap().clone();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p["to_id"] == json!(alice)));

    for payment in &payments {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/groups/{group_id}/settlements/pay"),
            "bob",
            Some(json!({
                "debtor_id": payment["from_id"],
                "creditor_id": payment["to_id"],
                "amount_cents": payment["amount_cents"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resolved_count"], 1);
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/groups/{group_id}/settlements"),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["payments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn engine_errors_surface_with_code_and_status() {
    let (app, db) = app_with_db().await;
    let alice = seed_user(&db, "alice").await;

    let ghost = Uuid::new_v4();
    let (status, body) = send(
        &app,
        "POST",
        &format!("/groups/{ghost}/expenses"),
        "alice",
        Some(json!({
            "description": "dinner",
            "total_cents": 9000,
            "paid_by": alice,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "group_not_found");

    let (status, group) = send(
        &app,
        "POST",
        "/groups",
        "alice",
        Some(json!({"name": "solo"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = group["id"].as_str().unwrap().to_string();

    // Custom split not summing to the total.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/groups/{group_id}/expenses"),
        "alice",
        Some(json!({
            "description": "hotel",
            "total_cents": 9900,
            "paid_by": alice,
            "splits": [{"user_id": alice, "amount_cents": 9000}],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "split_mismatch");

    // No debts between anyone yet.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/groups/{group_id}/settlements/pay"),
        "alice",
        Some(json!({
            "debtor_id": Uuid::new_v4(),
            "creditor_id": alice,
            "amount_cents": 100,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "no_matching_debt");
}

#[tokio::test]
async fn member_removal_and_group_deletion() {
    let (app, db) = app_with_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;

    let (_, group) = send(
        &app,
        "POST",
        "/groups",
        "alice",
        Some(json!({"name": "flat"})),
    )
    .await;
    let group_id = group["id"].as_str().unwrap().to_string();

    send(
        &app,
        "POST",
        &format!("/groups/{group_id}/members"),
        "alice",
        Some(json!({"user_id": bob})),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/groups/{group_id}/members/{bob}"),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/groups/{group_id}/members"),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/groups/{group_id}"), "alice", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/groups/{group_id}/balances"),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "group_not_found");
}
