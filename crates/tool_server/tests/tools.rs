use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use tool_server::{
    ServerState, router,
    types::{ToolList, ToolResponse, ToolStatus},
};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.ensure_owner().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn call(app: &Router, tool: &str, args: Value) -> (StatusCode, ToolResponse) {
    let (status, bytes) = send(app, Method::POST, &format!("/tools/{tool}"), Some(args)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lists_every_tool() {
    let app = app().await;
    let (status, bytes) = send(&app, Method::GET, "/tools", None).await;
    assert_eq!(status, StatusCode::OK);

    let list: ToolList = serde_json::from_slice(&bytes).unwrap();
    let names: Vec<&str> = list.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "log_personal_expense",
            "learn_food_health",
            "add_friend",
            "log_debt",
            "record_payment",
            "check_social_finances",
            "analyze_spending",
        ]
    );
}

#[tokio::test]
async fn unknown_item_asks_for_clarification_until_learned() {
    let app = app().await;

    let (status, res) = call(
        &app,
        "log_personal_expense",
        json!({"item": "MysteryFood", "amount": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.status, ToolStatus::NeedsClarification);
    assert!(res.message.contains("learn_food_health"));

    let (_, res) = call(
        &app,
        "learn_food_health",
        json!({"item": "MysteryFood", "is_healthy": true}),
    )
    .await;
    assert_eq!(res.status, ToolStatus::Success);

    let (_, res) = call(
        &app,
        "log_personal_expense",
        json!({"item": "MysteryFood", "amount": 10.5}),
    )
    .await;
    assert_eq!(res.status, ToolStatus::Success);
    assert_eq!(res.message, "Logged: MysteryFood (₹10.50) as Healthy");
}

#[tokio::test]
async fn debts_and_payments_round_trip() {
    let app = app().await;

    let (_, res) = call(&app, "add_friend", json!({"name": "Alice"})).await;
    assert_eq!(res.status, ToolStatus::Success);
    let (_, res) = call(&app, "add_friend", json!({"name": "alice"})).await;
    assert_eq!(res.status, ToolStatus::AlreadyExists);

    let (_, res) = call(
        &app,
        "log_debt",
        json!({"borrower": "Alice", "lender": "Me", "amount": 50}),
    )
    .await;
    assert_eq!(res.message, "Success: Alice owes Me ₹50.00");

    let (_, res) = call(
        &app,
        "record_payment",
        json!({"payer": "Alice", "receiver": "me", "amount": 20}),
    )
    .await;
    assert_eq!(res.status, ToolStatus::Success);

    let (_, res) = call(&app, "check_social_finances", json!({"query_type": "balance"})).await;
    assert_eq!(res.status, ToolStatus::Success);
    assert!(res.message.contains("Alice owes Me: ₹30.00"), "{}", res.message);

    let (_, res) = call(
        &app,
        "check_social_finances",
        json!({"query_type": "HISTORY", "person": "Alice"}),
    )
    .await;
    assert_eq!(res.message.lines().count(), 3, "{}", res.message);
}

#[tokio::test]
async fn payment_without_debt_is_not_an_error() {
    let app = app().await;
    call(&app, "add_friend", json!({"name": "Bob"})).await;

    let (status, res) = call(
        &app,
        "record_payment",
        json!({"payer": "Bob", "receiver": "Me", "amount": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.status, ToolStatus::NoActiveObligations);
}

#[tokio::test]
async fn unknown_party_is_404() {
    let app = app().await;

    let (status, res) = call(
        &app,
        "log_debt",
        json!({"borrower": "Zed", "lender": "Me", "amount": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res.status, ToolStatus::Error);
    assert_eq!(res.message, "\"Zed\" not found! Please add them first.");
}

#[tokio::test]
async fn bad_amounts_are_422() {
    let app = app().await;

    let (status, _) = call(
        &app,
        "log_personal_expense",
        json!({"item": "Tea", "amount": -3, "is_healthy": true}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, res) = call(
        &app,
        "log_personal_expense",
        json!({"item": "Tea", "amount": "lots"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.status, ToolStatus::Error);
}

#[tokio::test]
async fn unknown_tool_is_404() {
    let app = app().await;
    let (status, res) = call(&app, "drop_tables", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res.message, "Unknown tool: drop_tables");
}

#[tokio::test]
async fn empty_reports_say_no_records() {
    let app = app().await;

    let (status, res) = call(&app, "analyze_spending", json!({"month": "2023-11"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.status, ToolStatus::NoRecords);
    assert_eq!(res.message, "No spending data found for 2023-11.");

    let (_, res) = call(&app, "check_social_finances", json!({"query_type": "BALANCE"})).await;
    assert_eq!(res.status, ToolStatus::NoRecords);
    assert_eq!(res.message, "No records found for 'everyone' in mode BALANCE.");

    // Arguments may be omitted entirely.
    let (status, bytes) = send(&app, Method::POST, "/tools/analyze_spending", None).await;
    assert_eq!(status, StatusCode::OK);
    let res: ToolResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(res.status, ToolStatus::NoRecords);
}

#[tokio::test]
async fn spending_analysis_groups_by_category_and_health() {
    let app = app().await;
    for (item, amount, healthy) in [("Apple", 30, true), ("Pizza", 50, false), ("Pear", 20, true)] {
        call(
            &app,
            "log_personal_expense",
            json!({"item": item, "amount": amount, "is_healthy": healthy}),
        )
        .await;
    }

    let (_, res) = call(&app, "analyze_spending", json!({})).await;
    assert_eq!(res.status, ToolStatus::Success);
    assert!(res.message.contains("• Food (Healthy): ₹50.00"), "{}", res.message);
    assert!(res.message.contains("• Food (Unhealthy): ₹50.00"), "{}", res.message);
}
