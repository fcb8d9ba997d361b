/// End-to-end request flow through the router and a SQLite file
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use habit_tracker_api::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn app() -> (Router, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let server = HabitTrackerServer::new(ServerConfig {
        database: dir.path().join("habits.db"),
        addr: "127.0.0.1:0".parse().unwrap(),
        request_timeout: Duration::from_secs(5),
    })
    .expect("Failed to create server");

    (server.router(), dir)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => Request::builder().method(method).uri(uri).body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_habit_lifecycle_over_http() {
    let (app, _dir) = app();

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "name": "Journal", "frequency": "weekly", "color": "#10B981" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["frequency"], "weekly");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = call(&app, Method::GET, "/api/habits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/habits/{id}"),
        Some(json!({ "description": "one page" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "one page");
    assert_eq!(updated["name"], "Journal");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/habits/{id}"),
        Some(json!({ "color": "blue" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/habits/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, &format!("/api/habits/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_completions_and_statistics_over_http() {
    let (app, _dir) = app();

    let (_, created) = call(&app, Method::POST, "/api/habits", Some(json!({ "name": "Walk" }))).await;
    let id = created["id"].as_str().unwrap().to_string();
    let complete = format!("/api/habits/{id}/complete");

    for date in ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-02"] {
        let (status, _) = call(&app, Method::POST, &complete, Some(json!({ "date": date }))).await;
        assert_eq!(status, StatusCode::OK, "marking {date}");
    }

    let (status, _) = call(&app, Method::POST, &complete, Some(json!({ "date": "2024-02-28" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, completions) = call(&app, Method::GET, &format!("/api/habits/{id}/completions"), None).await;
    assert_eq!(status, StatusCode::OK);
    let days: Vec<&str> = completions
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["completed_at"].as_str().unwrap())
        .collect();
    assert_eq!(days, ["2024-03-02", "2024-02-29", "2024-02-28", "2024-02-27"]);

    let (status, stats) = call(&app, Method::GET, &format!("/api/habits/{id}/statistics"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_completions"], 4);
    assert_eq!(stats["longest_streak"], 3);
    assert_eq!(stats["completions"][0], "2024-02-27");

    let (status, _) = call(&app, Method::DELETE, &format!("{complete}/2024-02-28"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = call(&app, Method::GET, &format!("/api/habits/{id}/statistics"), None).await;
    assert_eq!(stats["total_completions"], 3);
    assert_eq!(stats["longest_streak"], 1);
}

#[tokio::test]
async fn test_completing_unknown_habit_is_not_found() {
    let (app, _dir) = app();
    let uri = format!("/api/habits/{}/complete", HabitId::new());

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "date": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "habit not found");
}
