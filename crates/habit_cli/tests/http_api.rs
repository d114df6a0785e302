mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use habit_cli::server::{SharedClock, router};
use habit_core::{FixedClock, HabitRegistry};
use http_body_util::BodyExt;
use std::path::Path;
use support::{read_store, temp_path};
use time::macros::date;
use tower::ServiceExt;

fn app(store: &Path) -> Router {
    let clock: SharedClock = Box::new(FixedClock(date!(2025 - 06 - 15)));
    router(HabitRegistry::open(store, clock).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send_raw(app: &Router, content_type: Option<&str>, body: &str) -> (StatusCode, String) {
    let mut request = Request::builder().method(Method::POST).uri("/api/tasks");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn create_then_increment_returns_snapshots() {
    let store = temp_path("http-create.json");
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "name": "Read", "target": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["id"], "Read");
    assert_eq!(json(&body)["target"], 2);

    let (status, body) = send(&app, Method::POST, "/api/tasks/Read/increment", None).await;
    let stored = read_store(&store);
    std::fs::remove_file(&store).ok();

    assert_eq!(status, StatusCode::OK);
    let snapshot = json(&body);
    assert_eq!(snapshot["current"], 1);
    assert_eq!(snapshot["actionsLast3Days"], 1);
    assert_eq!(snapshot["history100"][99]["status"], "inProgress");
    assert_eq!(stored["Read"]["history"]["2025-06-15"], 1);
}

#[tokio::test]
async fn create_rejects_invalid_target() {
    let store = temp_path("http-invalid.json");
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "name": "Read", "target": "lots" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("positive integer"));
    assert!(!store.exists());
}

#[tokio::test]
async fn create_rejects_missing_name() {
    let store = temp_path("http-missing-name.json");
    let app = app(&store);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "target": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_unreadable_body_with_json_error() {
    let store = temp_path("http-bad-body.json");
    let app = app(&store);

    for (content_type, body) in [
        (Some("application/json"), "{ \"name\": "),
        (Some("text/plain"), "name=Read"),
        (None, "{\"name\": \"Read\", \"target\": 1}"),
        (Some("application/json"), "[1, 2]"),
    ] {
        let (status, response) = send_raw(&app, content_type, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(json(&response)["error"].is_string(), "{response}");
    }
    assert!(!store.exists());
}

#[tokio::test]
async fn increment_unknown_task_is_not_found() {
    let store = temp_path("http-unknown.json");
    let app = app(&store);

    let (status, body) = send(&app, Method::POST, "/api/tasks/Nope/increment", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "Task not found");
}

#[tokio::test]
async fn task_names_are_percent_decoded() {
    let store = temp_path("http-decoded.json");
    let app = app(&store);
    send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "name": "Deep Work", "target": 1 })),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/api/tasks/Deep%20Work/increment", None).await;
    std::fs::remove_file(&store).ok();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["streak"], 1);
}

#[tokio::test]
async fn delete_reports_success_then_not_found() {
    let store = temp_path("http-delete.json");
    let app = app(&store);
    send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "name": "Read", "target": 1 })),
    )
    .await;

    let (first, first_body) = send(&app, Method::DELETE, "/api/tasks/Read", None).await;
    let (second, second_body) = send(&app, Method::DELETE, "/api/tasks/Read", None).await;
    std::fs::remove_file(&store).ok();

    assert_eq!(first, StatusCode::OK);
    assert_eq!(json(&first_body)["success"], true);
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(json(&second_body)["success"], false);
}

#[tokio::test]
async fn list_and_index_render_every_task() {
    let store = temp_path("http-list.json");
    let app = app(&store);
    for name in ["Read", "Walk"] {
        send(
            &app,
            Method::POST,
            "/api/tasks",
            Some(serde_json::json!({ "name": name, "target": 1 })),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    let (page_status, page) = send(&app, Method::GET, "/", None).await;
    std::fs::remove_file(&store).ok();

    assert_eq!(status, StatusCode::OK);
    let habits = json(&body);
    assert_eq!(habits[0]["name"], "Read");
    assert_eq!(habits[1]["name"], "Walk");
    assert_eq!(page_status, StatusCode::OK);
    assert!(page.contains("<h2>Read"));
    assert!(page.contains("<h2>Walk"));
}
