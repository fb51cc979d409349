//! Integration tests: HttpControlPlane against an in-process fake
//! control plane.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use skiff_control::HttpControlPlane;
use skiff_core::{ControlPlane, DeploymentRequest, RolloutCoordinator};

/// What the fake control plane has seen and holds.
#[derive(Default)]
struct FakeState {
    /// Bodies of update-service calls, in arrival order.
    updates: Mutex<Vec<Value>>,
    /// Documents registered, in arrival order.
    registered: Mutex<Vec<Value>>,
    /// When set, update-service answers 500.
    fail_updates: bool,
}

fn fake_router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/v1/describe-service", post(describe_service))
        .route("/v1/describe-task-definition", post(describe_task_definition))
        .route("/v1/register-task-definition", post(register_task_definition))
        .route("/v1/update-service", post(update_service))
        .with_state(state)
}

async fn describe_service(Json(body): Json<Value>) -> Json<Value> {
    let service = body["service"].as_str().unwrap_or_default();
    if service == "ghost" {
        return Json(json!({ "services": [] }));
    }
    Json(json!({
        "services": [{
            "name": service,
            "clusterArn": "arn:aws:ecs:us-east-1:1:cluster/prod",
            "taskDefinition": "arn:aws:ecs:us-east-1:1:task-definition/app-family:7",
            "desiredCount": 3,
        }]
    }))
}

async fn describe_task_definition(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "taskDefinition": {
            "family": "app-family",
            "containerDefinitions": [
                {"image": "acme/app:old", "name": "app", "essential": true}
            ],
            "networkMode": "awsvpc",
            "cpu": "256",
        }
    }))
}

async fn register_task_definition(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.registered.lock().unwrap().push(body.clone());
    let family = body["family"].as_str().unwrap_or("unknown");
    Json(json!({
        "taskDefinition": {
            "family": family,
            "revision": 8,
            "arn": format!("arn:aws:ecs:us-east-1:1:task-definition/{family}:8"),
        }
    }))
}

async fn update_service(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if state.fail_updates {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "service update rejected".to_string(),
        ));
    }
    state.updates.lock().unwrap().push(body);
    Ok(Json(json!({})))
}

async fn spawn_fake(state: Arc<FakeState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn request(apps: &[&str]) -> DeploymentRequest {
    DeploymentRequest {
        cluster: "prod".to_string(),
        repository: "acme/app".to_string(),
        tag: "abc123".to_string(),
        region: "us-east-1".to_string(),
        apps: apps.iter().map(|s| s.to_string()).collect(),
        debug: false,
    }
}

#[tokio::test]
async fn describe_service_parses_descriptor() {
    let endpoint = spawn_fake(Arc::new(FakeState::default())).await;
    let client = HttpControlPlane::new(&endpoint).unwrap();

    let services = client.describe_service("prod", "web").await.unwrap();

    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "web");
    assert_eq!(services[0].desired_count, 3);
}

#[tokio::test]
async fn describe_service_empty_for_unknown() {
    let endpoint = spawn_fake(Arc::new(FakeState::default())).await;
    let client = HttpControlPlane::new(&endpoint).unwrap();

    let services = client.describe_service("prod", "ghost").await.unwrap();
    assert!(services.is_empty());
}

#[tokio::test]
async fn non_2xx_surfaces_status_and_body() {
    let state = Arc::new(FakeState {
        fail_updates: true,
        ..Default::default()
    });
    let endpoint = spawn_fake(state).await;
    let client = HttpControlPlane::new(&endpoint).unwrap();

    let err = client
        .update_service("prod", "web", 3, "arn:whatever")
        .await
        .unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("500"), "missing status in: {msg}");
    assert!(msg.contains("service update rejected"), "missing body in: {msg}");
}

#[tokio::test]
async fn connection_refused_is_an_error() {
    // Port 1 is never listening.
    let client = HttpControlPlane::new("http://127.0.0.1:1").unwrap();
    assert!(client.describe_service("prod", "web").await.is_err());
}

#[tokio::test]
async fn full_rollout_against_fake_control_plane() {
    let state = Arc::new(FakeState::default());
    let endpoint = spawn_fake(state.clone()).await;
    let client = HttpControlPlane::new(&endpoint).unwrap();

    let req = request(&["web", "worker"]);
    let mut coordinator = RolloutCoordinator::new(&client);
    let outcome = coordinator.run(&req, "web", |_| {}).await.unwrap();

    assert_eq!(outcome.revision.revision, 8);
    assert_eq!(outcome.updated, vec!["web", "worker"]);

    // The registered document kept the pass-through container fields
    // and swapped only the image.
    let registered = state.registered.lock().unwrap();
    assert_eq!(registered.len(), 1);
    let container = &registered[0]["containerDefinitions"][0];
    assert_eq!(container["image"], "acme/app:abc123");
    assert_eq!(container["name"], "app");
    assert_eq!(container["essential"], true);
    assert_eq!(registered[0]["networkMode"], "awsvpc");

    // Both updates carry the exemplar's desired count and the new ARN.
    let updates = state.updates.lock().unwrap();
    assert_eq!(updates.len(), 2);
    for (update, service) in updates.iter().zip(["web", "worker"]) {
        assert_eq!(update["service"], service);
        assert_eq!(update["desiredCount"], 3);
        assert_eq!(
            update["taskDefinition"],
            "arn:aws:ecs:us-east-1:1:task-definition/app-family:8"
        );
    }
}
