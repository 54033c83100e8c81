#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use library_server::config::{AppConfig, DeletePolicy, StorageBackend};
use library_server::models::Book;
use library_server::repository::{Directory, Repository};
use library_server::services::Services;
use library_server::{api, AppState};

/// Router over the in-memory backend plus handles on its state
pub struct TestApp {
    pub router: Router,
    pub directory: Arc<Directory>,
    pub services: Arc<Services>,
}

/// Build a test `AppConfig` with in-memory storage and the given delete policy
pub fn test_config(delete_policy: DeletePolicy) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.api.delete_policy = delete_policy;
    config
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(test_config(DeletePolicy::Idempotent)).await
}

/// Build the full application router, as `main.rs` does, on top of the
/// in-memory backend
pub async fn build_test_app_with(config: AppConfig) -> TestApp {
    let directory = Arc::new(Directory::default());
    let repository = Repository::in_memory_with(directory.clone());
    build_test_app_from(directory, repository, config).await
}

/// Build the router over a prepared repository and seed the reference data:
/// users 1 `admin` and 2 `user`, books 1 `Dune` and 2 `Solaris`, publisher 1
pub async fn build_test_app_from(
    directory: Arc<Directory>,
    repository: Repository,
    config: AppConfig,
) -> TestApp {
    directory.register_user(1, "admin");
    directory.register_user(2, "user");
    directory.register_publisher(1, "Chilton Books");

    let services = Arc::new(Services::new(repository, config.api.delete_policy));
    for title in ["Dune", "Solaris"] {
        services
            .books
            .save(Book {
                title: Some(title.to_string()),
                ..Default::default()
            })
            .await
            .expect("Failed to seed book");
    }

    let state = AppState {
        config: Arc::new(config),
        services: services.clone(),
    };

    TestApp {
        router: api::create_router(state),
        directory,
        services,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    content_type: &str,
    body: &Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: &Value) -> Response {
    send_json(app, Method::POST, uri, "application/json", body).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: &Value) -> Response {
    send_json(app, Method::PUT, uri, "application/json", body).await
}

pub async fn patch_json(app: &TestApp, uri: &str, body: &Value) -> Response {
    send_json(app, Method::PATCH, uri, "application/merge-patch+json", body).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub fn header<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .expect("header is not ASCII")
}

/// Number of records reported by `X-Total-Count` on the collection endpoint
pub async fn total_count(app: &TestApp, resource: &str) -> u64 {
    let response = get(app, &format!("/api/{resource}")).await;
    header(&response, "x-total-count")
        .parse()
        .expect("numeric total count")
}
