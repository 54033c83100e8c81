//! API handlers for the library REST endpoints

pub mod alerts;
pub mod crud;
pub mod health;
pub mod openapi;
pub mod pagination;

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    models::{Book, BookCopy, Category, CheckOut, Notification, PatronAccount, WaitList},
    AppState,
};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    // Entity resources
    let api = Router::new()
        .merge(crud::routes::<PatronAccount>())
        .merge(crud::routes::<Book>())
        .merge(crud::routes::<CheckOut>())
        .merge(crud::routes::<BookCopy>())
        .merge(crud::routes::<Category>())
        .merge(crud::routes::<Notification>())
        .merge(crud::routes::<WaitList>());

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    app.merge(openapi)
        .layer(middleware::map_response_with_state(
            state,
            alerts::error_alert_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
