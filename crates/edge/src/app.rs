//! Router shell for the edge.
//!
//! Page rendering belongs to the frontend bundle and all domain data to the
//! backend API (external collaborators); the handlers here are the thin
//! surface the gate protects, and what the black-box suite observes
//! decisions through.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower::ServiceBuilder;

use crate::config::EdgeConfig;
use crate::context::AuthContext;
use crate::middleware::{GateState, gate_middleware};

pub fn build_app(config: EdgeConfig) -> Router {
    let state = GateState::new(Arc::new(config));

    Router::new()
        .route("/", get(landing))
        .route("/login", get(login))
        .route("/healthz", get(healthz))
        .route("/dashboard", get(dashboard))
        .route("/unauthorized", get(unauthorized))
        .route("/revisions", get(revisions))
        .route("/revisions/:id", get(revision_detail))
        .route("/approvals", get(approvals))
        .route("/admin/users", get(admin_users))
        .route("/api/*endpoint", get(api_passthrough))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(state, gate_middleware)),
        )
}

async fn landing() -> impl IntoResponse {
    Json(json!({ "page": "landing" }))
}

async fn login(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    Json(json!({ "page": "login", "returnUrl": params.get("returnUrl") }))
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn unauthorized() -> impl IntoResponse {
    Json(json!({ "page": "unauthorized" }))
}

async fn dashboard(Extension(auth): Extension<AuthContext>) -> impl IntoResponse {
    Json(json!({ "page": "dashboard", "role": auth.role().as_str() }))
}

async fn revisions(Extension(auth): Extension<AuthContext>) -> impl IntoResponse {
    Json(json!({ "page": "revisions", "role": auth.role().as_str() }))
}

async fn revision_detail(
    Path(id): Path<String>,
    Extension(auth): Extension<AuthContext>,
) -> impl IntoResponse {
    Json(json!({ "page": "revision", "id": id, "role": auth.role().as_str() }))
}

async fn approvals(Extension(auth): Extension<AuthContext>) -> impl IntoResponse {
    Json(json!({ "page": "approvals", "role": auth.role().as_str() }))
}

async fn admin_users(Extension(auth): Extension<AuthContext>) -> impl IntoResponse {
    Json(json!({ "page": "admin.users", "role": auth.role().as_str() }))
}

/// The deployed edge proxies this namespace to the backend API verbatim;
/// the backend performs its own authorization on every call.
async fn api_passthrough(Path(endpoint): Path<String>) -> impl IntoResponse {
    Json(json!({ "delegated": true, "endpoint": endpoint }))
}
