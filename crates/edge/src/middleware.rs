//! The gate, mounted as axum middleware.
//!
//! Runs once per inbound request before any handler: adapts the request to
//! the gate's inputs, computes the decision, and turns it into pass-through
//! or a redirect. The gate itself never fails, so neither does this layer.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use url::form_urlencoded;
use uuid::Uuid;

use revhub_gate::{Decision, bearer_token, evaluate};

use crate::config::EdgeConfig;
use crate::context::AuthContext;

/// Immutable gate state, built once at startup and shared across requests.
#[derive(Debug, Clone)]
pub struct GateState {
    config: Arc<EdgeConfig>,
}

impl GateState {
    pub fn new(config: Arc<EdgeConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    let config = state.config();

    let evaluation = {
        let request_id = Uuid::now_v7();
        let span = tracing::debug_span!("gate", %request_id);
        let _enter = span.enter();

        let path = req.uri().path();
        let headers = req.headers();
        let cookie = cookie_value(headers, &config.auth_cookie);
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(cookie, authorization);

        let evaluation = evaluate(&config.routes, path, token, Utc::now());
        tracing::debug!(
            path,
            class = evaluation.class.as_str(),
            decision = ?evaluation.decision,
            "gate decision"
        );
        evaluation
    };

    match evaluation.decision {
        Decision::Allow => {
            if let Some(claims) = evaluation.claims {
                req.extensions_mut().insert(AuthContext::new(claims));
            }
            next.run(req).await
        }
        Decision::RedirectToLogin { return_path } => {
            login_redirect(&config.login_path, &return_path)
        }
        Decision::RedirectToDashboard => {
            Redirect::temporary(&config.dashboard_path).into_response()
        }
        Decision::RedirectToUnauthorized => {
            Redirect::temporary(&config.unauthorized_path).into_response()
        }
    }
}

/// Redirect to the login flow with the denied path preserved for replay.
fn login_redirect(login_path: &str, return_path: &str) -> Response {
    let return_url: String = form_urlencoded::byte_serialize(return_path.as_bytes()).collect();
    Redirect::temporary(&format!("{login_path}?returnUrl={return_url}")).into_response()
}

/// Value of the named cookie, if the request carries one.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
