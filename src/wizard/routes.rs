//! REST endpoints over the wizard session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, SubmitError};

use super::session::{FinalizeOutcome, SubmitOutcome, WizardSession};
use super::steps::StepId;

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub session: Arc<WizardSession>,
}

/// GET /api/wizard/status
///
/// Onboarding id, finalization state, and whether the data is valid.
async fn get_status(State(state): State<WizardRouteState>) -> impl IntoResponse {
    let snapshot = state.session.snapshot().await;
    let finalized = state.session.is_finalized().await;
    Json(json!({
        "onboardingId": snapshot.onboarding_id,
        "valid": snapshot.status.is_valid(),
        "completed": snapshot.status.is_finalized(),
        "errorsVisible": finalized,
        "finalizedAt": state.session.finalized_at().await,
    }))
}

/// GET /api/wizard/steps
///
/// The full step list; error lists are empty until finalization.
async fn get_steps(State(state): State<WizardRouteState>) -> impl IntoResponse {
    Json(state.session.steps_for_ui().await)
}

/// GET /api/wizard/stepper
///
/// The condensed stepper projection.
async fn get_stepper(State(state): State<WizardRouteState>) -> impl IntoResponse {
    Json(state.session.stepper().await)
}

/// POST /api/wizard/steps/{step}/submit
async fn submit_step(
    State(state): State<WizardRouteState>,
    Path(step): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let Ok(step) = step.parse::<StepId>() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("unknown step {step}")})),
        );
    };

    match state.session.submit_step(step, payload).await {
        Ok(SubmitOutcome::Accepted) => (StatusCode::OK, Json(json!({"outcome": "accepted"}))),
        Ok(SubmitOutcome::Rejected { errors }) => (
            StatusCode::OK,
            Json(json!({"outcome": "rejected", "errors": errors})),
        ),
        Ok(SubmitOutcome::Failed { message }) => (
            StatusCode::OK,
            Json(json!({"outcome": "failed", "notification": message})),
        ),
        Ok(SubmitOutcome::Superseded) => {
            (StatusCode::OK, Json(json!({"outcome": "superseded"})))
        }
        Err(Error::Submit(SubmitError::LocalValidation { errors })) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "localValidation", "errors": errors})),
        ),
        Err(Error::Submit(SubmitError::AlreadyInFlight { .. })) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "alreadyInFlight"})),
        ),
        Err(Error::Submit(SubmitError::NotInFlow { .. })) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "notInFlow"})),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        ),
    }
}

/// POST /api/wizard/finalize
async fn finalize(State(state): State<WizardRouteState>) -> impl IntoResponse {
    match state.session.finalize().await {
        Ok(FinalizeOutcome::Completed) => {
            (StatusCode::OK, Json(json!({"outcome": "completed"})))
        }
        Ok(FinalizeOutcome::Rejected) => (
            StatusCode::OK,
            Json(json!({"outcome": "rejected", "errorsVisible": true})),
        ),
        Ok(FinalizeOutcome::Failed { message }) => (
            StatusCode::OK,
            Json(json!({"outcome": "failed", "notification": message})),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        ),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigateRequest {
    from: String,
    direction: Direction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Direction {
    Next,
    Previous,
}

/// POST /api/wizard/navigate
///
/// Returns the target route, or a no-op marker at a boundary.
async fn navigate(
    State(state): State<WizardRouteState>,
    Json(request): Json<NavigateRequest>,
) -> impl IntoResponse {
    let Ok(from) = request.from.parse::<StepId>() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("unknown step {}", request.from)})),
        );
    };

    let url = match request.direction {
        Direction::Next => state.session.navigate_next(from).await,
        Direction::Previous => state.session.navigate_previous(from).await,
    };
    match url {
        Some(url) => (StatusCode::OK, Json(json!({"url": url}))),
        None => (StatusCode::OK, Json(json!({"noOp": true}))),
    }
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    Router::new()
        .route("/api/wizard/status", get(get_status))
        .route("/api/wizard/steps", get(get_steps))
        .route("/api/wizard/stepper", get(get_stepper))
        .route("/api/wizard/steps/{step}/submit", post(submit_step))
        .route("/api/wizard/finalize", post(finalize))
        .route("/api/wizard/navigate", post(navigate))
        .with_state(state)
}
