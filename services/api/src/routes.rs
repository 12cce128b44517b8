use crate::infra::AppState;
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lead_funnel::assessment::{AnswerSet, IntakeWizard, SegmentNarrative, WizardStep, TOTAL_STEPS};
use lead_funnel::dispatch::{CrmConnector, MailingListConnector, ResultsMailer};
use lead_funnel::gate::{submission_router, SubmissionService};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_funnel_routes<C, M, E>(
    service: Arc<SubmissionService<C, M, E>>,
) -> axum::Router
where
    C: CrmConnector + 'static,
    M: MailingListConnector + 'static,
    E: ResultsMailer + 'static,
{
    submission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/intake/steps/:step",
            axum::routing::get(step_endpoint),
        )
        .route("/api/v1/results", axum::routing::get(results_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct StepView {
    #[serde(flatten)]
    pub(crate) step: WizardStep,
    /// Canonical value already held for this step's field, if any.
    pub(crate) current_answer: Option<String>,
    pub(crate) answered: bool,
    pub(crate) total_steps: usize,
}

/// Stateless view of one wizard step. Answers gathered so far ride along as
/// query parameters, so the view can report the step's current value.
pub(crate) async fn step_endpoint(
    Path(step): Path<usize>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<StepView>, StatusCode> {
    let step = IntakeWizard::step_at(step).ok_or(StatusCode::NOT_FOUND)?;
    let answers = AnswerSet::from_params(
        params.iter().map(|(key, value)| (key.as_str(), value.as_str())),
    );
    let current_answer = step.field.and_then(|field| answers.value(field));
    Ok(Json(StepView {
        answered: current_answer.is_some(),
        current_answer,
        step,
        total_steps: TOTAL_STEPS,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsQuery {
    score: u8,
}

/// Narrative for a score, used by the results page and the email link.
pub(crate) async fn results_endpoint(
    Query(query): Query<ResultsQuery>,
) -> Json<SegmentNarrative> {
    Json(SegmentNarrative::for_score(query.score))
}
