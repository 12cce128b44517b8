//! HTTP finalization gate: validates contact details, recomputes the score,
//! and hands the lead to the dispatcher.

use crate::assessment::{AnswerSet, ContactDetails, GateError, Lead, SegmentNarrative};
use crate::dispatch::{
    CrmConnector, DispatchReport, LeadDispatcher, MailingListConnector, ResultsMailer,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Wire shape of a submission: contact details plus the raw answers keyed by
/// field name. Unknown keys and values are tolerated, never fatal.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

impl RawSubmission {
    fn answer_set(&self) -> AnswerSet {
        AnswerSet::from_params(
            self.answers
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
    }
}

/// The gate service: finalization followed by the single dispatch call.
pub struct SubmissionService<C, M, E> {
    dispatcher: LeadDispatcher<C, M, E>,
}

impl<C, M, E> SubmissionService<C, M, E>
where
    C: CrmConnector,
    M: MailingListConnector,
    E: ResultsMailer,
{
    pub fn new(dispatcher: LeadDispatcher<C, M, E>) -> Self {
        Self { dispatcher }
    }

    /// Validate, finalize, dispatch. Individual collaborator failures do not
    /// surface as errors; the caller gets the lead and the per-leg report.
    pub async fn submit(
        &self,
        submission: RawSubmission,
    ) -> Result<(Lead, DispatchReport), GateError> {
        let contact = ContactDetails {
            name: submission.name.clone(),
            email: submission.email.clone(),
        };
        let lead = Lead::finalize(contact, submission.answer_set())?;
        let report = self.dispatcher.dispatch(&lead).await;
        Ok((lead, report))
    }
}

/// Router exposing the submission endpoint.
pub fn submission_router<C, M, E>(service: Arc<SubmissionService<C, M, E>>) -> Router
where
    C: CrmConnector + 'static,
    M: MailingListConnector + 'static,
    E: ResultsMailer + 'static,
{
    Router::new()
        .route("/api/v1/intake/submissions", post(submit_handler))
        .with_state(service)
}

async fn submit_handler<C, M, E>(
    State(service): State<Arc<SubmissionService<C, M, E>>>,
    axum::Json(submission): axum::Json<RawSubmission>,
) -> Response
where
    C: CrmConnector + 'static,
    M: MailingListConnector + 'static,
    E: ResultsMailer + 'static,
{
    match service.submit(submission).await {
        Ok((lead, report)) => {
            let narrative = SegmentNarrative::for_score(lead.score);
            let payload = json!({
                "success": true,
                "message": "Successfully submitted!",
                "score": lead.score,
                "segment": lead.segment.key(),
                "dispatch": report,
                "results_path": narrative.call_to_action.href,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ConnectorError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct AlwaysOk;
    struct AlwaysFails;

    #[async_trait]
    impl CrmConnector for AlwaysOk {
        async fn create_task(&self, _lead: &Lead) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    #[async_trait]
    impl CrmConnector for AlwaysFails {
        async fn create_task(&self, _lead: &Lead) -> Result<(), ConnectorError> {
            Err(ConnectorError::NotConfigured)
        }
    }

    #[async_trait]
    impl MailingListConnector for AlwaysOk {
        async fn subscribe(&self, _lead: &Lead) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ResultsMailer for AlwaysOk {
        async fn send_results(&self, _lead: &Lead) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    fn answers() -> HashMap<String, String> {
        let mut map = HashMap::new();
        for q in ["q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9", "q10"] {
            map.insert(q.to_string(), "yes".to_string());
        }
        map.insert("current_stage".to_string(), "solo".to_string());
        map.insert("next_90_day_goal".to_string(), "automate".to_string());
        map.insert("biggest_obstacle".to_string(), "manual-tasks".to_string());
        map.insert("preferred_path".to_string(), "software".to_string());
        map
    }

    fn submission() -> RawSubmission {
        RawSubmission {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            answers: answers(),
        }
    }

    fn service<C: CrmConnector>(crm: C) -> Arc<SubmissionService<C, AlwaysOk, AlwaysOk>> {
        Arc::new(SubmissionService::new(LeadDispatcher::new(
            Arc::new(crm),
            Arc::new(AlwaysOk),
            Arc::new(AlwaysOk),
            Duration::from_secs(5),
        )))
    }

    #[tokio::test]
    async fn submit_handler_returns_ok_with_score_and_segment() {
        let response = submit_handler(State(service(AlwaysOk)), axum::Json(submission())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submit_handler_succeeds_despite_a_failed_leg() {
        let response =
            submit_handler(State(service(AlwaysFails)), axum::Json(submission())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submit_handler_rejects_missing_email() {
        let mut bad = submission();
        bad.email = "not-an-email".to_string();
        let response = submit_handler(State(service(AlwaysOk)), axum::Json(bad)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn submit_handler_rejects_incomplete_answers() {
        let mut bad = submission();
        bad.answers.remove("q5");
        let response = submit_handler(State(service(AlwaysOk)), axum::Json(bad)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn submit_recomputes_score_from_answers() {
        let (lead, report) = service(AlwaysOk)
            .submit(submission())
            .await
            .expect("submission succeeds");
        // q1/q3 "yes" are unfavorable
        assert_eq!(lead.score, 80);
        assert!(report.all_succeeded());
    }
}
