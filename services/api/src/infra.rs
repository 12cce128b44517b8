use lead_funnel::config::IntegrationsConfig;
use lead_funnel::dispatch::{
    BeehiivConnector, ClickUpConnector, HttpResultsMailer, LeadDispatcher,
};
use lead_funnel::gate::SubmissionService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ProductionSubmissionService =
    SubmissionService<ClickUpConnector, BeehiivConnector, HttpResultsMailer>;

/// Wire the real connectors from configuration. Unconfigured integrations
/// become legs that report failure instead of refusing to start.
pub(crate) fn build_submission_service(
    integrations: IntegrationsConfig,
) -> Arc<ProductionSubmissionService> {
    let client = reqwest::Client::new();
    let crm = Arc::new(ClickUpConnector::new(client.clone(), integrations.clickup));
    let mailing_list = Arc::new(BeehiivConnector::new(
        client.clone(),
        integrations.mailing_list,
    ));
    let mailer = Arc::new(HttpResultsMailer::new(
        client,
        integrations.email,
        integrations.base_url,
    ));
    Arc::new(SubmissionService::new(LeadDispatcher::new(
        crm,
        mailing_list,
        mailer,
        integrations.dispatch_timeout,
    )))
}
