//! Fan-out of a finalized lead to the downstream collaborators: CRM task,
//! mailing-list subscription, and results email. Each leg fails on its own;
//! none of them can sink the submission.

pub mod clickup;
pub mod mailer;
pub mod mailing_list;
pub mod mapping;

use crate::assessment::Lead;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub use clickup::ClickUpConnector;
pub use mailer::HttpResultsMailer;
pub use mailing_list::BeehiivConnector;

/// Failure of a single outbound leg.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("credentials not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Creates a task for the lead in the CRM.
#[async_trait]
pub trait CrmConnector: Send + Sync {
    async fn create_task(&self, lead: &Lead) -> Result<(), ConnectorError>;
}

/// Subscribes the lead to the mailing list.
#[async_trait]
pub trait MailingListConnector: Send + Sync {
    async fn subscribe(&self, lead: &Lead) -> Result<(), ConnectorError>;
}

/// Sends the lead their results email.
#[async_trait]
pub trait ResultsMailer: Send + Sync {
    async fn send_results(&self, lead: &Lead) -> Result<(), ConnectorError>;
}

/// Per-collaborator outcome of one dispatch. The submission as a whole
/// succeeds whenever the dispatch itself ran, whatever these flags say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub clickup: bool,
    pub mailing_list: bool,
    pub email: bool,
}

impl DispatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.clickup && self.mailing_list && self.email
    }
}

/// Runs the three legs concurrently, each under its own timeout and failure
/// boundary.
pub struct LeadDispatcher<C, M, E> {
    crm: Arc<C>,
    mailing_list: Arc<M>,
    mailer: Arc<E>,
    leg_timeout: Duration,
}

impl<C, M, E> LeadDispatcher<C, M, E>
where
    C: CrmConnector,
    M: MailingListConnector,
    E: ResultsMailer,
{
    pub fn new(crm: Arc<C>, mailing_list: Arc<M>, mailer: Arc<E>, leg_timeout: Duration) -> Self {
        Self {
            crm,
            mailing_list,
            mailer,
            leg_timeout,
        }
    }

    /// Fan out the lead. Never returns an error: a failed leg is logged and
    /// reported as `false`.
    pub async fn dispatch(&self, lead: &Lead) -> DispatchReport {
        let (clickup, mailing_list, email) = tokio::join!(
            self.run_leg("clickup", self.crm.create_task(lead)),
            self.run_leg("mailing_list", self.mailing_list.subscribe(lead)),
            self.run_leg("email", self.mailer.send_results(lead)),
        );

        let report = DispatchReport {
            clickup,
            mailing_list,
            email,
        };
        info!(
            email = %lead.contact.email,
            score = lead.score,
            segment = lead.segment.key(),
            ?report,
            "lead dispatched"
        );
        report
    }

    async fn run_leg<F>(&self, leg: &'static str, call: F) -> bool
    where
        F: std::future::Future<Output = Result<(), ConnectorError>>,
    {
        let outcome = match timeout(self.leg_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ConnectorError::TimedOut(self.leg_timeout)),
        };
        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!(leg, %err, "dispatch leg failed");
                false
            }
        }
    }
}
