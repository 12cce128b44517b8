use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lead_funnel::assessment::{AnswerField, Lead};
use lead_funnel::dispatch::clickup::task_payload;
use lead_funnel::dispatch::{
    ConnectorError, CrmConnector, LeadDispatcher, MailingListConnector, ResultsMailer,
};
use lead_funnel::gate::{RawSubmission, SubmissionService};
use serde_json::Value;

#[derive(Default)]
struct RecordingCrm {
    tasks: Mutex<Vec<Value>>,
    fail: bool,
}

#[async_trait]
impl CrmConnector for RecordingCrm {
    async fn create_task(&self, lead: &Lead) -> Result<(), ConnectorError> {
        if self.fail {
            return Err(ConnectorError::Rejected {
                status: 502,
                body: "upstream down".to_string(),
            });
        }
        self.tasks
            .lock()
            .expect("task log poisoned")
            .push(task_payload(lead));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingList {
    subscriptions: Mutex<Vec<String>>,
}

#[async_trait]
impl MailingListConnector for RecordingList {
    async fn subscribe(&self, lead: &Lead) -> Result<(), ConnectorError> {
        self.subscriptions
            .lock()
            .expect("subscription log poisoned")
            .push(lead.contact.email.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, u8)>>,
}

#[async_trait]
impl ResultsMailer for RecordingMailer {
    async fn send_results(&self, lead: &Lead) -> Result<(), ConnectorError> {
        self.sent
            .lock()
            .expect("mail log poisoned")
            .push((lead.contact.email.clone(), lead.score));
        Ok(())
    }
}

fn submission(notes: &str) -> RawSubmission {
    let mut answers = std::collections::HashMap::new();
    for (field, value) in [
        ("q1", "no"),
        ("q2", "yes"),
        ("q3", "no"),
        ("q4", "yes"),
        ("q5", "no"),
        ("q6", "yes"),
        ("q7", "no"),
        ("q8", "yes"),
        ("q9", "no"),
        ("q10", "yes"),
        ("current_stage", "small-team"),
        ("next_90_day_goal", "streamline"),
        ("biggest_obstacle", "team-dependence"),
        ("preferred_path", "coaching"),
    ] {
        answers.insert(field.to_string(), value.to_string());
    }
    if !notes.is_empty() {
        answers.insert("notes".to_string(), notes.to_string());
    }
    RawSubmission {
        name: "Margaret Hamilton".to_string(),
        email: "margaret@example.com".to_string(),
        answers,
    }
}

fn service(
    crm: Arc<RecordingCrm>,
    list: Arc<RecordingList>,
    mailer: Arc<RecordingMailer>,
) -> SubmissionService<RecordingCrm, RecordingList, RecordingMailer> {
    SubmissionService::new(LeadDispatcher::new(
        crm,
        list,
        mailer,
        Duration::from_secs(5),
    ))
}

#[tokio::test]
async fn submission_fans_out_to_every_collaborator() {
    let crm = Arc::new(RecordingCrm::default());
    let list = Arc::new(RecordingList::default());
    let mailer = Arc::new(RecordingMailer::default());

    let (lead, report) = service(crm.clone(), list.clone(), mailer.clone())
        .submit(submission("call me"))
        .await
        .expect("submission finalizes");

    // 7 favorable answers of 10
    assert_eq!(lead.score, 70);
    assert_eq!(lead.segment.key(), "system-optimizer");
    assert!(report.all_succeeded());

    let tasks = crm.tasks.lock().expect("task log poisoned");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Margaret Hamilton");

    let subscriptions = list.subscriptions.lock().expect("subscription log poisoned");
    assert_eq!(subscriptions.as_slice(), ["margaret@example.com"]);

    let sent = mailer.sent.lock().expect("mail log poisoned");
    assert_eq!(sent.as_slice(), [("margaret@example.com".to_string(), 70)]);
}

#[tokio::test]
async fn failed_crm_leg_does_not_block_the_others() {
    let crm = Arc::new(RecordingCrm {
        fail: true,
        ..RecordingCrm::default()
    });
    let list = Arc::new(RecordingList::default());
    let mailer = Arc::new(RecordingMailer::default());

    let (_, report) = service(crm, list.clone(), mailer.clone())
        .submit(submission(""))
        .await
        .expect("submission still completes");

    assert!(!report.clickup);
    assert!(report.mailing_list);
    assert!(report.email);
    assert_eq!(
        list.subscriptions
            .lock()
            .expect("subscription log poisoned")
            .len(),
        1
    );
    assert_eq!(mailer.sent.lock().expect("mail log poisoned").len(), 1);
}

#[tokio::test]
async fn crm_payload_omits_empty_notes() {
    let crm = Arc::new(RecordingCrm::default());
    let list = Arc::new(RecordingList::default());
    let mailer = Arc::new(RecordingMailer::default());

    service(crm.clone(), list, mailer)
        .submit(submission(""))
        .await
        .expect("submission finalizes");

    let tasks = crm.tasks.lock().expect("task log poisoned");
    let fields = tasks[0]["custom_fields"].as_array().expect("fields array");
    // contact pair, score, segment, 10 binaries, 4 qualifying; no notes field
    assert_eq!(fields.len(), 17);
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_collaborators() {
    let crm = Arc::new(RecordingCrm::default());
    let list = Arc::new(RecordingList::default());
    let mailer = Arc::new(RecordingMailer::default());

    let mut bad = submission("");
    bad.answers.remove(AnswerField::Q2.key());
    let result = service(crm.clone(), list.clone(), mailer.clone())
        .submit(bad)
        .await;

    assert!(result.is_err());
    assert!(crm.tasks.lock().expect("task log poisoned").is_empty());
    assert!(list
        .subscriptions
        .lock()
        .expect("subscription log poisoned")
        .is_empty());
    assert!(mailer.sent.lock().expect("mail log poisoned").is_empty());
}
