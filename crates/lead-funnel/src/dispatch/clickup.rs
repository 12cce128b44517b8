//! ClickUp task creation for a qualified lead. The list's custom fields are
//! addressed by their fixed UUIDs; dropdown fields take the option's ordinal
//! position rather than its label.

use crate::assessment::{AnswerField, Lead};
use crate::config::ClickUpConfig;
use crate::dispatch::mapping::{ordinal, OrdinalGroup};
use crate::dispatch::{ConnectorError, CrmConnector};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

const EMAIL_FIELD: &str = "264d1c14-d47d-4439-b613-8220d335dd15";
const FULL_NAME_FIELD: &str = "84379c1b-105f-477f-9053-194e0824e38a";
const FREEDOM_SCORE_FIELD: &str = "01b68954-abc5-4113-9152-3efa74d6975a";
const SEGMENT_FIELD: &str = "56f2a9ad-e10e-4496-8d02-0b76416fa8ca";
const NOTES_FIELD: &str = "07c35e4a-b55f-433c-9679-fed25d79d567";

const BINARY_FIELDS: [(AnswerField, &str); 10] = [
    (AnswerField::Q1, "ee90ea95-61ec-49f0-b996-fac2b44303f4"),
    (AnswerField::Q2, "8740efe2-42cf-48cd-b1be-2d6182dadeb1"),
    (AnswerField::Q3, "002ad36c-9b09-4b46-bf7e-effcc5ec7567"),
    (AnswerField::Q4, "d2049d9a-f2d5-46f2-bf93-2d867ff34dc3"),
    (AnswerField::Q5, "94e9fdf1-c1cb-42f7-91ac-2ff66c09367d"),
    (AnswerField::Q6, "57885880-d327-455e-af08-9fa462d64b2b"),
    (AnswerField::Q7, "ba73cf98-7aeb-4599-9ffb-f82cc626cf65"),
    (AnswerField::Q8, "287147c4-2b9a-4cd1-b0e2-5ec5897537b6"),
    (AnswerField::Q9, "1ca09971-cec7-4ada-9865-1aa22fc1f2e2"),
    (AnswerField::Q10, "ab999400-60a6-47ed-bfda-be7b4fd02672"),
];

const QUALIFYING_FIELDS: [(AnswerField, &str, OrdinalGroup); 4] = [
    (
        AnswerField::CurrentStage,
        "68d8e2ce-a364-4cfb-870a-5e4db3e4eac5",
        OrdinalGroup::CurrentStage,
    ),
    (
        AnswerField::NinetyDayGoal,
        "1ae62202-b169-4b10-9b09-abc91e4391e2",
        OrdinalGroup::NinetyDayGoal,
    ),
    (
        AnswerField::BiggestObstacle,
        "94392c2d-631b-4fb1-8f3a-a8b051c240c1",
        OrdinalGroup::BiggestObstacle,
    ),
    (
        AnswerField::PreferredPath,
        "861a2d8a-c208-4b65-9b43-47f54729476a",
        OrdinalGroup::PreferredPath,
    ),
];

#[derive(Debug, Serialize)]
struct CustomField {
    id: &'static str,
    value: Value,
}

/// Build the task body. Fields that resolve to nothing are omitted rather
/// than sent as null.
pub fn task_payload(lead: &Lead) -> Value {
    let mut custom_fields = vec![
        CustomField {
            id: EMAIL_FIELD,
            value: json!(lead.contact.email),
        },
        CustomField {
            id: FULL_NAME_FIELD,
            value: json!(lead.contact.name),
        },
        CustomField {
            id: FREEDOM_SCORE_FIELD,
            value: json!(lead.score),
        },
    ];

    if let Some(segment) = ordinal(OrdinalGroup::Segment, lead.segment.key()) {
        custom_fields.push(CustomField {
            id: SEGMENT_FIELD,
            value: json!(segment),
        });
    }

    for (field, id) in BINARY_FIELDS {
        let Some(answer) = lead.answers.value(field) else {
            continue;
        };
        if let Some(index) = ordinal(OrdinalGroup::YesNo, &answer) {
            custom_fields.push(CustomField { id, value: json!(index) });
        }
    }

    for (field, id, group) in QUALIFYING_FIELDS {
        let Some(answer) = lead.answers.value(field) else {
            continue;
        };
        if let Some(index) = ordinal(group, &answer) {
            custom_fields.push(CustomField { id, value: json!(index) });
        }
    }

    if let Some(notes) = lead.notes() {
        custom_fields.push(CustomField {
            id: NOTES_FIELD,
            value: json!(notes),
        });
    }

    json!({
        "name": lead.contact.name,
        "description": task_description(lead),
        "custom_fields": custom_fields,
    })
}

/// Human-readable task body mirroring the custom fields, for reviewers who
/// read the task rather than the field panel.
fn task_description(lead: &Lead) -> String {
    let answer = |field: AnswerField| lead.answers.label(field).unwrap_or_default();
    let mut body = format!(
        "**Freedom Score:** {}%\n**Segment:** {}\n\n**Yes/No Questions:**\n",
        lead.score,
        lead.segment.label()
    );
    for (field, _) in BINARY_FIELDS {
        body.push_str(&format!("- {} {}\n", field.prompt(), answer(field)));
    }
    body.push_str("\n**Qualifying Questions:**\n");
    for (field, _, _) in QUALIFYING_FIELDS {
        body.push_str(&format!("- {} {}\n", field.prompt(), answer(field)));
    }
    body.push_str(&format!(
        "- Additional Notes: {}",
        lead.notes().unwrap_or_else(|| "None".to_string())
    ));
    body
}

/// HTTP connector against the ClickUp v2 task API.
pub struct ClickUpConnector {
    client: reqwest::Client,
    config: Option<ClickUpConfig>,
}

impl ClickUpConnector {
    pub fn new(client: reqwest::Client, config: Option<ClickUpConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CrmConnector for ClickUpConnector {
    async fn create_task(&self, lead: &Lead) -> Result<(), ConnectorError> {
        let config = self.config.as_ref().ok_or(ConnectorError::NotConfigured)?;
        let url = format!(
            "https://api.clickup.com/api/v2/list/{}/task",
            config.list_id
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", &config.api_key)
            .json(&task_payload(lead))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ConnectorError::Rejected { status, body })
    }
}
