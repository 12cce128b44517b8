//! Mailing-list subscription via the beehiiv publications API. An
//! already-subscribed response counts as success.

use crate::assessment::Lead;
use crate::config::MailingListConfig;
use crate::dispatch::{ConnectorError, MailingListConnector};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Subscribers who came through the intake wizard are tagged with these
/// attribution markers.
const UTM_SOURCE: &str = "website";
const UTM_MEDIUM: &str = "intake_form";
const REFERRING_SITE: &str = "freedom-intake-form";

pub fn subscription_payload(lead: &Lead) -> Value {
    json!({
        "email": lead.contact.email,
        "reactivate_existing": false,
        "send_welcome_email": false,
        "utm_source": UTM_SOURCE,
        "utm_medium": UTM_MEDIUM,
        "referring_site": REFERRING_SITE,
        "custom_fields": [
            { "name": "full_name", "value": lead.contact.name },
            { "name": "freedom_score", "value": lead.score.to_string() },
            { "name": "segment", "value": lead.segment.label() },
        ],
    })
}

pub struct BeehiivConnector {
    client: reqwest::Client,
    config: Option<MailingListConfig>,
}

impl BeehiivConnector {
    pub fn new(client: reqwest::Client, config: Option<MailingListConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl MailingListConnector for BeehiivConnector {
    async fn subscribe(&self, lead: &Lead) -> Result<(), ConnectorError> {
        let config = self.config.as_ref().ok_or(ConnectorError::NotConfigured)?;
        let url = format!(
            "https://api.beehiiv.com/v2/publications/{}/subscriptions",
            config.publication_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&subscription_payload(lead))
            .send()
            .await?;

        // 409 means the address is already on the list
        if response.status().is_success() || response.status().as_u16() == 409 {
            return Ok(());
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ConnectorError::Rejected { status, body })
    }
}
