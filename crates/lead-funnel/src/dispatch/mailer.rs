//! Transactional results email, delivered through an HTTP send API.

use crate::assessment::Lead;
use crate::config::EmailConfig;
use crate::dispatch::{ConnectorError, ResultsMailer};
use async_trait::async_trait;
use serde_json::{json, Value};

pub fn subject(lead: &Lead) -> String {
    format!("Your Freedom Score Results - {}%", lead.score)
}

/// Link back to the results page, pre-populated so the page can render
/// without any server-side state.
pub fn results_url(base_url: &str, lead: &Lead) -> Result<String, ConnectorError> {
    let mut url = reqwest::Url::parse(base_url)
        .and_then(|base| base.join("/results"))
        .map_err(|err| ConnectorError::Rejected {
            status: 0,
            body: format!("invalid base url '{base_url}': {err}"),
        })?;
    url.query_pairs_mut()
        .append_pair("score", &lead.score.to_string())
        .append_pair("segment", lead.segment.key())
        .append_pair("name", &lead.contact.name)
        .append_pair("email", &lead.contact.email);
    Ok(url.into())
}

pub fn text_body(lead: &Lead, results_url: &str) -> String {
    format!(
        "Hi {name},\n\n\
         Thank you for completing the Freedom Assessment!\n\n\
         Your Freedom Score: {score}%\n\n\
         You've been identified as a {segment}.\n\n\
         View your complete results and personalized plan here:\n{results_url}\n\n\
         Best regards,\nThe Team",
        name = lead.contact.name,
        score = lead.score,
        segment = lead.segment.label(),
    )
}

pub fn html_body(lead: &Lead, results_url: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"margin:0;padding:0;background-color:#080808;\
         font-family:'Inter',sans-serif;\">\n\
         <div style=\"max-width:600px;margin:0 auto;padding:32px;background-color:#0f0f0f;\
         color:#d5dbe6;\">\n\
         <h1 style=\"color:#ffffff;font-size:24px;\">Your Freedom Score Results</h1>\n\
         <p>Hi {name},</p>\n\
         <p>Thank you for completing the Freedom Assessment. Here are your results:</p>\n\
         <div style=\"text-align:center;padding:24px;background-color:#1a1b20;\
         border-radius:8px;\">\n\
         <div style=\"color:#ffffff;font-size:42px;font-weight:700;\">{score}%</div>\n\
         <div style=\"color:#a0a0a0;font-size:14px;text-transform:uppercase;\">Freedom Score</div>\n\
         </div>\n\
         <p>Based on your assessment, you've been identified as a \
         <strong style=\"color:#ffffff;\">{segment}</strong>.</p>\n\
         <p style=\"text-align:center;\"><a href=\"{results_url}\" \
         style=\"display:inline-block;background:#ffffff;color:#000000;font-weight:600;\
         text-decoration:none;padding:14px 32px;border-radius:8px;\">\
         View Your Full Results &amp; Next Steps</a></p>\n\
         <p>Best regards,<br>The Team</p>\n\
         </div>\n</body>\n</html>",
        name = lead.contact.name,
        score = lead.score,
        segment = lead.segment.label(),
    )
}

/// Connector against a transactional email HTTP API.
pub struct HttpResultsMailer {
    client: reqwest::Client,
    config: Option<EmailConfig>,
    base_url: String,
}

impl HttpResultsMailer {
    pub fn new(client: reqwest::Client, config: Option<EmailConfig>, base_url: String) -> Self {
        Self {
            client,
            config,
            base_url,
        }
    }

    fn message(&self, config: &EmailConfig, lead: &Lead) -> Result<Value, ConnectorError> {
        let results_url = results_url(&self.base_url, lead)?;
        Ok(json!({
            "from": config.from_address,
            "to": lead.contact.email,
            "reply_to": config.from_address,
            "subject": subject(lead),
            "text": text_body(lead, &results_url),
            "html": html_body(lead, &results_url),
        }))
    }
}

#[async_trait]
impl ResultsMailer for HttpResultsMailer {
    async fn send_results(&self, lead: &Lead) -> Result<(), ConnectorError> {
        let config = self.config.as_ref().ok_or(ConnectorError::NotConfigured)?;
        let response = self
            .client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&self.message(config, lead)?)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AnswerField, AnswerSet, ContactDetails};

    fn lead() -> Lead {
        let mut answers = AnswerSet::default();
        for field in AnswerField::ALL {
            if field.is_binary() {
                answers.set(field, "no").unwrap();
            }
        }
        answers.set(AnswerField::CurrentStage, "solo").unwrap();
        answers
            .set(AnswerField::NinetyDayGoal, "streamline")
            .unwrap();
        answers
            .set(AnswerField::BiggestObstacle, "no-systems")
            .unwrap();
        answers
            .set(AnswerField::PreferredPath, "diy-learning")
            .unwrap();
        Lead::finalize(
            ContactDetails {
                name: "Alan Turing".to_string(),
                email: "alan+test@example.com".to_string(),
            },
            answers,
        )
        .unwrap()
    }

    #[test]
    fn subject_carries_the_score() {
        assert_eq!(subject(&lead()), "Your Freedom Score Results - 20%");
    }

    #[test]
    fn results_url_encodes_the_handoff() {
        let url = results_url("https://example.com", &lead()).unwrap();
        assert!(url.starts_with("https://example.com/results?"));
        assert!(url.contains("score=20"));
        assert!(url.contains("segment=foundation-builder"));
        assert!(url.contains("name=Alan+Turing"));
        assert!(url.contains("email=alan%2Btest%40example.com"));
    }

    #[test]
    fn results_url_rejects_a_bad_base() {
        assert!(results_url("not a url", &lead()).is_err());
    }

    #[test]
    fn bodies_mention_score_segment_and_link() {
        let lead = lead();
        let url = results_url("http://localhost:3000", &lead).unwrap();
        let text = text_body(&lead, &url);
        assert!(text.contains("Your Freedom Score: 20%"));
        assert!(text.contains("Foundation Builder"));
        assert!(text.contains(&url));

        let html = html_body(&lead, &url);
        assert!(html.contains("20%"));
        assert!(html.contains("Foundation Builder"));
        assert!(html.contains(&url));
    }

    #[tokio::test]
    async fn unconfigured_mailer_reports_not_configured() {
        let mailer = HttpResultsMailer::new(
            reqwest::Client::new(),
            None,
            "http://localhost:3000".to_string(),
        );
        let err = mailer.send_results(&lead()).await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotConfigured));
    }
}
