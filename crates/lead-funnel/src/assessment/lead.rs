use crate::assessment::answers::{AnswerField, AnswerSet};
use crate::assessment::scoring::{score, Segment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact details collected at the finalization gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    #[error("name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("question '{0}' has not been answered")]
    Unanswered(&'static str),
}

/// A qualified lead: complete answers, contact details, and the score and
/// segment computed at finalization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub contact: ContactDetails,
    pub answers: AnswerSet,
    pub score: u8,
    pub segment: Segment,
    pub submitted_at: DateTime<Utc>,
}

impl Lead {
    /// Gatekeeper for submission: validates contact details and answer
    /// completeness, then computes score and segment from the answers. A
    /// caller-supplied score is never trusted.
    pub fn finalize(contact: ContactDetails, answers: AnswerSet) -> Result<Self, GateError> {
        let name = contact.name.trim();
        if name.is_empty() {
            return Err(GateError::MissingName);
        }

        let email = contact.email.trim();
        if !is_plausible_email(email) {
            return Err(GateError::InvalidEmail(contact.email.clone()));
        }

        if let Some(field) = answers.missing_required() {
            return Err(GateError::Unanswered(field.key()));
        }

        let score = score(&answers);
        Ok(Self {
            contact: ContactDetails {
                name: name.to_string(),
                email: email.to_string(),
            },
            answers,
            score,
            segment: Segment::for_score(score),
            submitted_at: Utc::now(),
        })
    }

    /// First name only, for greeting copy.
    pub fn first_name(&self) -> &str {
        self.contact
            .name
            .split_whitespace()
            .next()
            .unwrap_or(&self.contact.name)
    }

    pub fn notes(&self) -> Option<String> {
        self.answers.value(AnswerField::Notes)
    }
}

/// Minimal check: something before and after a single-position `@`, no
/// embedded whitespace. Deliverability is the mail provider's problem.
fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
