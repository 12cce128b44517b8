//! Operator diagnostics for the downstream integrations. These talk to the
//! real APIs with the configured credentials, so they are deliberately
//! explicit about what they are sending.

use clap::Args;
use lead_funnel::assessment::{AnswerField, AnswerSet, ContactDetails, Lead};
use lead_funnel::config::AppConfig;
use lead_funnel::dispatch::{
    BeehiivConnector, ClickUpConnector, CrmConnector, MailingListConnector,
};
use lead_funnel::error::AppError;
use serde_json::Value;

#[derive(Args, Debug)]
pub(crate) struct CrmSmokeArgs {
    /// Name for the throwaway task
    #[arg(long, default_value = "Smoke Test Lead")]
    name: String,
    /// Email recorded on the task
    #[arg(long, default_value = "smoke-test@example.com")]
    email: String,
}

#[derive(Args, Debug)]
pub(crate) struct ListSmokeArgs {
    /// Address to subscribe
    #[arg(long, default_value = "smoke-test@example.com")]
    email: String,
}

/// Print the CRM list's custom fields, with dropdown option ordinals.
pub(crate) async fn run_crm_fields() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let clickup = config
        .integrations
        .clickup
        .ok_or_else(|| AppError::Integration("CLICKUP_API_KEY/CLICKUP_LIST_ID not set".into()))?;

    let url = format!("https://api.clickup.com/api/v2/list/{}/field", clickup.list_id);
    let response = reqwest::Client::new()
        .get(&url)
        .header("Authorization", &clickup.api_key)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Integration(format!(
            "field listing failed with {status}: {body}"
        )));
    }

    let body: Value = response.json().await?;
    let fields = body["fields"].as_array().cloned().unwrap_or_default();
    println!("custom fields on list {}:", clickup.list_id);
    for field in fields {
        println!(
            "- {} (id: {}, type: {})",
            field["name"].as_str().unwrap_or("?"),
            field["id"].as_str().unwrap_or("?"),
            field["type"].as_str().unwrap_or("?"),
        );
        if let Some(options) = field["type_config"]["options"].as_array() {
            for option in options {
                println!(
                    "    {}: {}",
                    option["orderindex"],
                    option["name"].as_str().unwrap_or("?"),
                );
            }
        }
    }
    Ok(())
}

/// Every question answered, so the smoke task exercises every mapped field.
fn smoke_lead(name: &str, email: &str) -> Result<Lead, AppError> {
    let mut answers = AnswerSet::default();
    for field in AnswerField::ALL {
        if field.is_binary() {
            answers
                .set(field, "yes")
                .map_err(|err| AppError::Integration(err.to_string()))?;
        }
    }
    for (field, value) in [
        (AnswerField::CurrentStage, "small-team"),
        (AnswerField::NinetyDayGoal, "automate"),
        (AnswerField::BiggestObstacle, "manual-tasks"),
        (AnswerField::PreferredPath, "software"),
        (AnswerField::Notes, "diagnostic task, safe to delete"),
    ] {
        answers
            .set(field, value)
            .map_err(|err| AppError::Integration(err.to_string()))?;
    }
    Lead::finalize(
        ContactDetails {
            name: name.to_string(),
            email: email.to_string(),
        },
        answers,
    )
    .map_err(|err| AppError::Integration(err.to_string()))
}

/// Create one fully-populated task so a misconfigured field shows up here
/// instead of on a real lead.
pub(crate) async fn run_crm_smoke(args: CrmSmokeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let lead = smoke_lead(&args.name, &args.email)?;
    let connector = ClickUpConnector::new(reqwest::Client::new(), config.integrations.clickup);

    println!(
        "creating smoke task '{}' (score {}, segment {})",
        args.name,
        lead.score,
        lead.segment.key()
    );
    connector
        .create_task(&lead)
        .await
        .map_err(|err| AppError::Integration(err.to_string()))?;
    println!("task created; remove it from the list when done");
    Ok(())
}

/// Subscribe a test address; a repeat run should also succeed since the
/// already-subscribed response is treated as success.
pub(crate) async fn run_list_smoke(args: ListSmokeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let lead = smoke_lead("List Smoke Test", &args.email)?;
    let connector =
        BeehiivConnector::new(reqwest::Client::new(), config.integrations.mailing_list);

    println!("subscribing {}", args.email);
    connector
        .subscribe(&lead)
        .await
        .map_err(|err| AppError::Integration(err.to_string()))?;
    println!("subscription accepted");
    Ok(())
}
