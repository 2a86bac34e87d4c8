//! Answer the newest mailbox question and file the reply as a draft.
//!
//! Reads configuration from the environment (a `.env` file is honored),
//! fetches the most recent message, runs the answering workflow over its
//! body, and files the verified answer as a Gmail draft addressed to the
//! sender. Any failure along the way exits non-zero with a full report;
//! an unanswerable run never files a half-checked draft.

use std::time::Duration;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use draftsmith::config::Settings;
use draftsmith::mail::{GmailClient, Mailbox};
use draftsmith::workflow;

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,draftsmith=info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn init_miette() {
    // Pretty panic reports
    miette::set_panic_hook();
}

/// Prefixes `Re:` unless the subject already carries one.
fn reply_subject(subject: &str) -> String {
    let trimmed = subject.trim();
    if trimmed
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("re:"))
    {
        trimmed.to_string()
    } else {
        format!("Re: {trimmed}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    init_miette();
    run().await
}

async fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .into_diagnostic()?;

    let mailbox = GmailClient::new(
        http.clone(),
        &settings.mail.base_url,
        &settings.mail.access_token,
    );
    let email = mailbox
        .fetch_latest()
        .await?
        .ok_or_else(|| miette::miette!("mailbox is empty; nothing to answer"))?;
    info!(
        sender = %email.sender_email,
        subject = %email.subject,
        "answering newest message"
    );

    let app = workflow::from_settings(&settings, http)?;
    let outcome = app.invoke(&email.body).await?;
    info!(
        steps = outcome.steps,
        generations = outcome.generations,
        "answer verified"
    );

    let draft_id = mailbox
        .create_draft(
            &email.sender_email,
            &reply_subject(&email.subject),
            &outcome.answer,
        )
        .await?;
    info!(draft_id = %draft_id, to = %email.sender_email, "draft filed");

    Ok(())
}
