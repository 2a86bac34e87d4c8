//! Mailbox access.
//!
//! The workflow itself never touches mail; the binary fetches the newest
//! message, runs the workflow over its body, and files the answer as a
//! draft reply. [`Mailbox`] is the seam that keeps the binary testable,
//! [`GmailClient`] is the production implementation over the Gmail REST
//! API.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use miette::Diagnostic;
use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One inbound message, reduced to what the workflow and the reply need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    /// Display name from the From header, empty when the header carried a
    /// bare address.
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    /// Plain text body. HTML bodies arrive here already stripped to text.
    pub body: String,
}

/// Errors from mailbox operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    #[diagnostic(code(draftsmith::mail::transport))]
    Transport(#[from] reqwest::Error),

    #[error("mail API returned status {status}: {message}")]
    #[diagnostic(
        code(draftsmith::mail::api),
        help("Check GMAIL_ACCESS_TOKEN; access tokens expire after an hour.")
    )]
    Api { status: u16, message: String },

    #[error("message body is not valid base64url")]
    #[diagnostic(code(draftsmith::mail::decode))]
    Decode(#[from] base64::DecodeError),

    #[error("decoded message body is not UTF-8")]
    #[diagnostic(code(draftsmith::mail::encoding))]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The message exists but lacks a piece we need (header, body part).
    #[error("message is missing {what}")]
    #[diagnostic(code(draftsmith::mail::malformed))]
    MalformedMessage { what: &'static str },
}

/// A mailbox the binary can read from and file drafts into.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Returns the newest message, or `None` when the mailbox is empty.
    async fn fetch_latest(&self) -> Result<Option<EmailMessage>, MailError>;

    /// Files a draft reply and returns the provider's draft id.
    async fn create_draft(&self, to: &str, subject: &str, body: &str)
    -> Result<String, MailError>;
}

/// Gmail REST client.
///
/// Authenticates with a pre-obtained OAuth access token; token refresh is
/// the operator's problem, not this client's.
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    async fn fetch_message(&self, id: &str) -> Result<MessageResponse, MailError> {
        let response = self
            .http
            .get(format!("{}/gmail/v1/users/me/messages/{id}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        read_json(response).await
    }

    async fn profile_address(&self) -> Result<String, MailError> {
        let response = self
            .http
            .get(format!("{}/gmail/v1/users/me/profile", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let profile: ProfileResponse = read_json(response).await?;
        Ok(profile.email_address)
    }
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn fetch_latest(&self) -> Result<Option<EmailMessage>, MailError> {
        let response = self
            .http
            .get(format!("{}/gmail/v1/users/me/messages", self.base_url))
            .query(&[("maxResults", "3")])
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let listing: MessageListResponse = read_json(response).await?;

        let Some(newest) = listing.messages.first() else {
            return Ok(None);
        };
        let message = self.fetch_message(&newest.id).await?;
        tracing::debug!(target: "draftsmith::mail", message_id = %newest.id, "fetched message");

        let sender = header(&message.payload.headers, "From")
            .ok_or(MailError::MalformedMessage { what: "From header" })?;
        let (sender_name, sender_email) = parse_sender(sender);
        let subject = header(&message.payload.headers, "Subject")
            .unwrap_or_default()
            .to_string();

        let data = message
            .payload
            .parts
            .first()
            .and_then(|part| part.body.data.as_deref())
            .or(message.payload.body.data.as_deref())
            .ok_or(MailError::MalformedMessage { what: "body data" })?;
        let raw = URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))?;
        let body = html_to_text(&String::from_utf8(raw)?);

        Ok(Some(EmailMessage {
            sender_name,
            sender_email,
            subject,
            body,
        }))
    }

    async fn create_draft(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, MailError> {
        let from = self.profile_address().await?;
        let rfc822 = format!("From: {from}\r\nTo: {to}\r\nSubject: {subject}\r\n\r\n{body}");
        let request = DraftRequest {
            message: DraftMessage {
                raw: URL_SAFE.encode(rfc822.as_bytes()),
            },
        };

        let response = self
            .http
            .post(format!("{}/gmail/v1/users/me/drafts", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;
        let draft: DraftResponse = read_json(response).await?;
        Ok(draft.id)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MailError> {
    let status = response.status();
    if !status.is_success() {
        return Err(MailError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        });
    }
    Ok(response.json().await?)
}

/// Splits a From header into display name and address.
///
/// `"Ada Lovelace <ada@example.com>"` yields the pair; a bare address
/// yields an empty name.
fn parse_sender(raw: &str) -> (String, String) {
    let raw = raw.trim();
    match raw.rsplit_once(' ') {
        Some((name, addr)) if addr.starts_with('<') => (
            name.trim().trim_matches('"').to_string(),
            addr.trim_matches(['<', '>']).to_string(),
        ),
        _ => (String::new(), raw.trim_matches(['<', '>']).to_string()),
    }
}

/// Flattens an HTML body (or passes a plain text one through) to text.
fn html_to_text(body: &str) -> String {
    let document = Html::parse_document(body);
    let mut text = String::new();
    for segment in document.root_element().text() {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(trimmed);
    }
    text
}

fn header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    payload: MessagePayload,
}

#[derive(Debug, Default, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    parts: Vec<MessagePart>,
    #[serde(default)]
    body: MessageBody,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct MessagePart {
    #[serde(default)]
    body: MessageBody,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    email_address: String,
}

#[derive(Debug, Serialize)]
struct DraftRequest {
    message: DraftMessage,
}

#[derive(Debug, Serialize)]
struct DraftMessage {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    id: String,
}
