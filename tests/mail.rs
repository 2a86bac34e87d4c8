//! Gmail client against a mock server.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use httpmock::prelude::*;
use serde_json::json;

use draftsmith::mail::{GmailClient, MailError, Mailbox};

fn client(server: &MockServer) -> GmailClient {
    GmailClient::new(reqwest::Client::new(), server.base_url(), "tok")
}

#[tokio::test]
async fn fetch_latest_reads_the_newest_message() {
    let server = MockServer::start_async().await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gmail/v1/users/me/messages")
                .query_param("maxResults", "3")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "messages": [{"id": "m2"}, {"id": "m1"}],
                "resultSizeEstimate": 2
            }));
        })
        .await;

    let html = "<html><body><p>Hello,</p><p>how many seats do we get?</p></body></html>";
    let message = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gmail/v1/users/me/messages/m2")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "id": "m2",
                "payload": {
                    "headers": [
                        {"name": "From", "value": "Ada Lovelace <ada@example.com>"},
                        {"name": "Subject", "value": "Seat limits?"}
                    ],
                    "parts": [
                        {"body": {"data": URL_SAFE_NO_PAD.encode(html)}}
                    ]
                }
            }));
        })
        .await;

    let email = client(&server).fetch_latest().await.unwrap().unwrap();

    assert_eq!(email.sender_name, "Ada Lovelace");
    assert_eq!(email.sender_email, "ada@example.com");
    assert_eq!(email.subject, "Seat limits?");
    assert_eq!(email.body, "Hello,\nhow many seats do we get?");
    listing.assert_async().await;
    message.assert_async().await;
}

#[tokio::test]
async fn padded_body_data_decodes_too() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages");
            then.status(200)
                .json_body(json!({"messages": [{"id": "m1"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages/m1");
            then.status(200).json_body(json!({
                "payload": {
                    "headers": [{"name": "From", "value": "ops@example.com"}],
                    "body": {"data": URL_SAFE.encode("plain text question")}
                }
            }));
        })
        .await;

    let email = client(&server).fetch_latest().await.unwrap().unwrap();

    // Bare address, padded base64, body directly on the payload.
    assert_eq!(email.sender_name, "");
    assert_eq!(email.sender_email, "ops@example.com");
    assert_eq!(email.subject, "");
    assert_eq!(email.body, "plain text question");
}

#[tokio::test]
async fn empty_mailbox_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages");
            then.status(200).json_body(json!({"resultSizeEstimate": 0}));
        })
        .await;

    assert!(client(&server).fetch_latest().await.unwrap().is_none());
}

#[tokio::test]
async fn message_without_from_header_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages");
            then.status(200)
                .json_body(json!({"messages": [{"id": "m1"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages/m1");
            then.status(200).json_body(json!({
                "payload": {
                    "headers": [{"name": "Subject", "value": "no sender"}],
                    "body": {"data": URL_SAFE_NO_PAD.encode("x")}
                }
            }));
        })
        .await;

    let err = client(&server).fetch_latest().await.unwrap_err();
    assert!(matches!(
        err,
        MailError::MalformedMessage {
            what: "From header"
        }
    ));
}

#[tokio::test]
async fn create_draft_files_an_rfc822_reply() {
    let server = MockServer::start_async().await;
    let profile = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gmail/v1/users/me/profile")
                .header("authorization", "Bearer tok");
            then.status(200)
                .json_body(json!({"emailAddress": "me@corp.example"}));
        })
        .await;

    let raw = URL_SAFE.encode(
        "From: me@corp.example\r\nTo: ada@example.com\r\nSubject: Re: Seat limits?\r\n\r\nFive seats per tier.",
    );
    let draft = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/gmail/v1/users/me/drafts")
                .header("authorization", "Bearer tok")
                .json_body(json!({"message": {"raw": raw}}));
            then.status(200)
                .json_body(json!({"id": "r-123", "message": {"id": "m9"}}));
        })
        .await;

    let id = client(&server)
        .create_draft("ada@example.com", "Re: Seat limits?", "Five seats per tier.")
        .await
        .unwrap();

    assert_eq!(id, "r-123");
    profile.assert_async().await;
    draft.assert_async().await;
}

#[tokio::test]
async fn expired_token_surfaces_the_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gmail/v1/users/me/messages");
            then.status(401).body("Invalid Credentials");
        })
        .await;

    let err = client(&server).fetch_latest().await.unwrap_err();
    assert!(matches!(err, MailError::Api { status: 401, .. }));
}
