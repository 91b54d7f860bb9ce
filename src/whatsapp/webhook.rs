//! Webhook parser: turns inbound notifications into interaction records.

use serde::Serialize;

use crate::models::{WebhookInteractive, WebhookMessage, WebhookPayload};

/// Coarse classification of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Button,
    List,
    Text,
    Unknown,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Button => "button",
            MessageType::List => "list",
            MessageType::Text => "text",
            MessageType::Unknown => "unknown",
        }
    }
}

/// One inbound message, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub user_id: String,
    pub payload_id: Option<String>,
    pub message_type: MessageType,
    pub text_content: Option<String>,
    pub contact_name: Option<String>,
}

/// An inbound message together with its sender.
#[derive(Debug, Clone)]
pub struct Envelope<'a> {
    pub user_id: &'a str,
    pub message: &'a WebhookMessage,
    pub contact_name: Option<&'a str>,
}

/// Flatten entries, changes and messages, resolving each sender's profile
/// name from the contacts of the same change.
pub fn extract_messages(payload: &WebhookPayload) -> Vec<Envelope<'_>> {
    let mut out = Vec::new();
    for entry in &payload.entry {
        for change in &entry.changes {
            let value = &change.value;
            for message in &value.messages {
                let contact_name = value
                    .contacts
                    .iter()
                    .find(|c| c.wa_id.as_deref() == Some(message.from.as_str()))
                    .and_then(|c| c.profile.as_ref())
                    .and_then(|p| p.name.as_deref());
                out.push(Envelope {
                    user_id: &message.from,
                    message,
                    contact_name,
                });
            }
        }
    }
    out
}

fn button_reply_id(interactive: &WebhookInteractive) -> Option<&str> {
    if interactive.kind.as_deref() != Some("button_reply") {
        return None;
    }
    interactive
        .button_reply
        .as_ref()?
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
}

fn list_reply_id(interactive: &WebhookInteractive) -> Option<&str> {
    if interactive.kind.as_deref() != Some("list_reply") {
        return None;
    }
    interactive
        .list_reply
        .as_ref()?
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
}

/// Button or list reply id of an interactive message.
pub fn extract_payload_id(message: &WebhookMessage) -> Option<&str> {
    if message.kind.as_deref() != Some("interactive") {
        return None;
    }
    let interactive = message.interactive.as_ref()?;
    button_reply_id(interactive).or_else(|| list_reply_id(interactive))
}

fn classify(message: &WebhookMessage) -> MessageType {
    match (message.kind.as_deref(), &message.interactive, &message.text) {
        (Some("interactive"), Some(interactive), _) => match interactive.kind.as_deref() {
            Some("button_reply") => MessageType::Button,
            Some("list_reply") => MessageType::List,
            _ => MessageType::Unknown,
        },
        (Some("text"), _, Some(_)) => MessageType::Text,
        _ => MessageType::Unknown,
    }
}

/// One [`Interaction`] per inbound message. Status-only notifications yield
/// nothing.
pub fn parse_webhook(payload: &WebhookPayload) -> Vec<Interaction> {
    extract_messages(payload)
        .into_iter()
        .map(|env| Interaction {
            user_id: env.user_id.to_string(),
            payload_id: extract_payload_id(env.message).map(str::to_owned),
            message_type: classify(env.message),
            text_content: env.message.text.as_ref().and_then(|t| t.body.clone()),
            contact_name: env.contact_name.map(str::to_owned),
        })
        .collect()
}

/// Parse a raw JSON body. Only syntactically broken JSON is an error.
pub fn parse_webhook_json(body: &str) -> serde_json::Result<Vec<Interaction>> {
    let payload: WebhookPayload = serde_json::from_str(body)?;
    Ok(parse_webhook(&payload))
}

/// Answer the `GET` subscription handshake: returns the challenge to echo
/// back when the mode and token match.
pub fn verify_subscription<'a>(
    mode: &str,
    token: &str,
    challenge: &'a str,
    verify_token: &str,
) -> Option<&'a str> {
    if mode == "subscribe" && !verify_token.is_empty() && token == verify_token {
        Some(challenge)
    } else {
        None
    }
}
