//! Outbound WhatsApp Cloud API message bodies

use serde::{Deserialize, Serialize};

/// Message kind of an outbound body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundKind {
    Text,
    Interactive,
    Template,
}

/// Plain text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<bool>,
}

/// Request body for `POST /{phone-number-id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub messaging_product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<String>,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: OutboundKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<Interactive>,
}

/// Interactive message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractiveKind {
    Button,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    Text,
    Image,
    Video,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "type")]
    pub kind: HeaderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentLink>,
}

impl Header {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: HeaderKind::Text,
            text: Some(text.into()),
            image: None,
            video: None,
            document: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyText {
    pub text: String,
}

/// Button payload as the Cloud API expects it: `{"type":"reply","reply":{..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyButton {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply: ReplyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

/// Action block: `buttons` for button messages, `button` + `sections` for lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ReplyButton>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ListSection>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactive {
    #[serde(rename = "type")]
    pub kind: InteractiveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub body: BodyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<BodyText>,
    pub action: Action,
}

impl OutboundMessage {
    /// Short human-readable summary for logs and CLI output.
    pub fn summary(&self) -> String {
        match (&self.text, &self.interactive) {
            (Some(text), _) => format!("text to {}: {}", self.to, first_line(&text.body)),
            (None, Some(interactive)) => {
                let options = match interactive.kind {
                    InteractiveKind::Button => interactive
                        .action
                        .buttons
                        .as_ref()
                        .map_or(0, |b| b.len()),
                    InteractiveKind::List => interactive
                        .action
                        .sections
                        .as_ref()
                        .map_or(0, |s| s.iter().map(|sec| sec.rows.len()).sum()),
                };
                let kind = match interactive.kind {
                    InteractiveKind::Button => "buttons",
                    InteractiveKind::List => "list",
                };
                format!(
                    "{} to {} ({} options): {}",
                    kind,
                    self.to,
                    options,
                    first_line(&interactive.body.text)
                )
            }
            (None, None) => format!("{:?} to {}", self.kind, self.to),
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
