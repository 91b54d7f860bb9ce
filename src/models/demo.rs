//! Demo transcript models
//!
//! Scenarios are canned conversations replayed by the player. They are
//! normally built in code (see `demo::fixtures`) but deserialize from JSON
//! too, so a marketing team can swap in their own transcripts.

use serde::{Deserialize, Serialize};

/// Quick-reply button shown under a bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

impl Button {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Link preview card attached to a bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LinkPreview {
    /// Host part of the preview URL, or `None` if the URL does not parse.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
    }
}

/// Where a user's selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Button,
    List,
}

/// One message in a scenario. Order in the scenario is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    BotText {
        text: String,
        time: String,
    },
    BotButtons {
        text: String,
        time: String,
        #[serde(default)]
        buttons: Vec<Button>,
    },
    BotLink {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        time: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_preview: Option<LinkPreview>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        buttons: Vec<Button>,
    },
    UserText {
        text: String,
        time: String,
    },
    UserReplySelection {
        time: String,
        /// Bot text quoted above the selection.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to_text: Option<String>,
        /// Title of the chosen option.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// Id of the chosen button or list row.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        choice_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<ReplySource>,
    },
}

impl Message {
    pub fn time(&self) -> &str {
        match self {
            Message::BotText { time, .. }
            | Message::BotButtons { time, .. }
            | Message::BotLink { time, .. }
            | Message::UserText { time, .. }
            | Message::UserReplySelection { time, .. } => time,
        }
    }

    /// True for messages sent by the customer (right-aligned bubbles).
    pub fn is_customer(&self) -> bool {
        matches!(
            self,
            Message::UserText { .. } | Message::UserReplySelection { .. }
        )
    }

    /// Main text of the bubble, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::BotText { text, .. }
            | Message::BotButtons { text, .. }
            | Message::UserText { text, .. } => Some(text),
            Message::BotLink { text, .. } => text.as_deref(),
            Message::UserReplySelection { value, .. } => value.as_deref(),
        }
    }

    /// Buttons offered by this message (empty for customer messages).
    pub fn buttons(&self) -> &[Button] {
        match self {
            Message::BotButtons { buttons, .. } | Message::BotLink { buttons, .. } => buttons,
            _ => &[],
        }
    }

    /// Choice id recorded by a reply selection.
    pub fn choice_id(&self) -> Option<&str> {
        match self {
            Message::UserReplySelection { choice_id, .. } => choice_id.as_deref(),
            _ => None,
        }
    }
}

/// One canned conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoScenario {
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}
