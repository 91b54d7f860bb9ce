//! Outbound payload builders
//!
//! Pure constructors for Cloud API request bodies. Nothing here touches the
//! network; the handler queues the results in an outbox.

use thiserror::Error;

use crate::models::{
    Action, BodyText, Button, Header, Interactive, InteractiveKind, ListRow, ListSection,
    OutboundKind, OutboundMessage, ReplyButton, ReplyTarget, TextBody,
};

/// Cloud API limit on reply buttons per message.
pub const MAX_BUTTONS: usize = 3;

/// Cloud API limit on rows per list section.
pub const MAX_ROWS_PER_SECTION: usize = 10;

const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Builder validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error(
        "button messages support at most {max} buttons, got {count}; use a list message for more options"
    )]
    TooManyButtons { count: usize, max: usize },
}

/// A product row for list messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// URL a sender would post built messages to.
pub fn messages_endpoint(api_version: &str, phone_number_id: &str) -> String {
    format!("{}/{}/{}/messages", GRAPH_BASE, api_version, phone_number_id)
}

fn envelope(to: &str, kind: OutboundKind) -> OutboundMessage {
    OutboundMessage {
        messaging_product: "whatsapp".to_string(),
        recipient_type: Some("individual".to_string()),
        to: to.to_string(),
        kind,
        text: None,
        interactive: None,
    }
}

/// Build a plain text message.
pub fn create_text_message(to: &str, text: &str, preview_url: bool) -> OutboundMessage {
    let mut message = envelope(to, OutboundKind::Text);
    message.text = Some(TextBody {
        body: text.to_string(),
        preview_url: Some(preview_url),
    });
    message
}

/// Build a reply-button message. Fails if more than [`MAX_BUTTONS`] are given.
pub fn create_button_message(
    to: &str,
    body: &str,
    buttons: &[Button],
    header: Option<&str>,
    footer: Option<&str>,
) -> Result<OutboundMessage, BuildError> {
    if buttons.len() > MAX_BUTTONS {
        return Err(BuildError::TooManyButtons {
            count: buttons.len(),
            max: MAX_BUTTONS,
        });
    }

    let buttons = buttons
        .iter()
        .map(|b| ReplyButton {
            kind: "reply".to_string(),
            reply: ReplyTarget {
                id: b.id.clone(),
                title: b.title.clone(),
            },
        })
        .collect();

    let mut message = envelope(to, OutboundKind::Interactive);
    message.interactive = Some(Interactive {
        kind: InteractiveKind::Button,
        header: non_empty(header).map(Header::text),
        body: BodyText {
            text: body.to_string(),
        },
        footer: non_empty(footer).map(|text| BodyText {
            text: text.to_string(),
        }),
        action: Action {
            buttons: Some(buttons),
            ..Action::default()
        },
    });
    Ok(message)
}

/// Build a list message. `button_text` labels the button that opens the list.
/// Empty row descriptions are dropped.
pub fn create_list_message(
    to: &str,
    body: &str,
    button_text: &str,
    mut sections: Vec<ListSection>,
    header: Option<&str>,
    footer: Option<&str>,
) -> OutboundMessage {
    for row in sections.iter_mut().flat_map(|s| s.rows.iter_mut()) {
        if row.description.as_deref() == Some("") {
            row.description = None;
        }
    }

    let mut message = envelope(to, OutboundKind::Interactive);
    message.interactive = Some(Interactive {
        kind: InteractiveKind::List,
        header: non_empty(header).map(Header::text),
        body: BodyText {
            text: body.to_string(),
        },
        footer: non_empty(footer).map(|text| BodyText {
            text: text.to_string(),
        }),
        action: Action {
            button: Some(button_text.to_string()),
            sections: Some(sections),
            ..Action::default()
        },
    });
    message
}

/// Empty header/footer strings are treated as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Canned messages for the electro-slil flow
// ---------------------------------------------------------------------------

/// Main menu: price / stock / delivery.
pub fn create_main_menu_message(to: &str) -> Result<OutboundMessage, BuildError> {
    create_button_message(
        to,
        "שלום, איך אוכל לעזור?",
        &[
            Button::new("main_price", "מחיר"),
            Button::new("main_stock", "זמינות מלאי"),
            Button::new("main_delivery", "משלוח / איסוף"),
        ],
        None,
        Some("בחר אפשרות מהרשימה"),
    )
}

/// Tool category selection.
pub fn create_category_selection_message(to: &str) -> Result<OutboundMessage, BuildError> {
    create_button_message(
        to,
        "בשמחה. כדי לדייק, איזה סוג אתה מחפש?",
        &[
            Button::new("category_cordless", "מברגה / מקדחה נטענת"),
            Button::new("category_rotary", "מקדחה רוטטת"),
            Button::new("category_hammer", "פטישון לעבודות בטון"),
        ],
        None,
        None,
    )
}

/// Actions offered for a single product.
pub fn create_product_action_message(
    to: &str,
    product_name: &str,
) -> Result<OutboundMessage, BuildError> {
    create_button_message(
        to,
        &format!(
            "מעולה. יש לנו מספר דגמים מקצועיים.\nאחד הדגמים המבוקשים:\n\n{}\n\nמה תרצה לעשות?",
            product_name
        ),
        &product_action_buttons(),
        None,
        None,
    )
}

/// The three buttons shown under a product.
pub fn product_action_buttons() -> Vec<Button> {
    vec![
        Button::new("action_product_page", "לראות את דף המוצר באתר"),
        Button::new("action_quote_request", "לקבל הצעת מחיר מנציג"),
        Button::new("action_human_agent", "נציג אנושי"),
    ]
}

/// Confirm / back / human agent.
pub fn create_confirm_buttons_message(
    to: &str,
    body: &str,
    confirm_id: &str,
    confirm_title: Option<&str>,
) -> Result<OutboundMessage, BuildError> {
    create_button_message(
        to,
        body,
        &[
            Button::new(confirm_id, confirm_title.unwrap_or("אישור")),
            Button::new("action_back", "חזרה"),
            Button::new("action_human_agent", "נציג אנושי"),
        ],
        None,
        None,
    )
}

/// Products as a list message, chunked into sections of at most
/// [`MAX_ROWS_PER_SECTION`] rows titled by their 1-based range.
pub fn create_product_list_message(to: &str, products: &[Product]) -> OutboundMessage {
    let sections = products
        .chunks(MAX_ROWS_PER_SECTION)
        .enumerate()
        .map(|(i, chunk)| {
            let first = i * MAX_ROWS_PER_SECTION + 1;
            let last = first + chunk.len() - 1;
            ListSection {
                title: format!("דגמים {}-{}", first, last),
                rows: chunk
                    .iter()
                    .map(|p| ListRow {
                        id: p.id.clone(),
                        title: p.name.clone(),
                        description: p.description.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    create_list_message(
        to,
        "יש לנו מספר דגמים. בחר דגם מהרשימה:",
        "בחר דגם",
        sections,
        None,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons(n: usize) -> Vec<Button> {
        (0..n)
            .map(|i| Button::new(format!("b{}", i), format!("Button {}", i)))
            .collect()
    }

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("prod_{}", i), format!("Drill {}", i)))
            .collect()
    }

    #[test]
    fn test_button_message_rejects_four_buttons() {
        let err = create_button_message("972500000000", "body", &buttons(4), None, None)
            .unwrap_err();
        assert_eq!(err, BuildError::TooManyButtons { count: 4, max: 3 });
        assert!(err.to_string().contains("at most 3"));
    }

    #[test]
    fn test_button_message_with_three_buttons() {
        let msg = create_button_message("972500000000", "body", &buttons(3), None, None).unwrap();
        let interactive = msg.interactive.as_ref().unwrap();
        assert_eq!(interactive.kind, InteractiveKind::Button);
        let replies = interactive.action.buttons.as_ref().unwrap();
        assert_eq!(replies.len(), 3);
        assert!(replies.iter().all(|b| b.kind == "reply"));
        assert_eq!(replies[2].reply.id, "b2");
    }

    #[test]
    fn test_button_message_json_shape() {
        let msg = create_button_message(
            "972500000000",
            "body",
            &buttons(1),
            Some("Header"),
            Some("Footer"),
        )
        .unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["recipient_type"], "individual");
        assert_eq!(json["type"], "interactive");
        assert_eq!(json["interactive"]["type"], "button");
        assert_eq!(json["interactive"]["header"]["type"], "text");
        assert_eq!(json["interactive"]["header"]["text"], "Header");
        assert_eq!(json["interactive"]["footer"]["text"], "Footer");
        assert_eq!(
            json["interactive"]["action"]["buttons"][0],
            serde_json::json!({ "type": "reply", "reply": { "id": "b0", "title": "Button 0" } })
        );
        assert!(json.get("text").is_none());
        assert!(json["interactive"]["action"].get("sections").is_none());
    }

    #[test]
    fn test_empty_header_is_omitted() {
        let msg = create_button_message("1", "body", &buttons(2), Some(""), None).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["interactive"].get("header").is_none());
        assert!(json["interactive"].get("footer").is_none());
    }

    #[test]
    fn test_text_message() {
        let msg = create_text_message("1", "hello", false);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["body"], "hello");
        assert_eq!(json["text"]["preview_url"], false);
    }

    #[test]
    fn test_product_list_sections_of_ten() {
        let msg = create_product_list_message("1", &products(25));
        let action = &msg.interactive.as_ref().unwrap().action;
        let sections = action.sections.as_ref().unwrap();
        let sizes: Vec<usize> = sections.iter().map(|s| s.rows.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(sections[0].title, "דגמים 1-10");
        assert_eq!(sections[2].title, "דגמים 21-25");
        assert_eq!(sections[2].rows[4].id, "prod_24");
        assert_eq!(action.button.as_deref(), Some("בחר דגם"));
    }

    #[test]
    fn test_list_message_drops_empty_descriptions() {
        let sections = vec![ListSection {
            title: "כלים".to_string(),
            rows: vec![
                ListRow {
                    id: "r1".to_string(),
                    title: "One".to_string(),
                    description: Some(String::new()),
                },
                ListRow {
                    id: "r2".to_string(),
                    title: "Two".to_string(),
                    description: Some("desc".to_string()),
                },
            ],
        }];
        let message = create_list_message("1", "body", "open", sections, None, None);
        let json = serde_json::to_value(&message).unwrap();
        let rows = &json["interactive"]["action"]["sections"][0]["rows"];
        assert!(rows[0].get("description").is_none());
        assert_eq!(rows[1]["description"], "desc");
    }

    #[test]
    fn test_product_list_row_description() {
        let items = vec![
            Product::new("prod_a", "A").with_description("18V"),
            Product::new("prod_b", "B").with_description(""),
        ];
        let msg = create_product_list_message("1", &items);
        let json = serde_json::to_value(&msg).unwrap();
        let rows = &json["interactive"]["action"]["sections"][0]["rows"];
        assert_eq!(rows[0]["description"], "18V");
        assert!(rows[1].get("description").is_none());
    }

    #[test]
    fn test_canned_messages_fit_button_limit() {
        assert!(create_main_menu_message("1").is_ok());
        assert!(create_category_selection_message("1").is_ok());
        assert!(create_product_action_message("1", "Makita").is_ok());
        let confirm = create_confirm_buttons_message("1", "ok?", "confirm_order", None).unwrap();
        let replies = confirm.interactive.unwrap().action.buttons.unwrap();
        assert_eq!(replies[0].reply.title, "אישור");
        assert_eq!(replies[1].reply.id, "action_back");
    }

    #[test]
    fn test_messages_endpoint() {
        assert_eq!(
            messages_endpoint("v21.0", "123"),
            "https://graph.facebook.com/v21.0/123/messages"
        );
    }
}
