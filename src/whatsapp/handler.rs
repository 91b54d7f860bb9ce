//! Sample webhook handler
//!
//! Wires the parser, router and payload builders together. Outbound
//! messages go to a [`MessageSink`]; the only sink shipped here is the
//! in-process [`Outbox`].

use anyhow::Result;
use uuid::Uuid;

use crate::models::{Button, OutboundMessage, WebhookPayload};

use super::catalog;
use super::payload::{
    create_button_message, create_category_selection_message, create_main_menu_message,
    create_product_action_message, create_product_list_message, create_text_message,
    MAX_BUTTONS,
};
use super::routing::{route_button_click, ConversationState};
use super::session::{Session, SessionContext, SessionStore};
use super::webhook::{parse_webhook, Interaction, MessageType};

/// Category used when a product list is requested before any category was picked.
const DEFAULT_CATEGORY: &str = "rotary";

const FREE_TEXT_HINT: &str =
    "אם תרצה, אתה יכול להשתמש בכפתורים למעלה או לבחור \"נציג אנושי\" לעזרה נוספת.";
const QUOTE_REQUEST_TEXT: &str =
    "מעולה.\nמחבר אותך לנציג שיאשר זמינות ומחיר בהתאם לצורך שלך.\nרגע אחד…";
const HUMAN_AGENT_TEXT: &str =
    "היי, אני דני מאלקטרו סליל.\nשמח לעזור - בודק זמינות ומכין הצעת מחיר מסודרת.";
const NO_PRODUCTS_TEXT: &str = "כרגע אין דגמים זמינים בקטגוריה הזו. נציג יחזור אליך בהקדם.";

/// Destination for outbound messages.
pub trait MessageSink {
    fn send(&mut self, message: OutboundMessage) -> Result<()>;
}

/// An outbound message waiting in the outbox.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    pub id: Uuid,
    pub message: OutboundMessage,
}

/// Records outbound messages in order instead of sending them.
#[derive(Debug, Default)]
pub struct Outbox {
    queued: Vec<QueuedMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[QueuedMessage] {
        &self.queued
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Remove and return everything queued so far.
    pub fn drain(&mut self) -> Vec<QueuedMessage> {
        std::mem::take(&mut self.queued)
    }
}

impl MessageSink for Outbox {
    fn send(&mut self, message: OutboundMessage) -> Result<()> {
        let id = Uuid::new_v4();
        tracing::debug!("Queued {} as {}", message.summary(), id);
        self.queued.push(QueuedMessage { id, message });
        Ok(())
    }
}

/// Processes webhook notifications for many users against one session store.
pub struct WebhookHandler<S, K> {
    store: S,
    sink: K,
}

impl<S: SessionStore, K: MessageSink> WebhookHandler<S, K> {
    pub fn new(store: S, sink: K) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Handle every message in a notification. Returns how many were handled.
    pub fn handle_payload(&mut self, payload: &WebhookPayload) -> Result<usize> {
        let interactions = parse_webhook(payload);
        for interaction in &interactions {
            self.handle_interaction(interaction)?;
        }
        Ok(interactions.len())
    }

    /// Handle one inbound interaction to completion.
    pub fn handle_interaction(&mut self, interaction: &Interaction) -> Result<()> {
        let user = interaction.user_id.as_str();
        let mut session = self.store.get(user);

        if let Some(payload_id) = interaction.payload_id.as_deref() {
            // Product rows in list messages carry `prod_*` ids that the
            // button table does not know about; they open the product.
            let next = if payload_id.starts_with("prod_") {
                ConversationState::ProductDetails
            } else {
                route_button_click(user, payload_id, session.state)
            };

            session.context.merge(context_from_payload(payload_id));
            session.state = next;
            self.store.set(user, session.clone());

            return self.send_state_response(user, next, &session.context);
        }

        match (interaction.message_type, interaction.text_content.as_deref()) {
            (MessageType::Text, Some(_)) if session.state == ConversationState::Initial => {
                session.state = ConversationState::MainMenu;
                self.store.set(user, session.clone());
                self.send_state_response(user, ConversationState::MainMenu, &session.context)
            }
            (MessageType::Text, Some(_)) => self
                .sink
                .send(create_text_message(user, FREE_TEXT_HINT, false)),
            (kind, _) => {
                tracing::debug!("Ignoring {} message from {}", kind.as_str(), user);
                Ok(())
            }
        }
    }

    /// Send whatever the user should see on entering `state`.
    fn send_state_response(
        &mut self,
        user: &str,
        state: ConversationState,
        context: &SessionContext,
    ) -> Result<()> {
        match state {
            ConversationState::Initial | ConversationState::MainMenu | ConversationState::Back => {
                self.sink.send(create_main_menu_message(user)?)
            }
            ConversationState::CategorySelection => {
                self.sink.send(create_category_selection_message(user)?)
            }
            ConversationState::ProductList => {
                let category = context.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
                self.send_product_list(user, category)
            }
            ConversationState::ProductDetails => {
                let name = context
                    .product_id
                    .as_deref()
                    .and_then(catalog::product_by_id)
                    .map(|p| p.name)
                    .unwrap_or_else(|| "דגם מקצועי".to_string());
                self.sink.send(create_product_action_message(user, &name)?)
            }
            ConversationState::QuoteRequest => {
                self.sink
                    .send(create_text_message(user, QUOTE_REQUEST_TEXT, false))?;
                self.transfer_to_human_agent(user, context);
                Ok(())
            }
            ConversationState::HumanAgent => self
                .sink
                .send(create_text_message(user, HUMAN_AGENT_TEXT, false)),
            ConversationState::PriceInquiry
            | ConversationState::StockInquiry
            | ConversationState::DeliveryInquiry => {
                self.sink
                    .send(create_text_message(user, inquiry_prompt(state), false))?;
                self.sink.send(create_category_selection_message(user)?)
            }
        }
    }

    /// List message for larger categories, plain buttons when they fit.
    fn send_product_list(&mut self, user: &str, category: &str) -> Result<()> {
        let products = catalog::products_by_category(category);
        if products.is_empty() {
            tracing::warn!("No products for category {}", category);
            return self
                .sink
                .send(create_text_message(user, NO_PRODUCTS_TEXT, false));
        }

        if products.len() > MAX_BUTTONS {
            return self.sink.send(create_product_list_message(user, &products));
        }

        let buttons: Vec<Button> = products
            .iter()
            .map(|p| Button::new(p.id.clone(), p.name.clone()))
            .collect();
        self.sink.send(create_button_message(
            user,
            "בחר דגם:",
            &buttons,
            None,
            None,
        )?)
    }

    fn transfer_to_human_agent(&mut self, user: &str, context: &SessionContext) {
        tracing::info!("Handing {} over to a human agent", user);
        self.store.set(
            user,
            Session {
                state: ConversationState::HumanAgent,
                context: context.clone(),
            },
        );
    }
}

fn inquiry_prompt(state: ConversationState) -> &'static str {
    match state {
        ConversationState::StockInquiry => "לצורך בדיקת זמינות, איזה מוצר אתה מחפש?",
        ConversationState::DeliveryInquiry => "לצורך בדיקת אפשרויות משלוח, איזה מוצר אתה מחפש?",
        _ => "לצורך הצעת מחיר מדויקת, איזה מוצר אתה מחפש?",
    }
}

fn context_from_payload(payload_id: &str) -> SessionContext {
    if let Some(category) = payload_id.strip_prefix("category_") {
        SessionContext {
            category: Some(category.to_string()),
            product_id: None,
        }
    } else if payload_id.starts_with("prod_") {
        SessionContext {
            category: None,
            product_id: Some(payload_id.to_string()),
        }
    } else {
        SessionContext::default()
    }
}
