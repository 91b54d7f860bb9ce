//! Button id → conversation state routing.
//!
//! Both tables are plain configuration: a button id names the next state,
//! and `back` resolves through a fixed predecessor table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Conversation stage of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Initial,
    MainMenu,
    CategorySelection,
    ProductList,
    ProductDetails,
    QuoteRequest,
    PriceInquiry,
    StockInquiry,
    DeliveryInquiry,
    HumanAgent,
    Back,
}

impl ConversationState {
    pub const ALL: [ConversationState; 11] = [
        ConversationState::Initial,
        ConversationState::MainMenu,
        ConversationState::CategorySelection,
        ConversationState::ProductList,
        ConversationState::ProductDetails,
        ConversationState::QuoteRequest,
        ConversationState::PriceInquiry,
        ConversationState::StockInquiry,
        ConversationState::DeliveryInquiry,
        ConversationState::HumanAgent,
        ConversationState::Back,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::MainMenu => "main_menu",
            ConversationState::CategorySelection => "category_selection",
            ConversationState::ProductList => "product_list",
            ConversationState::ProductDetails => "product_details",
            ConversationState::QuoteRequest => "quote_request",
            ConversationState::PriceInquiry => "price_inquiry",
            ConversationState::StockInquiry => "stock_inquiry",
            ConversationState::DeliveryInquiry => "delivery_inquiry",
            ConversationState::HumanAgent => "human_agent",
            ConversationState::Back => "back",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("unknown conversation state: {}", s))
    }
}

/// Button id → next state.
const BUTTON_STATES: &[(&str, ConversationState)] = &[
    // Main menu
    ("main_price", ConversationState::PriceInquiry),
    ("main_stock", ConversationState::StockInquiry),
    ("main_delivery", ConversationState::DeliveryInquiry),
    // Category selection
    ("category_cordless", ConversationState::ProductList),
    ("category_rotary", ConversationState::ProductList),
    ("category_hammer", ConversationState::ProductList),
    // Product actions
    ("action_product_page", ConversationState::ProductDetails),
    ("action_quote_request", ConversationState::QuoteRequest),
    ("action_human_agent", ConversationState::HumanAgent),
    ("action_back", ConversationState::Back),
    // Confirmations
    ("confirm_order", ConversationState::QuoteRequest),
    ("confirm_inquiry", ConversationState::PriceInquiry),
];

/// Next state for a button id, if the id is known.
pub fn state_for_button(button_id: &str) -> Option<ConversationState> {
    BUTTON_STATES
        .iter()
        .find(|(id, _)| *id == button_id)
        .map(|(_, state)| *state)
}

/// Where `back` leads from `current`.
pub fn previous_state(current: ConversationState) -> ConversationState {
    use ConversationState::*;
    match current {
        Initial => Initial,
        MainMenu => Initial,
        CategorySelection => MainMenu,
        ProductList => CategorySelection,
        ProductDetails => ProductList,
        QuoteRequest => ProductDetails,
        PriceInquiry | StockInquiry | DeliveryInquiry => MainMenu,
        HumanAgent | Back => MainMenu,
    }
}

/// Resolve a button click. Unknown ids keep the current state.
pub fn route_button_click(
    user_id: &str,
    button_id: &str,
    current: ConversationState,
) -> ConversationState {
    let Some(next) = state_for_button(button_id) else {
        tracing::warn!("Unknown button ID {} from {} (staying in {})", button_id, user_id, current);
        return current;
    };

    let next = if next == ConversationState::Back {
        previous_state(current)
    } else {
        next
    };

    tracing::debug!("[{}] {} --{}--> {}", user_id, current, button_id, next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_from_product_details() {
        let next = route_button_click("u", "action_back", ConversationState::ProductDetails);
        assert_eq!(next, ConversationState::ProductList);
    }

    #[test]
    fn test_back_never_lands_on_back() {
        for state in ConversationState::ALL {
            assert_ne!(
                route_button_click("u", "action_back", state),
                ConversationState::Back
            );
        }
    }

    #[test]
    fn test_unknown_button_keeps_state() {
        let next = route_button_click("u", "no_such_button", ConversationState::CategorySelection);
        assert_eq!(next, ConversationState::CategorySelection);
    }

    #[test]
    fn test_table_lookups() {
        assert_eq!(
            state_for_button("main_stock"),
            Some(ConversationState::StockInquiry)
        );
        assert_eq!(
            state_for_button("category_hammer"),
            Some(ConversationState::ProductList)
        );
        assert_eq!(
            state_for_button("confirm_order"),
            Some(ConversationState::QuoteRequest)
        );
        assert_eq!(state_for_button("prod_x"), None);
        assert_eq!(
            route_button_click("u", "action_quote_request", ConversationState::ProductDetails),
            ConversationState::QuoteRequest
        );
    }

    #[test]
    fn test_state_names_round_trip_through_from_str() {
        for state in ConversationState::ALL {
            assert_eq!(state.as_str().parse::<ConversationState>(), Ok(state));
        }
        assert!("nowhere".parse::<ConversationState>().is_err());
    }
}
