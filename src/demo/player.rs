//! Scenario player state: which canned conversation is on screen.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Button, DemoScenario};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("at least one scenario is required")]
    NoScenarios,
    #[error("scenario index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Navigation direction. Both wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Display options for the phone chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    pub contact_name: String,
    pub business_account: String,
    pub show_navigation: bool,
    pub show_dots: bool,
    pub show_caption: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            contact_name: "אלקטרו סליל".to_string(),
            business_account: "Business account".to_string(),
            show_navigation: true,
            show_dots: true,
            show_caption: true,
        }
    }
}

/// Carousel over a non-empty list of scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioPlayer {
    scenarios: Vec<DemoScenario>,
    current: usize,
    options: PlayerOptions,
    /// Set whenever the active scenario changes; the UI clears it once it
    /// has scrolled the transcript to the bottom.
    scroll_requested: bool,
}

impl ScenarioPlayer {
    pub fn new(scenarios: Vec<DemoScenario>, options: PlayerOptions) -> Result<Self, PlayerError> {
        if scenarios.is_empty() {
            return Err(PlayerError::NoScenarios);
        }
        Ok(Self {
            scenarios,
            current: 0,
            options,
            scroll_requested: true,
        })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn scenarios(&self) -> &[DemoScenario] {
        &self.scenarios
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &DemoScenario {
        &self.scenarios[self.current]
    }

    /// Caption shown under the phone: the active scenario's title.
    pub fn caption(&self) -> &str {
        &self.current().title
    }

    /// Arrows are pointless with a single scenario.
    pub fn shows_navigation(&self) -> bool {
        self.options.show_navigation && self.len() > 1
    }

    pub fn shows_dots(&self) -> bool {
        self.options.show_dots && self.len() > 1
    }

    /// Move one scenario in `direction`, wrapping at both ends.
    pub fn advance(&mut self, direction: Direction) {
        let len = self.len();
        self.current = match direction {
            Direction::Forward => (self.current + 1) % len,
            Direction::Backward => (self.current + len - 1) % len,
        };
        self.scroll_requested = true;
        tracing::debug!("Scenario {}/{}: {}", self.current + 1, len, self.caption());
    }

    /// Jump straight to `index`. Out-of-range leaves the player untouched.
    pub fn select_scenario(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.len() {
            return Err(PlayerError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.current = index;
        self.scroll_requested = true;
        Ok(())
    }

    /// Take the pending scroll-to-bottom request, if any.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}

/// Buttons of message `index` that are still on offer: any button whose id
/// was already chosen by an earlier reply selection is hidden.
pub fn visible_buttons(scenario: &DemoScenario, index: usize) -> Vec<&Button> {
    let Some(message) = scenario.messages.get(index) else {
        return Vec::new();
    };

    let chosen: HashSet<&str> = scenario.messages[..index]
        .iter()
        .filter_map(|m| m.choice_id())
        .collect();

    message
        .buttons()
        .iter()
        .filter(|b| !chosen.contains(b.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::fixtures;
    use crate::models::Message;

    fn titled(n: usize) -> Vec<DemoScenario> {
        (0..n)
            .map(|i| DemoScenario {
                title: format!("scenario {}", i),
                messages: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = ScenarioPlayer::new(Vec::new(), PlayerOptions::default()).unwrap_err();
        assert_eq!(err, PlayerError::NoScenarios);
    }

    #[test]
    fn test_forward_wraps_after_len_steps() {
        for n in 1..=6 {
            let mut player = ScenarioPlayer::new(titled(n), PlayerOptions::default()).unwrap();
            for start in 0..n {
                player.select_scenario(start).unwrap();
                for _ in 0..n {
                    player.advance(Direction::Forward);
                }
                assert_eq!(player.current_index(), start);
            }
        }
    }

    #[test]
    fn test_backward_from_first_goes_to_last() {
        let mut player = ScenarioPlayer::new(titled(4), PlayerOptions::default()).unwrap();
        player.advance(Direction::Backward);
        assert_eq!(player.current_index(), 3);
        player.advance(Direction::Forward);
        assert_eq!(player.current_index(), 0);
    }

    #[test]
    fn test_select_sets_caption() {
        let mut player = ScenarioPlayer::new(titled(3), PlayerOptions::default()).unwrap();
        for i in 0..3 {
            player.select_scenario(i).unwrap();
            assert_eq!(player.caption(), format!("scenario {}", i));
        }
    }

    #[test]
    fn test_select_out_of_range() {
        let mut player = ScenarioPlayer::new(titled(2), PlayerOptions::default()).unwrap();
        player.select_scenario(1).unwrap();
        assert_eq!(
            player.select_scenario(2),
            Err(PlayerError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(player.current_index(), 1);
    }

    #[test]
    fn test_navigation_hidden_for_single_scenario() {
        let player = ScenarioPlayer::new(titled(1), PlayerOptions::default()).unwrap();
        assert!(!player.shows_navigation());
        assert!(!player.shows_dots());

        let options = PlayerOptions {
            show_dots: false,
            ..PlayerOptions::default()
        };
        let player = ScenarioPlayer::new(titled(2), options).unwrap();
        assert!(player.shows_navigation());
        assert!(!player.shows_dots());
    }

    #[test]
    fn test_scroll_request_set_on_change() {
        let mut player = ScenarioPlayer::new(titled(2), PlayerOptions::default()).unwrap();
        assert!(player.take_scroll_request());
        assert!(!player.take_scroll_request());
        player.advance(Direction::Forward);
        assert!(player.take_scroll_request());
        player.select_scenario(0).unwrap();
        assert!(player.take_scroll_request());
    }

    #[test]
    fn test_quote_button_hidden_after_selection() {
        let scenario = fixtures::agent_handoff();
        let messages = &scenario.messages;

        let selection = messages
            .iter()
            .position(|m| m.choice_id() == Some("action_quote_request"))
            .expect("handoff scenario selects the quote button");
        let offers: Vec<usize> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.buttons().iter().any(|b| b.id == "action_quote_request"))
            .map(|(i, _)| i)
            .collect();

        let before = offers.iter().copied().find(|&i| i < selection).unwrap();
        let after = offers.iter().copied().find(|&i| i > selection).unwrap();

        let ids = |i: usize| -> Vec<String> {
            visible_buttons(&scenario, i)
                .into_iter()
                .map(|b| b.id.clone())
                .collect()
        };
        assert!(ids(before).contains(&"action_quote_request".to_string()));
        assert!(!ids(after).contains(&"action_quote_request".to_string()));
        assert!(ids(after).contains(&"action_human_agent".to_string()));
    }

    #[test]
    fn test_visible_buttons_out_of_range_is_empty() {
        let scenario = DemoScenario {
            title: "t".to_string(),
            messages: vec![Message::BotText {
                text: "x".to_string(),
                time: "10:00".to_string(),
            }],
        };
        assert!(visible_buttons(&scenario, 0).is_empty());
        assert!(visible_buttons(&scenario, 5).is_empty());
    }
}
