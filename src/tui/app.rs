//! TUI application state and main event loop

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::time::Instant;

use super::chat::ChatView;
use super::log_capture::LogTail;
use super::ui;
use crate::demo::{Direction, ScenarioPlayer};

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// Delay between a scenario switch and the scroll to its last message, so
/// the new transcript is laid out first.
const SCROLL_DELAY_MS: u64 = 100;

/// Lines moved by PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_exit: bool,
    /// Scenario carousel
    pub player: ScenarioPlayer,
    /// Transcript viewport
    pub chat: ChatView,
    /// Captured log output
    pub logs: LogTail,
    /// When the pending scroll-to-bottom fires
    scroll_at: Option<Instant>,
}

impl App {
    pub fn new(player: ScenarioPlayer, logs: LogTail) -> Self {
        let mut app = Self {
            should_exit: false,
            player,
            chat: ChatView::default(),
            logs,
            scroll_at: None,
        };
        app.sync_scroll_request();
        app
    }

    /// Turn a scenario change into a deferred scroll. A newer change
    /// replaces any scroll still pending.
    fn sync_scroll_request(&mut self) {
        if self.player.take_scroll_request() {
            self.chat.reset();
            self.scroll_at = Some(Instant::now() + Duration::from_millis(SCROLL_DELAY_MS));
        }
    }

    /// Deadline of the pending scroll, if any.
    pub fn scroll_deadline(&self) -> Option<Instant> {
        self.scroll_at
    }

    /// Apply the pending scroll.
    pub fn fire_scroll(&mut self) {
        if self.scroll_at.take().is_some() {
            self.chat.pin_bottom = true;
        }
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(_, _) => {
                // Re-laid out on next draw
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_exit = true
            }
            // Right-to-left layout: the left arrow moves on.
            KeyCode::Left => self.player.advance(Direction::Forward),
            KeyCode::Right => self.player.advance(Direction::Backward),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Err(e) = self.player.select_scenario(index) {
                    tracing::warn!("{}", e);
                }
            }
            KeyCode::Up => self.chat.scroll_up(1),
            KeyCode::Down => self.chat.scroll_down(1),
            KeyCode::PageUp => self.chat.scroll_up(PAGE_LINES),
            KeyCode::PageDown => self.chat.scroll_down(PAGE_LINES),
            KeyCode::End => self.chat.pin_bottom = true,
            KeyCode::Home => self.chat.reset(),
            _ => {}
        }
        self.sync_scroll_request();
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the demo player until the user quits. The terminal is restored even
/// when the loop fails.
pub async fn run(player: ScenarioPlayer, logs: LogTail) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, App::new(player, logs)).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut frame_tick = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));

    while !app.should_exit {
        terminal.draw(|frame| app.render(frame))?;

        let scroll_at = app.scroll_deadline();
        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = tokio::time::sleep_until(scroll_at.unwrap_or_else(Instant::now)), if scroll_at.is_some() => {
                app.fire_scroll();
            }
            _ = frame_tick.tick() => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{fixtures, PlayerOptions};

    fn app() -> App {
        let player = ScenarioPlayer::new(fixtures::all(), PlayerOptions::default()).unwrap();
        App::new(player, LogTail::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_arrows_are_reversed_for_rtl() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.player.current_index(), 1);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.player.current_index(), app.player.len() - 1);
    }

    #[test]
    fn test_digit_selects_scenario() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.player.current_index(), 2);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.player.current_index(), 2);
    }

    #[test]
    fn test_scenario_change_schedules_scroll() {
        let mut app = app();
        assert!(app.scroll_deadline().is_some());
        app.fire_scroll();
        assert!(app.chat.pin_bottom);
        assert!(app.scroll_deadline().is_none());

        press(&mut app, KeyCode::Left);
        assert!(!app.chat.pin_bottom);
        assert_eq!(app.chat.offset, 0);
        assert!(app.scroll_deadline().is_some());
    }

    #[test]
    fn test_scroll_fires_after_delay() {
        let mut app = app();
        let deadline = app.scroll_deadline().unwrap();
        assert!(deadline > Instant::now());
        tokio_test::block_on(async {
            tokio::time::sleep_until(deadline).await;
        });
        assert!(Instant::now() >= deadline);
        app.fire_scroll();
        assert!(app.chat.pin_bottom);
    }

    #[test]
    fn test_scrolling_keys_do_not_schedule() {
        let mut app = app();
        app.fire_scroll();
        press(&mut app, KeyCode::Up);
        assert!(!app.chat.pin_bottom);
        assert!(app.scroll_deadline().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit);

        let mut app = app_with_ctrl_c();
        assert!(app.should_exit);
        app.should_exit = false;
        press(&mut app, KeyCode::Esc);
        assert!(app.should_exit);
    }

    fn app_with_ctrl_c() -> App {
        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        app
    }
}
