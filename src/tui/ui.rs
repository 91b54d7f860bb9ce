//! UI rendering for the demo player

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use super::app::App;
use super::chat;
use crate::demo::ScenarioPlayer;

const WA_GREEN: Color = Color::Rgb(7, 94, 84);
const WA_ACCENT: Color = Color::Rgb(37, 211, 102);
const DOT_ACTIVE: Color = Color::Rgb(37, 99, 235);

/// Phone outer width including the frame.
const PHONE_WIDTH: u16 = 46;
/// Columns reserved on each side for the navigation arrows.
const ARROW_GUTTER: u16 = 4;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: header (1 line) + stage + caption + dots + status bar (1 line)
    let [header_area, stage_area, caption_area, dots_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), &app.player);

    let [phone_area] = Layout::horizontal([Constraint::Length(PHONE_WIDTH)])
        .flex(Flex::Center)
        .areas(stage_area);

    if app.player.shows_navigation() {
        render_arrows(stage_area, phone_area, frame.buffer_mut());
    }

    render_phone(phone_area, frame.buffer_mut(), app);

    if app.player.options().show_caption {
        render_caption(caption_area, frame.buffer_mut(), app.player.caption());
    }

    if app.player.shows_dots() {
        render_dots(dots_area, frame.buffer_mut(), &app.player);
    }

    render_status(status_area, frame.buffer_mut(), app);
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, player: &ScenarioPlayer) {
    let title = Span::styled(
        " wa-flow demo",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let position = format!(
        " scenario {}/{} ",
        player.current_index() + 1,
        player.len()
    );
    let padding_width = (area.width as usize)
        .saturating_sub(" wa-flow demo".len() + position.len());

    let line = Line::from(vec![
        title,
        Span::raw(" ".repeat(padding_width)),
        Span::styled(position, Style::default().fg(Color::Cyan)),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Round arrow buttons either side of the phone, vertically centered.
fn render_arrows(stage: Rect, phone: Rect, buf: &mut Buffer) {
    if stage.height == 0 {
        return;
    }
    let y = stage.y + stage.height / 2;
    let style = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);

    // Left arrow moves forward in the right-to-left layout.
    if phone.x >= stage.x + ARROW_GUTTER {
        let left = Rect::new(phone.x - ARROW_GUTTER, y, 3, 1);
        Paragraph::new(Span::styled(" < ", style)).render(left, buf);
    }
    let right_x = phone.x + phone.width + 1;
    if right_x + 3 <= stage.x + stage.width {
        let right = Rect::new(right_x, y, 3, 1);
        Paragraph::new(Span::styled(" > ", style)).render(right, buf);
    }
}

/// Phone chrome: contact header, clock, transcript, input bar.
fn render_phone(area: Rect, buf: &mut Buffer, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height < 5 || inner.width < 10 {
        return;
    }

    let [contact_area, clock_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let options = app.player.options();
    let bar = Style::default().fg(Color::White).bg(WA_GREEN);
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" <  ", bar),
            Span::styled(
                options.contact_name.clone(),
                bar.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("    {}", options.business_account),
            bar.add_modifier(Modifier::DIM),
        )),
    ])
    .style(bar)
    .render(contact_area, buf);

    Paragraph::new(Span::styled(" 16:38", bar.add_modifier(Modifier::DIM)))
        .style(bar)
        .render(clock_area, buf);

    let scenario = app.player.current();
    chat::render(chat_area, buf, scenario, &mut app.chat);

    let input = Style::default().fg(Color::Gray).bg(Color::White);
    Paragraph::new(Line::from(vec![
        Span::styled(" + ", input.fg(WA_ACCENT)),
        Span::styled("Type a message", input),
    ]))
    .style(input)
    .render(input_area, buf);
}

/// Scenario title, centered, at most two lines.
fn render_caption(area: Rect, buf: &mut Buffer, caption: &str) {
    let lines: Vec<Line> = chat::wrap_text(caption, area.width.saturating_sub(2) as usize)
        .into_iter()
        .take(2)
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray))).centered())
        .collect();
    Paragraph::new(lines).render(area, buf);
}

/// One dot per scenario, the active one wider.
fn render_dots(area: Rect, buf: &mut Buffer, player: &ScenarioPlayer) {
    let mut spans = Vec::new();
    for idx in 0..player.len() {
        if idx == player.current_index() {
            spans.push(Span::styled("━━", Style::default().fg(DOT_ACTIVE)));
        } else {
            spans.push(Span::styled("•", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans).centered()).render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    let sep_style = Style::default().fg(Color::Gray);
    let hint_style = Style::default().fg(Color::Cyan);

    let mut spans = vec![
        Span::styled(" ←/→ scenario", hint_style),
        Span::styled(" | ", sep_style),
        Span::styled("1-9 jump", hint_style),
        Span::styled(" | ", sep_style),
        Span::styled("↑/↓ scroll", hint_style),
        Span::styled(" | ", sep_style),
        Span::styled("q quit", hint_style),
    ];

    if let Some(latest) = app.logs.latest() {
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled(latest, Style::default().fg(Color::Yellow)));
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{fixtures, PlayerOptions};
    use crate::tui::log_capture::LogTail;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_shows_contact_and_caption() {
        let player = ScenarioPlayer::new(fixtures::all(), PlayerOptions::default()).unwrap();
        let mut app = App::new(player, LogTail::new());
        let screen = draw(&mut app, 80, 40);
        assert!(screen.contains("Business account"));
        assert!(screen.contains("scenario 1/4"));
        assert!(screen.contains("━━"));
    }

    #[test]
    fn test_single_scenario_hides_dots_and_arrows() {
        let player =
            ScenarioPlayer::new(vec![fixtures::after_hours()], PlayerOptions::default()).unwrap();
        let mut app = App::new(player, LogTail::new());
        let screen = draw(&mut app, 80, 40);
        assert!(!screen.contains("━━"));
        assert!(!screen.contains(" > "));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let player = ScenarioPlayer::new(fixtures::all(), PlayerOptions::default()).unwrap();
        let mut app = App::new(player, LogTail::new());
        draw(&mut app, 12, 6);
        draw(&mut app, 1, 1);
    }
}
