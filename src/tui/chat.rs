//! Chat transcript pane: WhatsApp-style bubbles for the active scenario.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::demo::visible_buttons;
use crate::models::{DemoScenario, Message};

pub const CHAT_BG: Color = Color::Rgb(239, 234, 226);
const BOT_BG: Color = Color::Rgb(255, 255, 255);
const CUSTOMER_BG: Color = Color::Rgb(220, 248, 198);
const NOTICE_BG: Color = Color::Rgb(255, 249, 196);
const INK: Color = Color::Rgb(30, 41, 59);
const MUTED: Color = Color::Rgb(100, 116, 139);
const LINK: Color = Color::Rgb(37, 99, 235);

const ENCRYPTION_NOTICE: &str = "Messages and calls are end-to-end encrypted. Only people in this chat can read, listen, or share them.";

/// Scroll state of the transcript viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChatView {
    /// First visible line.
    pub offset: usize,
    /// Resolve `offset` to the last page on the next render.
    pub pin_bottom: bool,
}

impl ChatView {
    pub fn scroll_up(&mut self, n: usize) {
        self.pin_bottom = false;
        self.offset = self.offset.saturating_sub(n);
    }

    /// Clamped against the content height at render time.
    pub fn scroll_down(&mut self, n: usize) {
        self.pin_bottom = false;
        self.offset = self.offset.saturating_add(n);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One row inside a bubble, with its display width.
struct Row {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl Row {
    fn plain(text: String, style: Style) -> Self {
        let width = text.width();
        Self {
            spans: vec![Span::styled(text, style)],
            width,
        }
    }
}

/// Render the transcript of `scenario` into `area`.
pub fn render(area: Rect, buf: &mut Buffer, scenario: &DemoScenario, view: &mut ChatView) {
    Paragraph::new("")
        .style(Style::default().bg(CHAT_BG))
        .render(area, buf);

    if area.height == 0 || area.width == 0 {
        return;
    }

    let lines = build_transcript_lines(scenario, area.width as usize);
    let total = lines.len();
    let visible = area.height as usize;
    let max_offset = total.saturating_sub(visible);

    if view.pin_bottom {
        view.offset = max_offset;
    }
    view.offset = view.offset.min(max_offset);

    for (row, line) in lines.into_iter().skip(view.offset).take(visible).enumerate() {
        let line_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
        Paragraph::new(line)
            .style(Style::default().bg(CHAT_BG))
            .render(line_area, buf);
    }

    if total > visible {
        let x = area.x + area.width.saturating_sub(1);
        let style = Style::default().fg(MUTED).bg(CHAT_BG);
        if view.offset > 0 {
            buf[(x, area.y)].set_char('^').set_style(style);
        }
        if view.offset < max_offset {
            let y = area.y + area.height.saturating_sub(1);
            buf[(x, y)].set_char('v').set_style(style);
        }
    }
}

/// Flatten the whole transcript into lines of exactly the pane width.
pub fn build_transcript_lines(scenario: &DemoScenario, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if width < 8 {
        return lines;
    }

    lines.push(centered(" Today ", Style::default().fg(MUTED).bg(BOT_BG), width));
    lines.push(Line::from(""));

    let notice_width = width * 85 / 100;
    for row in wrap_text(ENCRYPTION_NOTICE, notice_width.saturating_sub(2)) {
        let padded = format!(" {} ", pad_to(&row, notice_width.saturating_sub(2)));
        lines.push(centered(&padded, Style::default().fg(INK).bg(NOTICE_BG), width));
    }
    lines.push(Line::from(""));

    let max_inner = (width * 3 / 4).saturating_sub(2).max(4);
    for (idx, message) in scenario.messages.iter().enumerate() {
        let bg = if message.is_customer() {
            CUSTOMER_BG
        } else {
            BOT_BG
        };
        let rows = bubble_rows(scenario, idx, message, max_inner, bg);
        push_bubble(&mut lines, rows, width, message.is_customer(), bg);
        lines.push(Line::from(""));
    }

    lines
}

fn bubble_rows(
    scenario: &DemoScenario,
    idx: usize,
    message: &Message,
    max_inner: usize,
    bg: Color,
) -> Vec<Row> {
    let ink = Style::default().fg(INK).bg(bg);
    let muted = Style::default().fg(MUTED).bg(bg);
    let mut rows = Vec::new();

    match message {
        Message::UserReplySelection {
            reply_to_text,
            value,
            ..
        } => {
            if let Some(quoted) = reply_to_text {
                for row in wrap_text(quoted, max_inner.saturating_sub(2)).into_iter().take(2) {
                    let width = row.width() + 2;
                    rows.push(Row {
                        spans: vec![
                            Span::styled("│ ", muted),
                            Span::styled(row, muted.add_modifier(Modifier::ITALIC)),
                        ],
                        width,
                    });
                }
                rows.push(Row::plain(String::new(), ink));
            }
            if let Some(value) = value {
                rows.extend(text_rows(value, max_inner, ink));
            }
        }
        Message::BotLink {
            text,
            link_preview,
            ..
        } => {
            if let Some(text) = text {
                rows.extend(text_rows(text, max_inner, ink));
            }
            if let Some(preview) = link_preview {
                rows.push(Row::plain("─".repeat(max_inner.min(24)), muted));
                if let Some(host) = preview.host() {
                    rows.push(Row::plain(truncate(&host, max_inner), muted));
                }
                rows.push(Row::plain(
                    truncate(&preview.title, max_inner),
                    ink.add_modifier(Modifier::BOLD),
                ));
                for row in wrap_text(&preview.description, max_inner).into_iter().take(2) {
                    rows.push(Row::plain(row, muted));
                }
            }
        }
        Message::BotText { text, .. }
        | Message::BotButtons { text, .. }
        | Message::UserText { text, .. } => {
            rows.extend(text_rows(text, max_inner, ink));
        }
    }

    let buttons = visible_buttons(scenario, idx);
    if !buttons.is_empty() {
        rows.push(Row::plain(String::new(), ink));
        let button_style = Style::default()
            .fg(LINK)
            .bg(Color::Rgb(239, 246, 255))
            .add_modifier(Modifier::BOLD);
        for button in buttons {
            let label = format!(" {} ", truncate(&button.title, max_inner.saturating_sub(2)));
            rows.push(Row::plain(label, button_style));
        }
    }

    let stamp = if message.is_customer() {
        format!("{} ✓✓", message.time())
    } else {
        message.time().to_string()
    };
    rows.push(Row::plain(stamp, muted));

    rows
}

/// Word-wrapped text with inline URLs highlighted.
fn text_rows(text: &str, max_width: usize, style: Style) -> Vec<Row> {
    wrap_text(text, max_width)
        .into_iter()
        .map(|row| {
            let width = row.width();
            let spans = split_links(&row)
                .into_iter()
                .map(|(part, is_link)| {
                    let s = if is_link {
                        style.fg(LINK).add_modifier(Modifier::UNDERLINED)
                    } else {
                        style
                    };
                    Span::styled(part.to_string(), s)
                })
                .collect();
            Row { spans, width }
        })
        .collect()
}

/// Lay a bubble out: left-aligned for the bot, right-aligned for the customer.
fn push_bubble(lines: &mut Vec<Line<'static>>, rows: Vec<Row>, width: usize, right: bool, bg: Color) {
    let inner = rows.iter().map(|r| r.width).max().unwrap_or(0);
    let bubble = (inner + 2).min(width);
    let margin = if right { width - bubble } else { 0 };
    let fill = Style::default().bg(bg);

    for row in rows {
        let mut spans = Vec::with_capacity(row.spans.len() + 3);
        spans.push(Span::raw(" ".repeat(margin)));
        spans.push(Span::styled(" ", fill));
        spans.extend(row.spans);
        spans.push(Span::styled(
            " ".repeat(inner.saturating_sub(row.width) + 1),
            fill,
        ));
        lines.push(Line::from(spans));
    }
}

fn centered(text: &str, style: Style, width: usize) -> Line<'static> {
    let w = text.width().min(width);
    let left = (width - w) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(left)),
        Span::styled(text.to_string(), style),
    ])
}

fn pad_to(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

/// Cut `text` to at most `max_width` columns, marking the cut with `…`.
fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Split text into `(segment, is_link)` pieces around `http(s)://` URLs.
pub fn split_links(text: &str) -> Vec<(&str, bool)> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some(start) = find_url_start(rest) {
        if start > 0 {
            parts.push((&rest[..start], false));
        }
        let url_len = rest[start..]
            .find(char::is_whitespace)
            .unwrap_or(rest.len() - start);
        parts.push((&rest[start..start + url_len], true));
        rest = &rest[start + url_len..];
    }
    if !rest.is_empty() {
        parts.push((rest, false));
    }
    parts
}

fn find_url_start(text: &str) -> Option<usize> {
    match (text.find("http://"), text.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Word wrap by display width. Newlines are kept; words wider than the line
/// are broken by character.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.width() <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };
            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            if word.width() <= max_width {
                current.push_str(word);
            } else {
                for ch in word.chars() {
                    if current.width() + ch.width().unwrap_or(0) > max_width {
                        result.push(std::mem::take(&mut current));
                    }
                    current.push(ch);
                }
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::fixtures;
    use crate::models::{Button, LinkPreview};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn transcript(scenario: &DemoScenario, width: usize) -> Vec<String> {
        build_transcript_lines(scenario, width)
            .iter()
            .map(line_text)
            .collect()
    }

    #[test]
    fn test_wrap_text_by_width() {
        assert_eq!(wrap_text("hello world again", 11), vec!["hello world", "again"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(wrap_text("anything", 0).is_empty());
    }

    #[test]
    fn test_split_links() {
        assert_eq!(
            split_links("see https://x.co/a now"),
            vec![("see ", false), ("https://x.co/a", true), (" now", false)]
        );
        assert_eq!(split_links("no links"), vec![("no links", false)]);
        assert_eq!(split_links("http://a"), vec![("http://a", true)]);
    }

    #[test]
    fn test_empty_scenario_renders_chrome_only() {
        let scenario = DemoScenario {
            title: "empty".to_string(),
            messages: vec![],
        };
        let lines = transcript(&scenario, 40);
        assert!(lines[0].contains("Today"));
        assert!(lines.iter().all(|l| !l.contains('✓')));
    }

    #[test]
    fn test_customer_bubble_right_aligned() {
        let scenario = DemoScenario {
            title: "t".to_string(),
            messages: vec![Message::UserText {
                text: "hi".to_string(),
                time: "10:00".to_string(),
            }],
        };
        let lines = transcript(&scenario, 40);
        let row = lines.iter().find(|l| l.contains("hi")).unwrap();
        assert!(row.starts_with("      "));
        assert_eq!(row.width(), 40);
    }

    #[test]
    fn test_consumed_button_not_rendered_again() {
        let scenario = fixtures::agent_handoff();
        let lines = transcript(&scenario, 60);
        let offers = lines
            .iter()
            .filter(|l| l.contains("לקבל הצעת מחיר מנציג"))
            .count();
        // Offered once as a button, quoted once as the customer's choice.
        assert_eq!(offers, 2);
        let agent_buttons = lines.iter().filter(|l| l.contains("נציג אנושי")).count();
        assert_eq!(agent_buttons, 2);
    }

    #[test]
    fn test_bad_preview_url_renders_without_host() {
        let scenario = DemoScenario {
            title: "t".to_string(),
            messages: vec![Message::BotLink {
                text: None,
                time: "10:00".to_string(),
                link_preview: Some(LinkPreview {
                    url: "::not a url::".to_string(),
                    title: "Title".to_string(),
                    description: "Desc".to_string(),
                    image: None,
                }),
                buttons: vec![Button::new("x", "X")],
            }],
        };
        let lines = transcript(&scenario, 40);
        assert!(lines.iter().any(|l| l.contains("Title")));
        assert!(!lines.iter().any(|l| l.contains("::not a url::")));
    }

    #[test]
    fn test_view_pins_to_bottom() {
        let scenario = fixtures::agent_handoff();
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        let mut view = ChatView {
            offset: 0,
            pin_bottom: true,
        };
        render(area, &mut buf, &scenario, &mut view);

        let total = build_transcript_lines(&scenario, 50).len();
        assert_eq!(view.offset, total - 10);

        view.scroll_down(1000);
        render(area, &mut buf, &scenario, &mut view);
        assert_eq!(view.offset, total - 10);
    }
}
