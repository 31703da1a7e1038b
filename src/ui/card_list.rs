//! Folder view: the displayed (filtered) card list

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::layout::{visible_window, wrapped_lines};
use crate::app::state::AppState;
use crate::model::{Card, CardFilter};
use crate::theme::Theme;

/// Status indicators for cards
const STATUS_UNTESTED: &str = "○";
const STATUS_PASSED: &str = "✓";
const STATUS_FAILED: &str = "✗";

/// Draw the cards of the open folder
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    cards: &[&Card],
    filter: &CardFilter,
    theme: &Theme,
) {
    let title = if filter.is_active() {
        format!(" Cards ({}) ", filter.describe())
    } else {
        " Cards ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    state.selection.visible_height = inner.height as usize;

    if cards.is_empty() {
        let msg = if filter.is_active() {
            "No cards match\n\nShow everything with :list"
        } else {
            "This folder is empty\n\nAdd a card with:\n:add q/<question> a/<answer>"
        };
        let para =
            Paragraph::new(msg).style(Style::default().fg(theme.fg_muted)).wrap(Wrap { trim: true });
        frame.render_widget(para, inner);
        return;
    }

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut first_line_of_selected = 0;

    for (i, card) in cards.iter().enumerate() {
        let selected = i == state.selection.selected;
        if selected {
            first_line_of_selected = lines.len();
        }
        lines.extend(card_lines(i, card, selected, width, theme));
    }

    // Scroll by lines so the selected card's first line stays on screen
    let height = inner.height as usize;
    let offset = first_line_of_selected.saturating_sub(height.saturating_sub(4));
    frame.render_widget(Paragraph::new(visible_window(lines, offset, height)), inner);
}

fn card_lines(
    index: usize,
    card: &Card,
    selected: bool,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let status = match card.last_score() {
        None => STATUS_UNTESTED,
        Some(score) if score >= 0.5 => STATUS_PASSED,
        Some(_) => STATUS_FAILED,
    };
    let question_style = if selected {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", status),
            Style::default().fg(theme.score_color(card.last_score())),
        ),
        Span::styled(format!("{}. ", index + 1), Style::default().fg(theme.fg_muted)),
        Span::styled(card.question().to_string(), question_style),
    ])];

    for text in wrapped_lines(&format!("A: {}", card.answer()), width, "      ") {
        lines.push(Line::from(Span::styled(text, Style::default().fg(theme.fg_secondary))));
    }
    if card.is_multiple_choice() {
        let choices = format!("Choices: {}", card.choices().join(" | "));
        for text in wrapped_lines(&choices, width, "      ") {
            lines.push(Line::from(Span::styled(text, Style::default().fg(theme.fg_muted))));
        }
    }
    lines
}
