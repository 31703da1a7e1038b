//! Home view: the folder list

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::layout::visible_window;
use crate::app::state::AppState;
use crate::model::Folder;
use crate::theme::Theme;

/// Draw the folders at the home directory
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    folders: &[Folder],
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Folders ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Update visible height for scroll calculations
    state.selection.visible_height = inner.height as usize;

    if folders.is_empty() {
        let msg = Paragraph::new("No folders yet\n\nCreate one with:\n:addfolder <name>")
            .style(Style::default().fg(theme.fg_muted))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    }

    let rows: Vec<Line> = folders
        .iter()
        .enumerate()
        .map(|(i, folder)| folder_row(i, folder, i == state.selection.selected, theme))
        .collect();

    let visible = visible_window(rows, state.selection.scroll_offset, inner.height as usize);
    frame.render_widget(Paragraph::new(visible), inner);
}

fn folder_row(index: usize, folder: &Folder, selected: bool, theme: &Theme) -> Line<'static> {
    let tested = folder.cards().iter().filter(|c| c.last_score().is_some()).count();
    let passed = folder.cards().iter().filter(|c| c.last_score() == Some(1.0)).count();

    let name_style = if selected {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_primary)
    };

    let mut spans = vec![
        Span::styled(format!(" {:>3}. ", index + 1), Style::default().fg(theme.fg_muted)),
        Span::styled(folder.name().to_string(), name_style),
        Span::styled(format!("  {} cards", folder.len()), Style::default().fg(theme.fg_muted)),
    ];
    if tested > 0 {
        spans.push(Span::styled(
            format!("  {}/{} passed last time", passed, tested),
            Style::default().fg(theme.info),
        ));
    }
    Line::from(spans)
}
