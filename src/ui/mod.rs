//! UI rendering components

pub mod card_list;
pub mod command_line;
pub mod folder_list;
pub mod help;
pub mod layout;
pub mod report_panel;
pub mod test_panel;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::state::AppState;
use crate::nav::{NavigationState, Navigator};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, nav: &Navigator, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let [header_area, main_area, command_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
            .areas(area);

    let mut crumbs = vec!["home"];
    if let Some(folder) = nav.active_folder() {
        crumbs.push(folder.name());
    }
    layout::draw_header(frame, header_area, &crumbs, nav.state().label(), theme);

    match nav.state() {
        NavigationState::Home => {
            folder_list::draw(frame, main_area, state, nav.folders(), theme);
        }
        NavigationState::InFolder { .. } => {
            let cards = nav.displayed_cards();
            card_list::draw(frame, main_area, state, &cards, nav.store().filter(), theme);
        }
        NavigationState::InTestSession { .. } => {
            let cards = nav.displayed_cards();
            card_list::draw(frame, main_area, state, &cards, nav.store().filter(), theme);
            if let Some(session) = nav.session() {
                test_panel::draw(frame, main_area, state, session, theme);
            }
        }
        NavigationState::InReport { .. } => {
            if let Ok(summary) = nav.report() {
                report_panel::draw(frame, main_area, &summary, theme);
            }
        }
    }

    if let Some(output) = &state.output {
        draw_output(frame, main_area, output, theme);
    }
    if state.show_help {
        help::draw(frame, main_area, theme);
    }

    command_line::draw(frame, command_area, &state.command_line, hint(nav.state()), theme);
}

/// Normal-mode hint for the command line
fn hint(state: NavigationState) -> &'static str {
    match state {
        NavigationState::Home => "Enter to open a folder, : for commands, ? for help",
        NavigationState::InFolder { .. } => "t to test, / to search, Esc for home, ? for help",
        NavigationState::InTestSession { .. } => ":ans <answer>, r to reveal, n for next",
        NavigationState::InReport { .. } => "Esc to return to the folder",
    }
}

/// Full text of a multi-line command result
fn draw_output(frame: &mut Frame, area: Rect, output: &str, theme: &Theme) {
    let overlay_area = layout::centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Output (any key to close) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary).fg(theme.fg_primary));

    let lines: Vec<Line> = output.lines().map(Line::from).collect();
    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(para, overlay_area);
}
