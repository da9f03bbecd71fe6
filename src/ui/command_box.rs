//! Command Box
//!
//! Command input with autocomplete.

use crate::app::App;
use crate::resource::get_resource;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Short description shown next to a suggestion
fn describe_command(cmd: &str) -> String {
    match cmd {
        "new" => "Create a record".to_string(),
        "refresh" => "Reload the collection".to_string(),
        "inactive" => "Show/hide inactive records".to_string(),
        "quit" => "Exit mediadesk".to_string(),
        key => get_resource(key)
            .map(|def| format!("Open {}", def.display_name))
            .unwrap_or_default(),
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Command box at bottom of screen
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(12)])
        .split(area);

    let command_area = chunks[1];

    f.render_widget(Clear, command_area);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(command_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Command ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    // Typed text followed by the ghost completion
    let mut spans = vec![
        Span::styled(":", Style::default().fg(Color::Cyan)),
        Span::styled(app.command_text.as_str(), Style::default().fg(Color::White)),
    ];
    if let Some(remaining) = app
        .command_preview
        .as_deref()
        .and_then(|preview| preview.strip_prefix(app.command_text.as_str()))
    {
        spans.push(Span::styled(remaining, Style::default().fg(Color::DarkGray)));
    }

    let input_para = Paragraph::new(Line::from(spans)).block(input_block);
    f.render_widget(input_para, inner_chunks[0]);

    let suggestions_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Suggestions (↑/↓ to select, Tab to complete) ",
            Style::default().fg(Color::DarkGray),
        ));

    let suggestions: Vec<ListItem> = app
        .command_suggestions
        .iter()
        .enumerate()
        .take(8)
        .map(|(i, cmd)| {
            let (name_style, desc_style) = if i == app.command_suggestion_selected {
                let selected = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
                (selected, selected)
            } else {
                (
                    Style::default().fg(Color::White),
                    Style::default().fg(Color::DarkGray),
                )
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {:<14}", cmd), name_style),
                Span::styled(describe_command(cmd), desc_style),
            ]))
        })
        .collect();

    let suggestions_list = List::new(suggestions).block(suggestions_block);
    f.render_widget(suggestions_list, inner_chunks[1]);
}
