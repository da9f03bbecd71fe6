//! Help Overlay
//!
//! Shows keyboard shortcuts and help information.

use super::centered_rect;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key_line(keys: &'static str, text: &'static str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(color)),
        Span::raw(text),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        key_line("j/k, ↑/↓", "Move up/down", Color::Yellow),
        key_line("g/G", "Go to top/bottom", Color::Yellow),
        key_line("Ctrl+d/u", "Page down/up", Color::Yellow),
        key_line("1-5", "Switch resource tab", Color::Yellow),
        Line::from(""),
        section("Views"),
        key_line("Enter/d", "View record details", Color::Yellow),
        key_line("i", "Show/hide inactive records", Color::Yellow),
        key_line("R", "Reload current collection", Color::Yellow),
        key_line("/", "Filter rows", Color::Yellow),
        key_line(":", "Command mode", Color::Yellow),
        Line::from(""),
    ];

    if !app.readonly {
        help_text.extend([
            section("Records"),
            key_line("n", "New record", Color::Yellow),
            key_line("e", "Edit selected record", Color::Yellow),
            key_line("x/Delete", "Delete selected record", Color::Red),
            Line::from(""),
        ]);
    }

    help_text.extend([
        section("Form"),
        key_line("Tab/↓, ↑", "Next/previous field", Color::Yellow),
        key_line("←/→", "Choose option", Color::Yellow),
        key_line("Enter", "Save", Color::Yellow),
        key_line("Esc/click", "Cancel", Color::Yellow),
        Line::from(""),
        key_line("?/Esc", "Close help", Color::Yellow),
        key_line("q", "Quit application", Color::Yellow),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}
