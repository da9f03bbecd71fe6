//! Form Overlay
//!
//! Create/edit popup for the current resource.

use super::centered_rect;
use crate::app::App;
use crate::controller::FormController;
use crate::resource::{FieldDef, FieldKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Shown on reference selectors with nothing chosen
const SELECT_PLACEHOLDER: &str = "Seleccione...";

/// Render the open form. Returns the popup area for backdrop clicks.
pub fn render(f: &mut Frame, app: &App) -> Option<Rect> {
    let form = app.list.form()?;

    let popup_area = centered_rect(70, 85, f.area());
    f.render_widget(Clear, popup_area);

    let border_color = if form.is_locked() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} ", form.title()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Submit error
            Constraint::Length(1), // Buttons / status
        ])
        .split(inner);

    let (lines, focus_line) = field_lines(form, chunks[0].width as usize);

    // Keep the focused field in view
    let height = chunks[0].height as usize;
    let scroll = (focus_line + 3).saturating_sub(height);
    f.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        chunks[0],
    );

    if let Some(message) = form.submit_error() {
        let banner = Paragraph::new(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::White).bg(Color::Red),
        ))
        .wrap(Wrap { trim: true });
        f.render_widget(banner, chunks[1]);
    }

    f.render_widget(Paragraph::new(footer_line(form)), chunks[2]);

    Some(popup_area)
}

/// Lines for every field, and the first line of the focused one
fn field_lines(form: &FormController, width: usize) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut focus_line = 0;

    for (i, field) in form.def().fields.iter().enumerate() {
        let focused = i == form.focus();
        if focused {
            focus_line = lines.len();
        }

        lines.push(label_line(field, focused));
        lines.push(value_line(form, field, focused, width));

        if let Some(message) = form.error(&field.name) {
            lines.push(Line::from(Span::styled(
                format!("    {}", message),
                Style::default().fg(Color::Red),
            )));
        }
    }

    (lines, focus_line)
}

fn label_line(field: &FieldDef, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![Span::styled(format!("  {}", field.label), style)];
    if field.is_required() {
        spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn value_line(
    form: &FormController,
    field: &FieldDef,
    focused: bool,
    width: usize,
) -> Line<'static> {
    let marker = if focused { "  > " } else { "    " };
    let value = form.draft().get(&field.name);

    let (text, style) = match field.kind {
        FieldKind::Reference => match form.selected_label(&field.name) {
            Some(label) => (format!("◂ {} ▸", label), Style::default().fg(Color::Green)),
            None => (
                format!("◂ {} ▸", SELECT_PLACEHOLDER),
                Style::default().fg(Color::DarkGray),
            ),
        },
        FieldKind::Status => (format!("◂ {} ▸", value), Style::default().fg(Color::Green)),
        _ if value.is_empty() && !focused => (
            field.placeholder.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        ),
        _ => {
            let cursor = if focused && !form.is_locked() { "_" } else { "" };
            (
                format!("{}{}", tail(value, width.saturating_sub(16)), cursor),
                Style::default().fg(Color::White),
            )
        },
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(text, style),
    ];

    // Character counter
    if field.kind == FieldKind::Textarea {
        if let Some(max) = field.max_length() {
            let count = value.chars().count();
            let color = if count > max { Color::Red } else { Color::DarkGray };
            spans.push(Span::styled(
                format!("  {}/{}", count, max),
                Style::default().fg(color),
            ));
        }
    }

    Line::from(spans)
}

/// Last `max` characters, so the cursor end of long text stays visible
fn tail(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        s.chars().skip(count - max).collect()
    }
}

fn footer_line(form: &FormController) -> Line<'static> {
    if form.is_locked() {
        let status = if form.is_edit() {
            "Actualizando..."
        } else {
            "Creando..."
        };
        return Line::from(Span::styled(
            format!("  {}", status),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let action = if form.is_edit() { " Actualizar " } else { " Crear " };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{}(Enter)", action),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(" Cancelar (Esc) ", Style::default().fg(Color::White)),
    ])
}
