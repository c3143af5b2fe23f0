use super::centered_rect;
use crate::types::ControlField;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn hint(field: ControlField) -> &'static str {
    match field {
        ControlField::Rows => "Rows per button press (min 1)",
        ControlField::Step => "Pixels per arrow key (min 1)",
        ControlField::Speed => "Arrow key scroll time in ms (min 10)",
        ControlField::Font => "Font size in px (min 12)",
        ControlField::Color => "#RRGGBB or a color name",
        ControlField::Margin => "Side margin in percent (8-40)",
    }
}

/// Render the popup where a raw value is typed for `field`
pub fn render_value_prompt(frame: &mut Frame, field: ControlField, input: &str) {
    let area = centered_rect(50, 25, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Set {} ", field.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // Hint
        ])
        .split(inner);

    let input_text = Paragraph::new(format!("{}_", input)).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(input_text, chunks[0]);

    let hint_text = Paragraph::new(format!("{}. Enter to apply, Esc to cancel", hint(field)))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(hint_text, chunks[2]);
}
