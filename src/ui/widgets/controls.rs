use crate::app::AppState;
use crate::preferences::PreferenceKey;
use crate::types::{ControlField, TextAlignment};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Two-row controls bar: scroll buttons and presentation toggles on top,
/// editable settings below
pub fn render_controls(f: &mut Frame, app: &AppState, area: Rect) {
    let prefs = app.prefs();
    let label_style = Style::default().fg(Color::DarkGray);
    let button_style = Style::default().fg(Color::Black).bg(Color::Gray);

    let mut buttons = vec![
        Span::styled(" ▲ PgUp ", button_style),
        Span::raw(" "),
        Span::styled(" ▼ PgDn ", button_style),
        Span::raw("   "),
        Span::styled("Align ", label_style),
    ];
    for (alignment, key) in [
        (TextAlignment::Left, "l"),
        (TextAlignment::Center, "c"),
        (TextAlignment::Right, "r"),
    ] {
        let style = if prefs.text_alignment == alignment {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        buttons.push(Span::styled(format!("[{}]", key), style));
    }
    buttons.extend([
        Span::raw("   "),
        Span::styled("Dir ", label_style),
        Span::styled(
            format!("[{}]", prefs.direction.as_str().to_uppercase()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("   "),
        Span::styled("[f] Fullscreen", Style::default().fg(Color::Gray)),
    ]);

    let mut fields = Vec::new();
    for field in ControlField::ALL {
        let value = prefs.display_value(PreferenceKey::from(field));
        let value_style = match field {
            ControlField::Color => Style::default().fg(prefs.text_color.to_color()),
            _ => Style::default().fg(Color::White),
        };

        let (label_style, value_style) = if field == app.selected_control {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                value_style.add_modifier(Modifier::REVERSED),
            )
        } else {
            (label_style, value_style)
        };

        fields.push(Span::styled(format!("{} ", field.label()), label_style));
        fields.push(Span::styled(value, value_style));
        fields.push(Span::raw("  "));
    }

    let controls = Paragraph::new(vec![Line::from(buttons), Line::from(fields)]);
    f.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_script;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_controls_show_current_settings() {
        let mut app = app_with_script("text");
        app.selected_control = ControlField::Step;
        let mut terminal = Terminal::new(TestBackend::new(80, 2)).unwrap();
        terminal
            .draw(|f| render_controls(f, &app, Rect::new(0, 0, 80, 2)))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let second: String = (0..80u16).map(|x| buffer[(x, 1u16)].symbol()).collect();
        assert!(second.contains("Rows 5"));
        assert!(second.contains("Step 50"));
        assert!(second.contains("Speed 300"));

        let step_value = second.find("50").unwrap() as u16;
        assert!(buffer[(step_value, 1u16)].modifier.contains(Modifier::REVERSED));
    }
}
