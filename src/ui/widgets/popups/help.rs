use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn heading(title: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
    )])
}

pub fn render_help_popup(f: &mut Frame) {
    // Calculate popup size (70% width, 80% height)
    let popup_width = (f.area().width as f32 * 0.7) as u16;
    let popup_height = (f.area().height as f32 * 0.8) as u16;

    let popup_x = (f.area().width.saturating_sub(popup_width)) / 2;
    let popup_y = (f.area().height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: popup_x,
        y: popup_y,
        width: popup_width,
        height: popup_height,
    };

    let help_text = vec![
        heading("SCROLLING"),
        Line::from(""),
        Line::from("  PgDn / J           Scroll down by Rows"),
        Line::from("  PgUp / K           Scroll up by Rows"),
        Line::from("  ↓ / ↑              Fine scroll by Step over Speed ms"),
        Line::from(""),
        heading("PRESENTATION"),
        Line::from(""),
        Line::from("  l / c / r          Align left/center/right"),
        Line::from("  d                  Toggle RTL/LTR"),
        Line::from("  f / F11            Toggle fullscreen"),
        Line::from("  Esc                Leave fullscreen"),
        Line::from(""),
        heading("SETTINGS"),
        Line::from(""),
        Line::from("  Tab / Shift-Tab    Select setting"),
        Line::from("  + / -              Adjust selected setting"),
        Line::from("  Enter              Type a value for the selected setting"),
        Line::from(""),
        heading("SCRIPT"),
        Line::from(""),
        Line::from("  e                  Edit the script"),
        Line::from("  Esc                Stop editing"),
        Line::from(""),
        heading("APPLICATION"),
        Line::from(""),
        Line::from("  ? / F1             Toggle this help"),
        Line::from("  q / Ctrl-c         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
