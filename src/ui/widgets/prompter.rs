use crate::app::AppState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
};

/// Draw the visible slice of the laid-out script into `area`.
///
/// Rows start at the surface's first visible row. In fullscreen a red
/// reading guide is drawn across the middle row.
pub fn render_prompter(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    let Some(surface) = app.surface.as_ref() else {
        return;
    };
    if area.height == 0 {
        return;
    }

    let prefs = app.prefs();
    let first_row = surface.first_visible_row(prefs.row_height_px());
    let layout = &app.layout;

    let text_area = Rect {
        x: area.x + layout.margin.min(area.width),
        y: area.y,
        width: layout
            .text_width
            .min(area.width.saturating_sub(layout.margin)),
        height: area.height,
    };

    let lines: Vec<Line> = layout
        .lines
        .iter()
        .skip(first_row)
        .take(area.height as usize)
        .map(|line| Line::from(line.text.as_str()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(prefs.text_color.to_color()).bg(Color::Black))
        .alignment(prefs.text_alignment.into());
    f.render_widget(paragraph, text_area);

    if app.is_fullscreen {
        render_reading_guide(f, area);
    }
}

fn render_reading_guide(f: &mut Frame, area: Rect) {
    let y = area.y + area.height / 2;
    let buffer = f.buffer_mut();
    for x in area.left()..area.right() {
        if let Some(cell) = buffer.cell_mut((x, y)) {
            if cell.symbol() == " " {
                cell.set_symbol("─");
                cell.set_fg(Color::Red);
            } else {
                cell.set_style(
                    Style::default()
                        .underline_color(Color::Red)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_script;
    use ratatui::{Terminal, backend::TestBackend};

    fn rows(terminal: &Terminal<TestBackend>, area: Rect) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_two_paragraphs_render_in_order() {
        let mut app = app_with_script("Line one\nLine two");
        app.store.set_direction(crate::types::TextDirection::Ltr);
        app.relayout();
        let area = app.prompter_area();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render_prompter(f, &app, area)).unwrap();

        let rows = rows(&terminal, area);
        let text: Vec<&str> = rows.iter().map(String::as_str).filter(|r| !r.is_empty()).collect();
        assert_eq!(text, vec!["Line one", "Line two"]);
        // Paragraphs are separated by a spacer row
        assert_eq!(rows[1], "");
    }

    #[test]
    fn test_fullscreen_draws_reading_guide() {
        let mut app = app_with_script("");
        app.set_fullscreen(true);
        let area = app.prompter_area();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render_prompter(f, &app, area)).unwrap();

        let buffer = terminal.backend().buffer();
        let guide = &buffer[(0u16, 15u16)];
        assert_eq!(guide.symbol(), "─");
        assert_eq!(guide.fg, Color::Red);
    }

    #[test]
    fn test_nothing_drawn_without_surface() {
        let mut app = app_with_script("Hidden");
        app.surface = None;
        let area = Rect::new(0, 0, 20, 3);

        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal.draw(|f| render_prompter(f, &app, area)).unwrap();
        assert!(rows(&terminal, area).iter().all(|r| r.is_empty()));
    }
}
