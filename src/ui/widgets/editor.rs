use crate::app::AppState;
use crate::prompter::paragraphs;
use crate::types::UiMode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

const PLACEHOLDER: &str = "Paste or type your script here...";

/// Script pane. Scrolls so the cursor line stays visible while editing.
pub fn render_editor(f: &mut Frame, app: &AppState, area: Rect) {
    let editing = app.ui_mode == UiMode::Editing;
    let border_color = if editing { Color::Cyan } else { Color::DarkGray };
    let title = if editing {
        " Script (editing) "
    } else {
        " Script [e] "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let script = &app.prefs().script;
    if script.is_empty() && !editing {
        let placeholder = Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, inner);
        return;
    }

    let (cursor_line, cursor_column) = app.editor.cursor_position(script);
    let scroll = cursor_line.saturating_sub(inner.height as usize - 1);
    let column_offset = cursor_column.saturating_sub(inner.width as usize - 1);

    let lines: Vec<Line> = paragraphs(script)
        .into_iter()
        .skip(scroll)
        .take(inner.height as usize)
        .map(|line| Line::from(line.chars().skip(column_offset).collect::<String>()))
        .collect();
    f.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::White)),
        inner,
    );

    if editing {
        let x = inner.x + (cursor_column - column_offset) as u16;
        let y = inner.y + (cursor_line - scroll) as u16;
        if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
            cell.modifier.insert(Modifier::REVERSED);
        }
    }
}
