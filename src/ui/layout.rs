use crate::app::AppState;
use crate::types::UiMode;
use crate::ui::widgets::{controls, editor, popups, prompter};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

/// Where each part of the screen goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenAreas {
    pub titlebar: Rect,
    pub editor: Rect,
    pub controls: Rect,
    /// Bordered frame around the prompter; equals `prompter` in fullscreen
    pub prompter_frame: Rect,
    /// Where the script text is drawn
    pub prompter: Rect,
    pub statusbar: Rect,
}

/// Split the terminal. In fullscreen the prompter takes all of it.
pub fn screen_areas(full: Rect, fullscreen: bool) -> ScreenAreas {
    if fullscreen {
        return ScreenAreas {
            prompter_frame: full,
            prompter: full,
            ..ScreenAreas::default()
        };
    }

    let editor_height = (full.height / 4).clamp(3, crate::constants::EDITOR_PANE_HEIGHT);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Titlebar
            Constraint::Length(editor_height), // Script editor
            Constraint::Length(2),             // Controls
            Constraint::Min(0),                // Prompter
            Constraint::Length(1),             // Statusbar
        ])
        .split(full);

    let prompter_frame = chunks[3];
    // A frame with no room inside leaves the prompter unmounted
    let prompter = if prompter_frame.height > 2 && prompter_frame.width > 2 {
        prompter_block().inner(prompter_frame)
    } else {
        Rect::new(prompter_frame.x, prompter_frame.y, prompter_frame.width, 0)
    };

    ScreenAreas {
        titlebar: chunks[0],
        editor: chunks[1],
        controls: chunks[2],
        prompter_frame,
        prompter,
        statusbar: chunks[4],
    }
}

fn prompter_block() -> Block<'static> {
    Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

pub fn render(f: &mut Frame, app: &AppState) {
    let areas = screen_areas(f.area(), app.is_fullscreen);

    if app.is_fullscreen {
        prompter::render_prompter(f, app, areas.prompter);
    } else {
        render_titlebar(f, areas.titlebar);
        editor::render_editor(f, app, areas.editor);
        controls::render_controls(f, app, areas.controls);
        if areas.prompter.height > 0 {
            f.render_widget(prompter_block(), areas.prompter_frame);
            prompter::render_prompter(f, app, areas.prompter);
        }
        render_statusbar(f, app, areas.statusbar);
    }

    match &app.ui_mode {
        UiMode::Help => popups::help::render_help_popup(f),
        UiMode::ValuePrompt(field) => {
            popups::value_prompt::render_value_prompt(f, *field, &app.input_buffer)
        }
        UiMode::Normal | UiMode::Editing => {}
    }
}

fn render_titlebar(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("Teleprompt")
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(title, area);
}

fn render_statusbar(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = match app.ui_mode {
        UiMode::Editing => "Esc: done editing",
        _ => "↑/↓ scroll | PgUp/PgDn rows | e edit | f fullscreen | ? help | q quit",
    };

    let row = app
        .surface
        .as_ref()
        .map(|s| s.first_visible_row(app.prefs().row_height_px()) + 1)
        .unwrap_or(0);
    let status_text = format!(
        "Row {}/{} | {} | {}",
        row,
        app.layout.lines.len(),
        app.prefs().direction.as_str().to_uppercase(),
        hints
    );

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    f.render_widget(status, area);
}
