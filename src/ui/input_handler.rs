use crate::app::AppState;
use crate::constants::{MAX_VALUE_INPUT_LENGTH, TAB_WIDTH};
use crate::editor::normalize_text;
use crate::types::{Action, TextAlignment, UiMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

pub struct InputHandler;

impl InputHandler {
    /// Route a key press by UI mode.
    ///
    /// Returns true if the key was consumed. Arrow keys are only consumed
    /// while the prompter surface is mounted.
    pub fn handle_key(&mut self, app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.dispatch(Action::Quit, now);
            return true;
        }

        match &app.ui_mode {
            UiMode::Help => Self::handle_help(app, key),
            UiMode::ValuePrompt(_) => Self::handle_value_prompt(app, key),
            UiMode::Editing => Self::handle_editing(app, key),
            UiMode::Normal => Self::handle_prompter(app, key, now),
        }
    }

    /// Handle a bracketed paste.
    ///
    /// In the editor the whole text goes in as one edit, so it is persisted
    /// once. The value prompt takes its printable chars up to the length
    /// limit. Other modes ignore pastes.
    pub fn handle_paste(&mut self, app: &mut AppState, pasted: &str) -> bool {
        match app.ui_mode {
            UiMode::Editing => {
                let pasted = normalize_text(pasted);
                if pasted.is_empty() {
                    return true;
                }
                tracing::debug!("Pasting {} bytes into the script", pasted.len());
                app.edit_script(|editor, text| {
                    editor.insert_str(text, &pasted);
                    true
                });
                true
            }
            UiMode::ValuePrompt(_) => {
                let room =
                    MAX_VALUE_INPUT_LENGTH.saturating_sub(app.input_buffer.chars().count());
                let accepted: String = pasted
                    .chars()
                    .filter(|c| !c.is_control())
                    .take(room)
                    .collect();
                app.input_buffer.push_str(&accepted);
                true
            }
            UiMode::Normal | UiMode::Help => false,
        }
    }

    fn handle_help(app: &mut AppState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                app.ui_mode = UiMode::Normal;
                true
            }
            _ => false,
        }
    }

    fn handle_value_prompt(app: &mut AppState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                tracing::debug!("Value prompt cancelled");
                app.cancel_value_prompt();
            }
            KeyCode::Enter => {
                app.submit_value_prompt();
            }
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                if app.input_buffer.chars().count() < MAX_VALUE_INPUT_LENGTH {
                    app.input_buffer.push(c);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_editing(app: &mut AppState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                app.stop_editing();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.edit_script(|editor, text| {
                    editor.insert_char(text, c);
                    true
                });
            }
            KeyCode::Enter => {
                app.edit_script(|editor, text| {
                    editor.insert_char(text, '\n');
                    true
                });
            }
            KeyCode::Tab => {
                app.edit_script(|editor, text| {
                    editor.insert_str(text, &" ".repeat(TAB_WIDTH));
                    true
                });
            }
            KeyCode::Backspace => app.edit_script(|editor, text| editor.backspace(text)),
            KeyCode::Delete => app.edit_script(|editor, text| editor.delete(text)),
            KeyCode::Left => app.edit_script(|editor, text| {
                editor.move_left(text);
                false
            }),
            KeyCode::Right => app.edit_script(|editor, text| {
                editor.move_right(text);
                false
            }),
            KeyCode::Up => app.edit_script(|editor, text| {
                editor.move_up(text);
                false
            }),
            KeyCode::Down => app.edit_script(|editor, text| {
                editor.move_down(text);
                false
            }),
            KeyCode::Home => app.edit_script(|editor, text| {
                editor.move_home(text);
                false
            }),
            KeyCode::End => app.edit_script(|editor, text| {
                editor.move_end(text);
                false
            }),
            _ => return false,
        }
        true
    }

    fn handle_prompter(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,

            // Coarse scrolling
            KeyCode::PageUp | KeyCode::Char('K') => Action::ScrollUpButton,
            KeyCode::PageDown | KeyCode::Char('J') => Action::ScrollDownButton,

            // Fine scrolling
            KeyCode::Up | KeyCode::Down if app.surface.is_none() => return false,
            KeyCode::Up => Action::ScrollUpKey,
            KeyCode::Down => Action::ScrollDownKey,

            // Presentation
            KeyCode::Char('l') => Action::Align(TextAlignment::Left),
            KeyCode::Char('c') => Action::Align(TextAlignment::Center),
            KeyCode::Char('r') => Action::Align(TextAlignment::Right),
            KeyCode::Char('d') => Action::ToggleDirection,
            KeyCode::Char('f') | KeyCode::F(11) => Action::ToggleFullscreen,
            KeyCode::Esc if app.is_fullscreen => Action::ExitFullscreen,

            // Settings controls
            KeyCode::Tab => {
                app.select_next_control();
                return true;
            }
            KeyCode::BackTab => {
                app.select_previous_control();
                return true;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                app.adjust_selected_control(1);
                return true;
            }
            KeyCode::Char('-') => {
                app.adjust_selected_control(-1);
                return true;
            }
            KeyCode::Enter => {
                app.open_value_prompt();
                return true;
            }

            KeyCode::Char('e') => {
                app.start_editing();
                return true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                app.ui_mode = UiMode::Help;
                return true;
            }
            _ => return false,
        };

        app.dispatch(action, now);
        true
    }
}
