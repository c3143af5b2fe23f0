use crate::animation::{AnimationStatus, ScrollAnimator, ScrollSurface};
use crate::async_tasks::FullscreenRequest;
use crate::constants::{COARSE_SCROLL_DURATION_MS, PIXELS_PER_SCROLL_ROW};
use crate::editor::{ScriptEditor, normalize_text};
use crate::persistence::PreferenceStore;
use crate::preferences::{PreferenceKey, Preferences};
use crate::prompter::{PrompterLayout, PrompterSurface, layout_script};
use crate::types::{Action, ControlField, TextAlignment, UiMode, Viewport};
use crate::ui::layout::screen_areas;
use ratatui::layout::Rect;
use std::time::Instant;

pub struct AppState {
    pub store: PreferenceStore,
    pub viewport: Viewport,
    pub should_quit: bool,

    // Prompter
    pub surface: Option<PrompterSurface>,
    pub layout: PrompterLayout,
    pub coarse_animator: ScrollAnimator,
    pub fine_animator: ScrollAnimator,

    // Fullscreen follows change notifications; requests wait here for the event loop
    pub is_fullscreen: bool,
    pub pending_fullscreen: Option<FullscreenRequest>,

    // UI Mode
    pub ui_mode: UiMode,
    pub selected_control: ControlField,
    pub input_buffer: String,
    pub editor: ScriptEditor,
}

impl AppState {
    pub fn new(store: PreferenceStore, width: u16, height: u16) -> Self {
        let editor = ScriptEditor::at_end(&store.preferences().script);

        let mut app = AppState {
            store,
            viewport: Viewport { width, height },
            should_quit: false,
            surface: None,
            layout: PrompterLayout::default(),
            coarse_animator: ScrollAnimator::new("coarse"),
            fine_animator: ScrollAnimator::new("fine"),
            is_fullscreen: false,
            pending_fullscreen: None,
            ui_mode: UiMode::Normal,
            selected_control: ControlField::Rows,
            input_buffer: String::new(),
            editor,
        };
        app.relayout();
        app
    }

    pub fn prefs(&self) -> &Preferences {
        self.store.preferences()
    }

    /// Area the prompter text is drawn into for the current viewport
    pub fn prompter_area(&self) -> Rect {
        let full = Rect::new(0, 0, self.viewport.width, self.viewport.height);
        screen_areas(full, self.is_fullscreen).prompter
    }

    /// Re-wrap the script and refresh the surface's scroll range.
    ///
    /// Mounts the surface when the prompter area has room and unmounts it
    /// when the area collapses.
    pub fn relayout(&mut self) {
        let area = self.prompter_area();
        if area.width == 0 || area.height == 0 {
            if self.surface.take().is_some() {
                tracing::debug!("Prompter area collapsed, surface unmounted");
            }
            self.layout = PrompterLayout::default();
            return;
        }

        self.layout = layout_script(self.store.preferences(), area.width);
        let max_offset = self
            .layout
            .max_offset_px(area.height, self.prefs().row_height_px());

        let surface = self.surface.get_or_insert_with(|| {
            tracing::debug!("Prompter surface mounted ({}x{})", area.width, area.height);
            PrompterSurface::new()
        });
        surface.set_max_offset(max_offset);
    }

    pub fn update_viewport_size(&mut self, width: u16, height: u16) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Carry out one user intent
    pub fn dispatch(&mut self, action: Action, now: Instant) {
        match action {
            Action::ScrollUpButton => self.coarse_scroll(-1, now),
            Action::ScrollDownButton => self.coarse_scroll(1, now),
            Action::ScrollUpKey => self.fine_scroll(-1, now),
            Action::ScrollDownKey => self.fine_scroll(1, now),
            Action::Align(alignment) => self.set_alignment(alignment),
            Action::ToggleDirection => self.toggle_direction(),
            Action::ToggleFullscreen => self.request_fullscreen_toggle(),
            Action::ExitFullscreen => {
                if self.is_fullscreen {
                    self.request_fullscreen_toggle();
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn coarse_scroll(&mut self, sign: i64, now: Instant) {
        let delta = sign * self.prefs().scroll_amount as i64 * PIXELS_PER_SCROLL_ROW;
        self.coarse_animator
            .animate(self.surface.as_mut(), delta, COARSE_SCROLL_DURATION_MS, now);
    }

    fn fine_scroll(&mut self, sign: i64, now: Instant) {
        let delta = sign * self.prefs().scroll_step as i64;
        let duration = self.prefs().scroll_speed as u64;
        self.fine_animator
            .animate(self.surface.as_mut(), delta, duration, now);
    }

    /// Advance both animators one frame; returns whether either is still running
    pub fn tick(&mut self, now: Instant) -> bool {
        let coarse = self.coarse_animator.tick(self.surface.as_mut(), now);
        let fine = self.fine_animator.tick(self.surface.as_mut(), now);
        coarse == AnimationStatus::Running || fine == AnimationStatus::Running
    }

    /// Current scroll offset in nominal pixels
    pub fn scroll_offset(&self) -> f64 {
        self.surface.as_ref().map(|s| s.scroll_offset()).unwrap_or(0.0)
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        tracing::debug!("Text alignment set to {}", alignment.as_str());
        self.store.set_text_alignment(alignment);
    }

    pub fn toggle_direction(&mut self) {
        let direction = self.prefs().direction.toggled();
        tracing::debug!("Reading direction set to {}", direction.as_str());
        self.store.set_direction(direction);
        self.relayout();
    }

    pub fn request_fullscreen_toggle(&mut self) {
        if self.surface.is_none() {
            tracing::debug!("Fullscreen toggle ignored: no prompter surface");
            return;
        }
        let request = if self.is_fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        };
        self.pending_fullscreen = Some(request);
    }

    /// Apply a fullscreen change notification
    pub fn set_fullscreen(&mut self, active: bool) {
        if self.is_fullscreen == active {
            return;
        }
        self.is_fullscreen = active;
        if active && self.ui_mode == UiMode::Editing {
            self.ui_mode = UiMode::Normal;
        }
        self.relayout();
    }

    // Controls

    pub fn select_next_control(&mut self) {
        self.selected_control = self.selected_control.next();
    }

    pub fn select_previous_control(&mut self) {
        self.selected_control = self.selected_control.previous();
    }

    /// Nudge the selected setting up (`steps > 0`) or down
    pub fn adjust_selected_control(&mut self, steps: i64) {
        let prefs = self.prefs();
        match self.selected_control {
            ControlField::Rows => {
                let value = nudge(prefs.scroll_amount, steps);
                self.store.set_scroll_amount(value);
            }
            ControlField::Step => {
                let value = nudge(prefs.scroll_step, steps * 5);
                self.store.set_scroll_step(value);
            }
            ControlField::Speed => {
                let value = nudge(prefs.scroll_speed, steps * 10);
                self.store.set_scroll_speed(value);
            }
            ControlField::Font => {
                let value = nudge(prefs.font_size, steps * 2);
                self.store.set_font_size(value);
                self.relayout();
            }
            ControlField::Margin => {
                let value = nudge(prefs.horizontal_padding, steps);
                self.store.set_horizontal_padding(value);
                self.relayout();
            }
            ControlField::Color => {
                let next = cycle_palette(prefs.text_color.as_str(), steps);
                self.store.set(PreferenceKey::TextColor, next);
            }
        }
    }

    pub fn open_value_prompt(&mut self) {
        let key = PreferenceKey::from(self.selected_control);
        self.input_buffer = self.prefs().display_value(key);
        self.ui_mode = UiMode::ValuePrompt(self.selected_control);
    }

    /// Apply the value prompt's text to its field and close the prompt
    pub fn submit_value_prompt(&mut self) {
        if let UiMode::ValuePrompt(field) = self.ui_mode {
            let raw = std::mem::take(&mut self.input_buffer);
            self.store.set(PreferenceKey::from(field), &raw);
            self.relayout();
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_value_prompt(&mut self) {
        self.input_buffer.clear();
        self.ui_mode = UiMode::Normal;
    }

    // Script editing

    pub fn start_editing(&mut self) {
        if self.is_fullscreen {
            return;
        }
        self.ui_mode = UiMode::Editing;
    }

    pub fn stop_editing(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Run an edit against the script, persisting and re-laying out if it changed
    pub fn edit_script(&mut self, edit: impl FnOnce(&mut ScriptEditor, &mut String) -> bool) {
        let mut script = self.prefs().script.clone();
        if edit(&mut self.editor, &mut script) {
            self.store.set_script(script);
            self.relayout();
        }
    }

    /// Replace the whole script, e.g. from an imported file
    pub fn replace_script(&mut self, script: String) {
        let script = normalize_text(&script);
        self.editor = ScriptEditor::at_end(&script);
        self.store.set_script(script);
        self.relayout();
    }
}

fn nudge(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).clamp(0, u32::MAX as i64) as u32
}

const COLOR_PALETTE: [&str; 6] = ["#FFFFFF", "#FFFF00", "#00FF00", "#00FFFF", "#FF8800", "#FF66CC"];

/// Step through the preset colors; a custom color starts from the first preset
fn cycle_palette(current: &str, steps: i64) -> &'static str {
    let len = COLOR_PALETTE.len() as i64;
    match COLOR_PALETTE
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
    {
        Some(idx) => COLOR_PALETTE[(idx as i64 + steps).rem_euclid(len) as usize],
        None => COLOR_PALETTE[0],
    }
}
