//! Application-wide constants

/// Minimum terminal width required to start the application
pub const MIN_TERMINAL_WIDTH: u16 = 40;

/// Minimum terminal height required to start the application
pub const MIN_TERMINAL_HEIGHT: u16 = 12;

/// Smallest terminal that can present the prompter fullscreen
pub const MIN_FULLSCREEN_WIDTH: u16 = 20;
pub const MIN_FULLSCREEN_HEIGHT: u16 = 5;

/// Frame duration in milliseconds for the UI render loop (targeting 60 FPS)
pub const FRAME_DURATION_MS: u64 = 16;

/// Debounce timeout for terminal resize events in milliseconds
pub const RESIZE_DEBOUNCE_MS: u64 = 200;

/// Duration of a button-driven (coarse) scroll in milliseconds
pub const COARSE_SCROLL_DURATION_MS: u64 = 300;

/// Pixels per "row" of the scroll amount setting
pub const PIXELS_PER_SCROLL_ROW: i64 = 10;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_RATIO: f64 = 1.625;

/// Maximum length of the value prompt input (characters)
pub const MAX_VALUE_INPUT_LENGTH: usize = 32;

/// Rows given to the script editor pane in the normal layout
pub const EDITOR_PANE_HEIGHT: u16 = 8;

/// Spaces a tab expands to in the script
pub const TAB_WIDTH: usize = 4;

// Preference defaults and limits

pub const DEFAULT_SCROLL_AMOUNT: u32 = 5;
pub const MIN_SCROLL_AMOUNT: u32 = 1;

pub const DEFAULT_SCROLL_STEP: u32 = 50;
pub const MIN_SCROLL_STEP: u32 = 1;

pub const DEFAULT_SCROLL_SPEED: u32 = 300;
pub const MIN_SCROLL_SPEED: u32 = 10;

pub const DEFAULT_FONT_SIZE: u32 = 32;
pub const MIN_FONT_SIZE: u32 = 12;

pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

pub const DEFAULT_HORIZONTAL_PADDING: u32 = 8;
pub const MIN_HORIZONTAL_PADDING: u32 = 8;
pub const MAX_HORIZONTAL_PADDING: u32 = 40;

/// Schema version written into the preference record
pub const PREFERENCES_VERSION: u32 = 1;

/// File name of the preference record inside the config directory
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
