//! UI widget components
//!
//! The panes drawn by the screen layout: script editor, settings
//! controls, the prompter itself, and modal popups.

pub mod controls;
pub mod editor;
pub mod popups;
pub mod prompter;
