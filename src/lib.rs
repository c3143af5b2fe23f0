// Library exports for the binary and for testing
pub mod animation;
pub mod app;
pub mod async_tasks;
pub mod cli;
pub mod constants;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod preferences;
pub mod prompter;
pub mod types;
pub mod ui;
