use crate::constants::DEFAULT_TEXT_COLOR;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        }
    }
}

impl FromStr for TextAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(TextAlignment::Left),
            "center" => Ok(TextAlignment::Center),
            "right" => Ok(TextAlignment::Right),
            other => Err(format!("unknown alignment: {}", other)),
        }
    }
}

impl From<TextAlignment> for ratatui::layout::Alignment {
    fn from(alignment: TextAlignment) -> Self {
        match alignment {
            TextAlignment::Left => ratatui::layout::Alignment::Left,
            TextAlignment::Center => ratatui::layout::Alignment::Center,
            TextAlignment::Right => ratatui::layout::Alignment::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Rtl,
    Ltr,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TextDirection::Rtl => TextDirection::Ltr,
            TextDirection::Ltr => TextDirection::Rtl,
        }
    }
}

impl FromStr for TextDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rtl" => Ok(TextDirection::Rtl),
            "ltr" => Ok(TextDirection::Ltr),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// A color as the user typed it (`#RRGGBB` or a color name).
///
/// Only values that parse as a terminal color can be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextColor(String);

impl TextColor {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Color::from_str(trimmed)
            .ok()
            .map(|_| TextColor(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_color(&self) -> Color {
        Color::from_str(&self.0).unwrap_or(Color::White)
    }
}

impl Default for TextColor {
    fn default() -> Self {
        TextColor(DEFAULT_TEXT_COLOR.to_string())
    }
}

impl TryFrom<String> for TextColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TextColor::parse(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

impl From<TextColor> for String {
    fn from(color: TextColor) -> Self {
        color.0
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Settings that can be selected in the controls bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlField {
    Rows,
    Step,
    Speed,
    Font,
    Color,
    Margin,
}

impl ControlField {
    pub const ALL: [ControlField; 6] = [
        ControlField::Rows,
        ControlField::Step,
        ControlField::Speed,
        ControlField::Font,
        ControlField::Color,
        ControlField::Margin,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ControlField::Rows => "Rows",
            ControlField::Step => "Step",
            ControlField::Speed => "Speed",
            ControlField::Font => "Font",
            ControlField::Color => "Color",
            ControlField::Margin => "Margin",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiMode {
    Normal,
    Editing,
    ValuePrompt(ControlField),
    Help,
}

/// Discrete user intents the input layer maps key presses onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ScrollUpButton,
    ScrollDownButton,
    ScrollUpKey,
    ScrollDownKey,
    Align(TextAlignment),
    ToggleDirection,
    ToggleFullscreen,
    ExitFullscreen,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_round_trips_through_str() {
        for alignment in [TextAlignment::Left, TextAlignment::Center, TextAlignment::Right] {
            assert_eq!(alignment.as_str().parse::<TextAlignment>(), Ok(alignment));
        }
        assert!("justify".parse::<TextAlignment>().is_err());
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(TextDirection::default(), TextDirection::Rtl);
        assert_eq!(TextDirection::Rtl.toggled(), TextDirection::Ltr);
        assert_eq!(TextDirection::Ltr.toggled(), TextDirection::Rtl);
    }

    #[test]
    fn test_text_color_parsing() {
        assert_eq!(
            TextColor::parse("#FF0000").map(|c| c.to_color()),
            Some(Color::Rgb(255, 0, 0))
        );
        assert!(TextColor::parse("red").is_some());
        assert!(TextColor::parse("#GG0000").is_none());
        assert!(TextColor::parse("   ").is_none());
        assert_eq!(TextColor::default().to_color(), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_control_field_cycle() {
        assert_eq!(ControlField::Rows.next(), ControlField::Step);
        assert_eq!(ControlField::Margin.next(), ControlField::Rows);
        assert_eq!(ControlField::Rows.previous(), ControlField::Margin);
    }
}
