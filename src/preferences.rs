//! The preference record and its schema
//!
//! All display and scroll settings live in one [`Preferences`] value that is
//! serialized as a single versioned JSON document. Loading never fails: a
//! missing or malformed field falls back to its default, and documents
//! written by the older flat key/value layout are migrated on the fly.

use crate::constants::*;
use crate::types::{ControlField, TextAlignment, TextColor, TextDirection};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Written with serde; read back field by field in [`Preferences::from_json`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub version: u32,
    pub script: String,
    pub scroll_amount: u32,
    pub scroll_step: u32,
    pub scroll_speed: u32,
    pub font_size: u32,
    pub text_color: TextColor,
    pub horizontal_padding: u32,
    pub text_alignment: TextAlignment,
    pub direction: TextDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            version: PREFERENCES_VERSION,
            script: String::new(),
            scroll_amount: DEFAULT_SCROLL_AMOUNT,
            scroll_step: DEFAULT_SCROLL_STEP,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            font_size: DEFAULT_FONT_SIZE,
            text_color: TextColor::default(),
            horizontal_padding: DEFAULT_HORIZONTAL_PADDING,
            text_alignment: TextAlignment::default(),
            direction: TextDirection::default(),
            saved_at: None,
        }
    }
}

/// Named preference fields.
///
/// Each key knows its field name in the current schema and the string key
/// the legacy flat layout stored it under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    Script,
    ScrollAmount,
    ScrollStep,
    ScrollSpeed,
    FontSize,
    TextColor,
    HorizontalPadding,
    TextAlignment,
    Direction,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 9] = [
        PreferenceKey::Script,
        PreferenceKey::ScrollAmount,
        PreferenceKey::ScrollStep,
        PreferenceKey::ScrollSpeed,
        PreferenceKey::FontSize,
        PreferenceKey::TextColor,
        PreferenceKey::HorizontalPadding,
        PreferenceKey::TextAlignment,
        PreferenceKey::Direction,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            PreferenceKey::Script => "script",
            PreferenceKey::ScrollAmount => "scrollAmount",
            PreferenceKey::ScrollStep => "scrollStep",
            PreferenceKey::ScrollSpeed => "scrollSpeed",
            PreferenceKey::FontSize => "fontSize",
            PreferenceKey::TextColor => "textColor",
            PreferenceKey::HorizontalPadding => "horizontalPadding",
            PreferenceKey::TextAlignment => "textAlignment",
            PreferenceKey::Direction => "direction",
        }
    }

    pub fn legacy_key(&self) -> &'static str {
        match self {
            PreferenceKey::Script => "teleprompter-script",
            PreferenceKey::ScrollAmount => "teleprompter-scroll-amount",
            PreferenceKey::ScrollStep => "teleprompter-scroll-step",
            PreferenceKey::ScrollSpeed => "teleprompter-scroll-speed",
            PreferenceKey::FontSize => "teleprompter-font-size",
            PreferenceKey::TextColor => "teleprompter-text-color",
            PreferenceKey::HorizontalPadding => "teleprompter-padding",
            PreferenceKey::TextAlignment => "teleprompter_alignment",
            PreferenceKey::Direction => "teleprompter_direction",
        }
    }
}

impl From<ControlField> for PreferenceKey {
    fn from(field: ControlField) -> Self {
        match field {
            ControlField::Rows => PreferenceKey::ScrollAmount,
            ControlField::Step => PreferenceKey::ScrollStep,
            ControlField::Speed => PreferenceKey::ScrollSpeed,
            ControlField::Font => PreferenceKey::FontSize,
            ControlField::Color => PreferenceKey::TextColor,
            ControlField::Margin => PreferenceKey::HorizontalPadding,
        }
    }
}

impl Preferences {
    /// Parse a stored document. Never fails; see the module docs.
    pub fn from_json(content: &str) -> Self {
        let map = match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("Preference record is not a JSON object. Using defaults.");
                return Preferences::default();
            }
            Err(e) => {
                tracing::warn!("Failed to parse preference record: {}. Using defaults.", e);
                return Preferences::default();
            }
        };

        // Any record carrying a version key uses the current layout
        let source = match map.get("version") {
            Some(value) => {
                let version = u32::from_stored(value).unwrap_or(PREFERENCES_VERSION);
                if version > PREFERENCES_VERSION {
                    tracing::warn!(
                        "Preference record version {} is newer than supported version {}; loading known fields",
                        version,
                        PREFERENCES_VERSION
                    );
                }
                RecordSource::Versioned(&map)
            }
            None => {
                tracing::info!("Migrating legacy key/value preferences");
                RecordSource::Legacy(&map)
            }
        };

        let mut prefs = Preferences {
            version: PREFERENCES_VERSION,
            script: source.load(PreferenceKey::Script, String::new()),
            scroll_amount: source.load(PreferenceKey::ScrollAmount, DEFAULT_SCROLL_AMOUNT),
            scroll_step: source.load(PreferenceKey::ScrollStep, DEFAULT_SCROLL_STEP),
            scroll_speed: source.load(PreferenceKey::ScrollSpeed, DEFAULT_SCROLL_SPEED),
            font_size: source.load(PreferenceKey::FontSize, DEFAULT_FONT_SIZE),
            text_color: source.load(PreferenceKey::TextColor, TextColor::default()),
            horizontal_padding: source
                .load(PreferenceKey::HorizontalPadding, DEFAULT_HORIZONTAL_PADDING),
            text_alignment: source.load(PreferenceKey::TextAlignment, TextAlignment::default()),
            direction: source.load(PreferenceKey::Direction, TextDirection::default()),
            saved_at: map
                .get("savedAt")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
        };
        prefs.clamp();
        prefs
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Enforce the numeric limits of every field.
    pub fn clamp(&mut self) {
        self.scroll_amount = self.scroll_amount.max(MIN_SCROLL_AMOUNT);
        self.scroll_step = self.scroll_step.max(MIN_SCROLL_STEP);
        self.scroll_speed = self.scroll_speed.max(MIN_SCROLL_SPEED);
        self.font_size = self.font_size.max(MIN_FONT_SIZE);
        self.horizontal_padding = self
            .horizontal_padding
            .clamp(MIN_HORIZONTAL_PADDING, MAX_HORIZONTAL_PADDING);
    }

    /// Apply raw user input to one field.
    ///
    /// Numeric input is read by its leading integer, where zero or garbage
    /// means "no value" and picks the field's fallback. Colors, alignments and directions that don't parse
    /// keep the previous value. Returns whether the record changed.
    pub fn apply_input(&mut self, key: PreferenceKey, raw: &str) -> bool {
        let before = self.clone();
        let number = parse_leading_int(raw).filter(|n| *n != 0);

        match key {
            PreferenceKey::Script => self.script = raw.to_string(),
            PreferenceKey::ScrollAmount => {
                self.scroll_amount = clamp_min(number.unwrap_or(1), MIN_SCROLL_AMOUNT);
            }
            PreferenceKey::ScrollStep => {
                self.scroll_step = clamp_min(number.unwrap_or(1), MIN_SCROLL_STEP);
            }
            PreferenceKey::ScrollSpeed => {
                self.scroll_speed =
                    clamp_min(number.unwrap_or(DEFAULT_SCROLL_SPEED as i64), MIN_SCROLL_SPEED);
            }
            PreferenceKey::FontSize => {
                self.font_size = clamp_min(number.unwrap_or(MIN_FONT_SIZE as i64), MIN_FONT_SIZE);
            }
            PreferenceKey::HorizontalPadding => {
                // A range input always yields a number; anything else is ignored
                if let Some(value) = parse_leading_int(raw) {
                    self.horizontal_padding = value.clamp(
                        MIN_HORIZONTAL_PADDING as i64,
                        MAX_HORIZONTAL_PADDING as i64,
                    ) as u32;
                }
            }
            PreferenceKey::TextColor => {
                if let Some(color) = TextColor::parse(raw) {
                    self.text_color = color;
                }
            }
            PreferenceKey::TextAlignment => {
                if let Ok(alignment) = raw.parse() {
                    self.text_alignment = alignment;
                }
            }
            PreferenceKey::Direction => {
                if let Ok(direction) = raw.parse() {
                    self.direction = direction;
                }
            }
        }

        self.clamp();
        *self != before
    }

    /// Current value of a field as the string shown in a value prompt
    pub fn display_value(&self, key: PreferenceKey) -> String {
        match key {
            PreferenceKey::Script => self.script.clone(),
            PreferenceKey::ScrollAmount => self.scroll_amount.to_string(),
            PreferenceKey::ScrollStep => self.scroll_step.to_string(),
            PreferenceKey::ScrollSpeed => self.scroll_speed.to_string(),
            PreferenceKey::FontSize => self.font_size.to_string(),
            PreferenceKey::TextColor => self.text_color.to_string(),
            PreferenceKey::HorizontalPadding => self.horizontal_padding.to_string(),
            PreferenceKey::TextAlignment => self.text_alignment.as_str().to_string(),
            PreferenceKey::Direction => self.direction.as_str().to_string(),
        }
    }

    /// Height of one rendered text row in nominal pixels
    pub fn row_height_px(&self) -> f64 {
        self.font_size as f64 * LINE_HEIGHT_RATIO
    }
}

enum RecordSource<'a> {
    Versioned(&'a Map<String, Value>),
    Legacy(&'a Map<String, Value>),
}

impl RecordSource<'_> {
    /// Read one field, falling back to `default` when it is missing or malformed.
    fn load<T: StoredValue>(&self, key: PreferenceKey, default: T) -> T {
        let (name, value) = match self {
            RecordSource::Versioned(map) => (key.field_name(), map.get(key.field_name())),
            RecordSource::Legacy(map) => (key.legacy_key(), map.get(key.legacy_key())),
        };

        match value {
            None | Some(Value::Null) => default,
            Some(value) => T::from_stored(value).unwrap_or_else(|| {
                tracing::warn!("Malformed preference '{}': {}. Using default.", name, value);
                default
            }),
        }
    }
}

/// Conversion from a stored JSON value, accepting string-encoded values
/// the legacy layout wrote.
trait StoredValue: Sized {
    fn from_stored(value: &Value) -> Option<Self>;
}

impl StoredValue for String {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl StoredValue for u32 {
    fn from_stored(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => parse_leading_int(s),
            _ => None,
        }?;
        u32::try_from(number.max(0)).ok()
    }
}

impl StoredValue for TextColor {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_str().and_then(TextColor::parse)
    }
}

impl StoredValue for TextAlignment {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| TextAlignment::from_str(s).ok())
    }
}

impl StoredValue for TextDirection {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| TextDirection::from_str(s).ok())
    }
}

/// Read a leading integer: optional whitespace, optional sign, digits.
/// Trailing garbage is ignored; no digits means `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    // Saturate instead of failing on absurdly long input
    let magnitude = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_min(value: i64, min: u32) -> u32 {
    value.clamp(min as i64, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.scroll_amount, 5);
        assert_eq!(prefs.scroll_step, 50);
        assert_eq!(prefs.scroll_speed, 300);
        assert_eq!(prefs.font_size, 32);
        assert_eq!(prefs.text_color.as_str(), "#FFFFFF");
        assert_eq!(prefs.horizontal_padding, 8);
        assert_eq!(prefs.text_alignment, TextAlignment::Center);
        assert_eq!(prefs.direction, TextDirection::Rtl);
    }

    #[test]
    fn test_round_trip() {
        let mut prefs = Preferences::default();
        prefs.script = "Line one\nLine two".to_string();
        prefs.scroll_amount = 7;
        prefs.scroll_step = 120;
        prefs.scroll_speed = 450;
        prefs.font_size = 48;
        prefs.text_color = TextColor::parse("#00FF00").unwrap();
        prefs.horizontal_padding = 25;
        prefs.text_alignment = TextAlignment::Right;
        prefs.direction = TextDirection::Ltr;

        let reloaded = Preferences::from_json(&prefs.to_json().unwrap());
        assert_eq!(reloaded, prefs);
    }

    #[test]
    fn test_missing_fields_are_default_filled() {
        let prefs = Preferences::from_json(r#"{"version": 1, "fontSize": 40}"#);
        assert_eq!(prefs.font_size, 40);
        assert_eq!(prefs.scroll_speed, 300);
        assert_eq!(prefs.direction, TextDirection::Rtl);
    }

    #[test]
    fn test_malformed_field_uses_default() {
        let prefs = Preferences::from_json(
            r#"{"version": 1, "fontSize": "huge", "textColor": "not-a-color",
                "textAlignment": "justify", "scrollStep": 80}"#,
        );
        assert_eq!(prefs.font_size, 32);
        assert_eq!(prefs.text_color, TextColor::default());
        assert_eq!(prefs.text_alignment, TextAlignment::Center);
        assert_eq!(prefs.scroll_step, 80);
    }

    #[test]
    fn test_garbage_document_uses_defaults() {
        assert_eq!(Preferences::from_json("{{{"), Preferences::default());
        assert_eq!(Preferences::from_json("[1, 2]"), Preferences::default());
    }

    #[test]
    fn test_stored_values_are_clamped_on_load() {
        let prefs = Preferences::from_json(
            r#"{"version": 1, "fontSize": 4, "scrollSpeed": -5, "horizontalPadding": 90}"#,
        );
        assert_eq!(prefs.font_size, 12);
        assert_eq!(prefs.scroll_speed, 10);
        assert_eq!(prefs.horizontal_padding, 40);
    }

    #[test]
    fn test_legacy_layout_migrates() {
        let legacy = r##"{
            "teleprompter-script": "Hello\nWorld",
            "teleprompter-scroll-amount": "3",
            "teleprompter-font-size": "abc",
            "teleprompter-text-color": "#FF0000",
            "teleprompter_direction": "ltr"
        }"##;
        let prefs = Preferences::from_json(legacy);
        assert_eq!(prefs.version, PREFERENCES_VERSION);
        assert_eq!(prefs.script, "Hello\nWorld");
        assert_eq!(prefs.scroll_amount, 3);
        assert_eq!(prefs.font_size, 32);
        assert_eq!(prefs.text_color.as_str(), "#FF0000");
        assert_eq!(prefs.direction, TextDirection::Ltr);
        assert_eq!(prefs.text_alignment, TextAlignment::Center);
    }

    #[test]
    fn test_string_version_is_still_versioned() {
        let prefs =
            Preferences::from_json(r#"{"version": "1", "scrollStep": 20, "fontSize": "40"}"#);
        assert_eq!(prefs.scroll_step, 20);
        assert_eq!(prefs.font_size, 40);

        let prefs = Preferences::from_json(r#"{"version": null, "direction": "ltr"}"#);
        assert_eq!(prefs.direction, TextDirection::Ltr);
    }

    #[test]
    fn test_newer_version_loads_known_fields() {
        let prefs = Preferences::from_json(r#"{"version": 9, "scrollStep": 20, "newThing": true}"#);
        assert_eq!(prefs.scroll_step, 20);
        assert_eq!(prefs.version, PREFERENCES_VERSION);
    }

    #[test]
    fn test_apply_input_clamps_to_minimums() {
        let mut prefs = Preferences::default();
        prefs.apply_input(PreferenceKey::FontSize, "5");
        assert_eq!(prefs.font_size, 12);
        prefs.apply_input(PreferenceKey::ScrollSpeed, "3");
        assert_eq!(prefs.scroll_speed, 10);
        prefs.apply_input(PreferenceKey::ScrollAmount, "-4");
        assert_eq!(prefs.scroll_amount, 1);
        prefs.apply_input(PreferenceKey::ScrollStep, "-100");
        assert_eq!(prefs.scroll_step, 1);
    }

    #[test]
    fn test_apply_input_fallbacks() {
        let mut prefs = Preferences::default();
        prefs.apply_input(PreferenceKey::ScrollSpeed, "fast");
        assert_eq!(prefs.scroll_speed, 300);
        prefs.apply_input(PreferenceKey::ScrollSpeed, "0");
        assert_eq!(prefs.scroll_speed, 300);
        prefs.apply_input(PreferenceKey::FontSize, "");
        assert_eq!(prefs.font_size, 12);
        prefs.apply_input(PreferenceKey::ScrollAmount, "12 rows");
        assert_eq!(prefs.scroll_amount, 12);

        prefs.horizontal_padding = 20;
        prefs.apply_input(PreferenceKey::HorizontalPadding, "wide");
        assert_eq!(prefs.horizontal_padding, 20);
        prefs.apply_input(PreferenceKey::HorizontalPadding, "70");
        assert_eq!(prefs.horizontal_padding, 40);
    }

    #[test]
    fn test_apply_input_keeps_previous_color_on_garbage() {
        let mut prefs = Preferences::default();
        assert!(prefs.apply_input(PreferenceKey::TextColor, "#336699"));
        assert!(!prefs.apply_input(PreferenceKey::TextColor, "#zzzzzz"));
        assert_eq!(prefs.text_color.as_str(), "#336699");
    }

    #[test]
    fn test_every_key_round_trips_its_display_value() {
        let mut source = Preferences::default();
        source.script = "Opening line".to_string();
        source.scroll_amount = 7;
        source.font_size = 44;
        source.direction = TextDirection::Ltr;

        let mut target = Preferences::default();
        for key in PreferenceKey::ALL {
            target.apply_input(key, &source.display_value(key));
        }
        assert_eq!(target, source);

        let mut names: Vec<_> = PreferenceKey::ALL.iter().map(|k| k.field_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PreferenceKey::ALL.len());
        assert!(PreferenceKey::ALL.iter().all(|k| k.legacy_key().starts_with("teleprompter")));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7px"), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("px7"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
