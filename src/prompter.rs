//! Prompter surface and script layout
//!
//! The script is split into paragraphs on line breaks, each paragraph is
//! word-wrapped to the text column and followed by a spacer row. Rows are
//! then put into visual order for the reading direction, since terminals
//! lay characters out strictly left to right.

use crate::animation::ScrollSurface;
use crate::preferences::Preferences;
use crate::types::TextDirection;

/// The scrollable region presenting the script.
///
/// Offsets are nominal pixels, like `scrollTop`; assignments are clamped to
/// `[0, max_offset]`.
#[derive(Debug, Clone, Default)]
pub struct PrompterSurface {
    offset: f64,
    max_offset: f64,
    claim: u64,
}

impl PrompterSurface {
    pub fn new() -> Self {
        PrompterSurface::default()
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Update the scroll range after a layout change, pulling the offset back
    /// inside it if the content shrank
    pub fn set_max_offset(&mut self, max_offset: f64) {
        self.max_offset = max_offset.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    /// Row nearest to the top of the viewport at the current offset
    pub fn first_visible_row(&self, row_height_px: f64) -> usize {
        if row_height_px <= 0.0 {
            return 0;
        }
        (self.offset / row_height_px).round() as usize
    }
}

impl ScrollSurface for PrompterSurface {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset);
    }

    fn claim(&mut self) -> u64 {
        self.claim += 1;
        self.claim
    }

    fn current_claim(&self) -> u64 {
        self.claim
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrompterLine {
    pub text: String,
    /// Index of the paragraph this row belongs to; `None` for spacer rows
    pub paragraph: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct PrompterLayout {
    pub lines: Vec<PrompterLine>,
    pub paragraph_count: usize,
    pub margin: u16,
    pub text_width: u16,
    pub direction: TextDirection,
}

impl PrompterLayout {
    /// Largest useful scroll offset for a viewport of `viewport_rows`
    pub fn max_offset_px(&self, viewport_rows: u16, row_height_px: f64) -> f64 {
        self.lines.len().saturating_sub(viewport_rows as usize) as f64 * row_height_px
    }
}

/// Split the script into paragraphs, one per line break
pub fn paragraphs(script: &str) -> Vec<&str> {
    script
        .split('\n')
        .map(|p| p.strip_suffix('\r').unwrap_or(p))
        .collect()
}

/// Lay the script out for an area `width` columns wide
pub fn layout_script(prefs: &Preferences, width: u16) -> PrompterLayout {
    let margin = (width as u32 * prefs.horizontal_padding / 100) as u16;
    let text_width = width.saturating_sub(margin * 2).max(1);

    let mut lines = Vec::new();
    let paragraphs = paragraphs(&prefs.script);

    for (idx, paragraph) in paragraphs.iter().enumerate() {
        for row in textwrap::wrap(paragraph, text_width as usize) {
            lines.push(PrompterLine {
                text: visual_order(&row, prefs.direction),
                paragraph: Some(idx),
            });
        }
        lines.push(PrompterLine {
            text: String::new(),
            paragraph: None,
        });
    }

    tracing::trace!(
        "Laid out {} paragraphs into {} rows (width {}, margin {})",
        paragraphs.len(),
        lines.len(),
        text_width,
        margin
    );

    PrompterLayout {
        lines,
        paragraph_count: paragraphs.len(),
        margin,
        text_width,
        direction: prefs.direction,
    }
}

/// Put one row of logically ordered text into left-to-right display order.
///
/// In `Ltr` rows, runs of right-to-left script are mirrored in place. In
/// `Rtl` rows the whole row is mirrored, then runs of left-to-right text are
/// mirrored back so they stay readable; neutral characters at the edges end
/// up on the opposite side, as bidi-aware renderers show them.
pub fn visual_order(text: &str, direction: TextDirection) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    match direction {
        TextDirection::Ltr => reverse_runs(&mut chars, is_rtl_char, is_ltr_char),
        TextDirection::Rtl => {
            chars.reverse();
            reverse_runs(&mut chars, is_ltr_char, is_rtl_char);
        }
    }
    chars.into_iter().collect()
}

/// Reverse every maximal run that starts and ends on a `strong` character
/// and contains no `opposite` character
fn reverse_runs(chars: &mut [char], strong: fn(char) -> bool, opposite: fn(char) -> bool) {
    let mut i = 0;
    while i < chars.len() {
        if !strong(chars[i]) {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        let mut j = i + 1;
        while j < chars.len() && !opposite(chars[j]) {
            if strong(chars[j]) {
                end = j;
            }
            j += 1;
        }

        chars[start..=end].reverse();
        i = end + 1;
    }
}

fn is_rtl_char(c: char) -> bool {
    matches!(c as u32,
        0x0590..=0x08FF   // Hebrew, Arabic, Syriac, Thaana, NKo, Samaritan
        | 0xFB1D..=0xFDFF // Hebrew and Arabic presentation forms
        | 0xFE70..=0xFEFF)
}

fn is_ltr_char(c: char) -> bool {
    c.is_alphanumeric() && !is_rtl_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs_with(script: &str, direction: TextDirection) -> Preferences {
        Preferences {
            script: script.to_string(),
            direction,
            horizontal_padding: 10,
            ..Preferences::default()
        }
    }

    #[test]
    fn test_two_lines_make_two_paragraphs() {
        let prefs = prefs_with("Line one\nLine two", TextDirection::Ltr);
        let layout = layout_script(&prefs, 100);

        assert_eq!(layout.paragraph_count, 2);
        let text_rows: Vec<_> = layout
            .lines
            .iter()
            .filter(|l| l.paragraph.is_some())
            .map(|l| (l.paragraph.unwrap(), l.text.as_str()))
            .collect();
        assert_eq!(text_rows, vec![(0, "Line one"), (1, "Line two")]);
    }

    #[test]
    fn test_paragraphs_keep_empty_lines_and_strip_cr() {
        assert_eq!(paragraphs("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(paragraphs(""), vec![""]);
    }

    #[test]
    fn test_padding_narrows_text_column() {
        let mut prefs = prefs_with("one two three four five six", TextDirection::Ltr);
        prefs.horizontal_padding = 40;
        let layout = layout_script(&prefs, 50);
        assert_eq!(layout.margin, 20);
        assert_eq!(layout.text_width, 10);
        assert!(layout.lines.iter().all(|l| l.text.chars().count() <= 10));
        assert!(layout.lines.len() > 3);
    }

    #[test]
    fn test_rtl_moves_trailing_punctuation_left() {
        assert_eq!(visual_order("Hello world.", TextDirection::Rtl), ".Hello world");
        assert_eq!(visual_order("Hello world.", TextDirection::Ltr), "Hello world.");
    }

    #[test]
    fn test_hebrew_is_mirrored() {
        // "shalom" in logical order
        let logical = "\u{05E9}\u{05DC}\u{05D5}\u{05DD}";
        let visual: String = logical.chars().rev().collect();
        assert_eq!(visual_order(logical, TextDirection::Rtl), visual);
        assert_eq!(visual_order(logical, TextDirection::Ltr), visual);
    }

    #[test]
    fn test_ltr_mirrors_only_rtl_runs() {
        let text = "say \u{05D0}\u{05D1} now";
        assert_eq!(
            visual_order(text, TextDirection::Ltr),
            "say \u{05D1}\u{05D0} now"
        );
    }

    #[test]
    fn test_surface_clamps_offsets() {
        let mut surface = PrompterSurface::new();
        surface.set_max_offset(100.0);
        surface.set_scroll_offset(250.0);
        assert_eq!(surface.scroll_offset(), 100.0);
        surface.set_scroll_offset(-5.0);
        assert_eq!(surface.scroll_offset(), 0.0);

        surface.set_scroll_offset(80.0);
        surface.set_max_offset(30.0);
        assert_eq!(surface.scroll_offset(), 30.0);
    }

    #[test]
    fn test_first_visible_row_uses_row_height() {
        let mut surface = PrompterSurface::new();
        surface.set_max_offset(1_000.0);
        surface.set_scroll_offset(104.0);
        // 32px font at relaxed line height
        assert_eq!(surface.first_visible_row(52.0), 2);
        assert_eq!(surface.first_visible_row(0.0), 0);

        surface.set_scroll_offset(25.0);
        assert_eq!(surface.first_visible_row(52.0), 0);
        surface.set_scroll_offset(26.0);
        assert_eq!(surface.first_visible_row(52.0), 1);
    }

    #[test]
    fn test_default_scroll_distances_move_one_row() {
        let prefs = Preferences::default();
        let row_height = prefs.row_height_px();
        let mut surface = PrompterSurface::new();
        surface.set_max_offset(1_000.0);

        // One arrow step, then one button press of `scrollAmount` rows
        surface.set_scroll_offset(prefs.scroll_step as f64);
        assert_eq!(surface.first_visible_row(row_height), 1);
        surface.set_scroll_offset(prefs.scroll_amount as f64 * 10.0);
        assert_eq!(surface.first_visible_row(row_height), 1);
    }

    #[test]
    fn test_max_offset_accounts_for_viewport() {
        let prefs = prefs_with("a\nb\nc\nd", TextDirection::Ltr);
        let layout = layout_script(&prefs, 40);
        assert_eq!(layout.lines.len(), 8);
        assert_eq!(layout.max_offset_px(5, 10.0), 30.0);
        assert_eq!(layout.max_offset_px(20, 10.0), 0.0);
    }
}
