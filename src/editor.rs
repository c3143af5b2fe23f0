//! Cursor movement and editing over the script text.
//!
//! The cursor is a byte index that always sits on a char boundary.

use crate::constants::TAB_WIDTH;

/// Bring external text into the script's form: `\n` line breaks only and
/// tabs expanded to spaces, so the cursor cell lines up with the text.
pub fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', &" ".repeat(TAB_WIDTH))
}

#[derive(Debug, Clone, Default)]
pub struct ScriptEditor {
    cursor: usize,
}

impl ScriptEditor {
    /// Editor with the cursor placed after the last character
    pub fn at_end(text: &str) -> Self {
        ScriptEditor { cursor: text.len() }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Zero-based (line, column-in-chars) of the cursor
    pub fn cursor_position(&self, text: &str) -> (usize, usize) {
        let cursor = self.clamped(text);
        let before = &text[..cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (line, text[line_start..cursor].chars().count())
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) {
        let cursor = self.clamped(text);
        text.insert(cursor, c);
        self.cursor = cursor + c.len_utf8();
    }

    /// Insert a whole string at the cursor and move past it
    pub fn insert_str(&mut self, text: &mut String, s: &str) {
        let cursor = self.clamped(text);
        text.insert_str(cursor, s);
        self.cursor = cursor + s.len();
    }

    pub fn backspace(&mut self, text: &mut String) -> bool {
        let cursor = self.clamped(text);
        match text[..cursor].chars().next_back() {
            Some(c) => {
                let start = cursor - c.len_utf8();
                text.replace_range(start..cursor, "");
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, text: &mut String) -> bool {
        let cursor = self.clamped(text);
        match text[cursor..].chars().next() {
            Some(c) => {
                text.replace_range(cursor..cursor + c.len_utf8(), "");
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self, text: &str) {
        let cursor = self.clamped(text);
        if let Some(c) = text[..cursor].chars().next_back() {
            self.cursor = cursor - c.len_utf8();
        }
    }

    pub fn move_right(&mut self, text: &str) {
        let cursor = self.clamped(text);
        if let Some(c) = text[cursor..].chars().next() {
            self.cursor = cursor + c.len_utf8();
        }
    }

    pub fn move_home(&mut self, text: &str) {
        let cursor = self.clamped(text);
        self.cursor = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    }

    pub fn move_end(&mut self, text: &str) {
        let cursor = self.clamped(text);
        self.cursor = text[cursor..]
            .find('\n')
            .map(|i| cursor + i)
            .unwrap_or(text.len());
    }

    pub fn move_up(&mut self, text: &str) {
        let (line, column) = self.cursor_position(text);
        if line > 0 {
            self.cursor = Self::index_of(text, line - 1, column);
        }
    }

    pub fn move_down(&mut self, text: &str) {
        let (line, column) = self.cursor_position(text);
        if line + 1 < text.split('\n').count() {
            self.cursor = Self::index_of(text, line + 1, column);
        }
    }

    /// Byte index of `column` on `line`, stopping at the end of shorter lines
    fn index_of(text: &str, line: usize, column: usize) -> usize {
        let mut start = 0;
        for (idx, content) in text.split('\n').enumerate() {
            if idx == line {
                return content
                    .char_indices()
                    .nth(column)
                    .map(|(i, _)| start + i)
                    .unwrap_or(start + content.len());
            }
            start += content.len() + 1;
        }
        text.len()
    }

    // The script may be replaced underneath the editor
    fn clamped(&self, text: &str) -> usize {
        let mut cursor = self.cursor.min(text.len());
        while !text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }
}
