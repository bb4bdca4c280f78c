/// Caret model: a single insertion point expressed as a char offset.
use crate::buffer::TextBuffer;

/// The text insertion point, counted in characters from the start of the
/// content. Always kept within `0..=buffer.len_chars()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    offset: usize,
    /// Column to aim for when moving up/down across shorter lines.
    desired_col: Option<usize>,
}

impl Caret {
    /// Creates a caret at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the caret offset in characters.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the caret to `offset`, clamped to the buffer length.
    pub fn set(&mut self, offset: usize, buffer: &TextBuffer) {
        self.offset = offset.min(buffer.len_chars());
        self.desired_col = None;
    }

    /// Re-clamps the caret after the buffer changed underneath it.
    pub fn clamp(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.min(buffer.len_chars());
    }

    pub fn move_left(&mut self) {
        self.offset = self.offset.saturating_sub(1);
        self.desired_col = None;
    }

    pub fn move_right(&mut self, buffer: &TextBuffer) {
        self.offset = (self.offset + 1).min(buffer.len_chars());
        self.desired_col = None;
    }

    /// Moves the caret to the beginning of the next word.
    pub fn move_word_right(&mut self, buffer: &TextBuffer) {
        let total = buffer.len_chars();
        let mut idx = self.offset.min(total);

        while idx < total && is_word_char(buffer.char_at(idx).unwrap_or(' ')) {
            idx += 1;
        }
        while idx < total && !is_word_char(buffer.char_at(idx).unwrap_or(' ')) {
            idx += 1;
        }

        self.offset = idx;
        self.desired_col = None;
    }

    /// Moves the caret to the beginning of the previous word.
    pub fn move_word_left(&mut self, buffer: &TextBuffer) {
        let mut idx = self.offset.min(buffer.len_chars());

        while idx > 0 && !is_word_char(buffer.char_at(idx - 1).unwrap_or(' ')) {
            idx -= 1;
        }
        while idx > 0 && is_word_char(buffer.char_at(idx - 1).unwrap_or(' ')) {
            idx -= 1;
        }

        self.offset = idx;
        self.desired_col = None;
    }

    pub fn move_to_line_start(&mut self, buffer: &TextBuffer) {
        let (line, _) = line_col(buffer, self.offset);
        self.offset = buffer.line_to_char(line).unwrap_or(0);
        self.desired_col = None;
    }

    pub fn move_to_line_end(&mut self, buffer: &TextBuffer) {
        let (line, _) = line_col(buffer, self.offset);
        let start = buffer.line_to_char(line).unwrap_or(0);
        self.offset = start + buffer.line_len_chars(line).unwrap_or(0);
        self.desired_col = None;
    }

    /// Moves the caret up one line, keeping the sticky column.
    pub fn move_up(&mut self, buffer: &TextBuffer) {
        let (line, col) = line_col(buffer, self.offset);
        if line == 0 {
            return;
        }
        let desired = self.desired_col.unwrap_or(col);
        self.offset = offset_at(buffer, line - 1, desired);
        self.desired_col = Some(desired);
    }

    /// Moves the caret down one line, keeping the sticky column.
    pub fn move_down(&mut self, buffer: &TextBuffer) {
        let (line, col) = line_col(buffer, self.offset);
        if line + 1 >= buffer.len_lines() {
            return;
        }
        let desired = self.desired_col.unwrap_or(col);
        self.offset = offset_at(buffer, line + 1, desired);
        self.desired_col = Some(desired);
    }

    pub fn move_to_start(&mut self) {
        self.offset = 0;
        self.desired_col = None;
    }

    pub fn move_to_end(&mut self, buffer: &TextBuffer) {
        self.offset = buffer.len_chars();
        self.desired_col = None;
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Splits a char offset into (line, column).
pub(crate) fn line_col(buffer: &TextBuffer, offset: usize) -> (usize, usize) {
    let clamped = offset.min(buffer.len_chars());
    let line = buffer.char_to_line(clamped).unwrap_or(0);
    let start = buffer.line_to_char(line).unwrap_or(0);
    (line, clamped - start)
}

/// Char offset of `col` on `line`, clamped to the line length.
pub(crate) fn offset_at(buffer: &TextBuffer, line: usize, col: usize) -> usize {
    let start = buffer.line_to_char(line).unwrap_or(0);
    let len = buffer.line_len_chars(line).unwrap_or(0);
    start + col.min(len)
}
