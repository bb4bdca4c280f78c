/// Rope-backed storage for the plain-text template body.
use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// The authoritative template content. Holds plain text only; markup is
/// always derived from it and never written back.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the character at a given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn char_at(&self, char_idx: usize) -> Result<char> {
        if char_idx >= self.rope.len_chars() {
            anyhow::bail!(
                "char index {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        Ok(self.rope.char(char_idx))
    }

    /// Returns the char index of the start of a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_to_char(&self, line_idx: usize) -> Result<usize> {
        if line_idx >= self.rope.len_lines() {
            anyhow::bail!(
                "line index {} out of bounds (buffer has {} lines)",
                line_idx,
                self.rope.len_lines()
            );
        }
        Ok(self.rope.line_to_char(line_idx))
    }

    /// Returns the line index holding a given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is past the end of the buffer.
    pub fn char_to_line(&self, char_idx: usize) -> Result<usize> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "char index {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        Ok(self.rope.char_to_line(char_idx))
    }

    /// Returns the length of a line in characters, excluding its line break.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_len_chars(&self, line_idx: usize) -> Result<usize> {
        if line_idx >= self.rope.len_lines() {
            anyhow::bail!(
                "line index {} out of bounds (buffer has {} lines)",
                line_idx,
                self.rope.len_lines()
            );
        }
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                return Ok(len - 2);
            }
            return Ok(len - 1);
        }
        Ok(len)
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "insert position {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the character range [start..end) from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        if end > self.rope.len_chars() {
            anyhow::bail!(
                "range end {} out of bounds (buffer has {} chars)",
                end,
                self.rope.len_chars()
            );
        }
        self.rope.remove(start..end);
        Ok(())
    }

    /// Replaces the character range [start..end) with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        self.remove(start, end)?;
        self.insert(start, text)?;
        Ok(())
    }

    /// Returns true if the text starting at `char_idx` begins with `pattern`.
    /// Indices past the end never match.
    pub fn matches_at(&self, char_idx: usize, pattern: &str) -> bool {
        if char_idx > self.rope.len_chars() {
            return false;
        }
        let mut chars = self.rope.chars_at(char_idx);
        pattern.chars().all(|p| chars.next() == Some(p))
    }
}
