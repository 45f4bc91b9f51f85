//! Single-line text editing for the search box and the name editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Text and cursor of one input. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
}

/// Result of handling a key in a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldResult {
    /// Text was modified.
    Changed,
    /// Enter was pressed.
    Submitted,
    /// Escape was pressed.
    Cancelled,
    /// Key was handled but text didn't change (e.g., cursor movement).
    Handled,
    /// Key was not handled, should be passed through.
    Ignored,
}

impl TextField {
    /// Creates a field holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    return FieldResult::Handled;
                }
                self.text.clear();
                self.cursor = 0;
                FieldResult::Changed
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.insert_char(c);
                FieldResult::Changed
            }
            KeyCode::Backspace => {
                if self.delete_back() {
                    FieldResult::Changed
                } else {
                    FieldResult::Handled
                }
            }
            KeyCode::Delete => {
                if self.delete_forward() {
                    FieldResult::Changed
                } else {
                    FieldResult::Handled
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                FieldResult::Handled
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                FieldResult::Handled
            }
            KeyCode::Home => {
                self.cursor = 0;
                FieldResult::Handled
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                FieldResult::Handled
            }
            KeyCode::Enter => FieldResult::Submitted,
            KeyCode::Esc => FieldResult::Cancelled,
            _ => FieldResult::Ignored,
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = char_to_byte_index(&self.text, self.cursor - 1);
        let end = char_to_byte_index(&self.text, self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let start = char_to_byte_index(&self.text, self.cursor);
        let end = char_to_byte_index(&self.text, self.cursor + 1);
        self.text.replace_range(start..end, "");
        true
    }
}

/// Convert character index to byte index in a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
