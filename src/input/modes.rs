//! Input Modes
//!
//! Modal state for the list view: normal navigation, filter entry, and
//! delete confirmation.

/// Input mode enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Filter entry (/)
    Search,
    /// Confirmation prompt
    Confirm,
}

impl InputMode {
    /// Get mode indicator for status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Confirm => "CONFIRM",
        }
    }

    /// Check if mode accepts text input
    pub fn is_text_input(&self) -> bool {
        matches!(self, Self::Search)
    }
}

/// Mode state with associated data
#[derive(Debug, Clone)]
pub struct ModeState {
    pub mode: InputMode,
    /// Text buffer for input modes
    pub buffer: String,
    /// Cursor position in characters
    pub cursor: usize,
    /// Pending key for two-key commands (gg, dd, yy)
    pub pending: Option<char>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            buffer: String::new(),
            cursor: 0,
            pending: None,
        }
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.buffer.clear();
        self.cursor = 0;
        self.pending = None;
    }

    pub fn to_normal(&mut self) {
        self.set_mode(InputMode::Normal);
    }

    pub fn to_search(&mut self) {
        self.set_mode(InputMode::Search);
    }

    pub fn to_confirm(&mut self) {
        self.set_mode(InputMode::Confirm);
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert character at cursor
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn get_buffer(&self) -> &str {
        &self.buffer
    }

    pub fn set_buffer(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.cursor = self.char_len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_transitions() {
        let mut state = ModeState::new();
        assert_eq!(state.mode, InputMode::Normal);

        state.to_search();
        assert_eq!(state.mode, InputMode::Search);

        state.to_confirm();
        assert_eq!(state.mode, InputMode::Confirm);

        state.to_normal();
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn test_switching_mode_clears_buffer() {
        let mut state = ModeState::new();
        state.to_search();
        state.insert_char('x');
        state.pending = Some('d');

        state.to_normal();
        assert_eq!(state.get_buffer(), "");
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_text_input() {
        let mut state = ModeState::new();
        state.to_search();

        for c in "mail".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.get_buffer(), "mail");
        assert_eq!(state.cursor, 4);

        state.delete_char();
        assert_eq!(state.get_buffer(), "mai");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = ModeState::new();
        state.set_buffer("ärz");
        assert_eq!(state.cursor, 3);

        state.cursor_home();
        state.cursor_right();
        state.insert_char('ö');
        assert_eq!(state.get_buffer(), "äörz");

        state.delete_char_forward();
        assert_eq!(state.get_buffer(), "äöz");

        state.delete_char();
        assert_eq!(state.get_buffer(), "äz");
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = ModeState::new();
        state.set_buffer("hello");

        state.cursor_home();
        assert_eq!(state.cursor, 0);
        state.cursor_left();
        assert_eq!(state.cursor, 0);

        state.cursor_end();
        assert_eq!(state.cursor, 5);
        state.cursor_right();
        assert_eq!(state.cursor, 5);
    }

    #[test]
    fn test_is_text_input() {
        assert!(!InputMode::Normal.is_text_input());
        assert!(InputMode::Search.is_text_input());
        assert!(!InputMode::Confirm.is_text_input());
    }
}
