use anyhow::Result;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::input::keymap::{confirm_action, normal_mode_action, text_input_action, Action};
use crate::input::modes::InputMode;

use super::App;

impl App {
    /// Handle one key press; returns true when the app should exit
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        let action = self.resolve_action(key);
        let quit = self.execute_action(action)?;
        self.drain_events();
        Ok(quit)
    }

    fn resolve_action(&mut self, key: KeyEvent) -> Action {
        match self.mode_state.mode {
            InputMode::Normal => self.resolve_normal_action(key),
            InputMode::Search => self.resolve_text_action(key),
            InputMode::Confirm => confirm_action(key),
        }
    }

    fn resolve_normal_action(&mut self, key: KeyEvent) -> Action {
        let (action, pending) = normal_mode_action(key, self.mode_state.pending);
        self.mode_state.pending = pending;
        action
    }

    fn resolve_text_action(&mut self, key: KeyEvent) -> Action {
        let action = text_input_action(key);
        self.handle_text_input(action)
    }

    fn handle_text_input(&mut self, action: Action) -> Action {
        match action {
            Action::InsertChar(c) => self.mode_state.insert_char(c),
            Action::DeleteChar => self.mode_state.delete_char(),
            Action::DeleteCharForward => self.mode_state.delete_char_forward(),
            Action::CursorLeft => self.mode_state.cursor_left(),
            Action::CursorRight => self.mode_state.cursor_right(),
            Action::CursorHome => self.mode_state.cursor_home(),
            Action::CursorEnd => self.mode_state.cursor_end(),
            Action::ClearLine => self.mode_state.clear_buffer(),
            Action::Submit => return self.submit_text_input(),
            Action::Cancel => self.mode_state.to_normal(),
            _ => return action,
        }
        Action::None
    }

    fn submit_text_input(&mut self) -> Action {
        let query = self.mode_state.get_buffer().to_string();
        self.mode_state.to_normal();
        Action::Search(query)
    }
}
