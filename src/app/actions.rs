use anyhow::Result;

use crate::cell::CopyOutcome;
use crate::input::keymap::Action;
use crate::ui::components::{ListViewState, MessageType};

use super::App;

impl App {
    /// Run one action; returns true when the app should exit
    pub fn execute_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::MoveUp => self.list_state.move_up(),
            Action::MoveDown => self.list_state.move_down(),
            Action::MoveToTop => self.list_state.move_to_top(),
            Action::MoveToBottom => self.list_state.move_to_bottom(),
            Action::HalfPageUp => self.page_move(|ls, h| ls.page_up(h / 2)),
            Action::HalfPageDown => self.page_move(|ls, h| ls.page_down(h / 2)),

            Action::ToggleVisibility => self.toggle_selected(),
            Action::CopyPassword => self.copy_selected(),
            Action::Delete => self.initiate_delete(),

            Action::EnterSearch => self.start_search(),
            Action::Search(query) => self.apply_filter(&query)?,
            Action::ClearFilter => self.clear_filter()?,

            Action::Confirm => self.handle_confirm(),
            Action::Cancel => self.cancel_pending(),

            Action::Refresh => self.refresh(),
            Action::Quit => {
                self.should_quit = true;
                return Ok(true);
            }

            _ => {}
        }

        Ok(false)
    }

    fn page_move(&mut self, f: impl FnOnce(&mut ListViewState, usize)) {
        let visible = self.list_visible_height();
        f(&mut self.list_state, visible);
    }

    pub fn list_visible_height(&self) -> usize {
        (self.terminal_size.height as usize).saturating_sub(4)
    }

    fn toggle_selected(&mut self) {
        let Some(index) = self.list_state.selected() else { return };
        let Some(cell) = self.cells.get_mut(index) else { return };
        let Some(change) = cell.toggle() else { return };

        let Some(record) = self.records.get_mut(change.row) else { return };
        self.manager.set_visibility(record, change.visible);
        record.is_password_visible = change.visible;
    }

    fn copy_selected(&mut self) {
        let Some(cell) = self.list_state.selected().and_then(|i| self.cells.get(i)) else { return };

        match cell.copy_plaintext(self.clipboard.as_ref()) {
            CopyOutcome::Copied => self.set_message("Password copied to clipboard", MessageType::Success),
            CopyOutcome::NothingToCopy => {
                self.set_message("Show the password (s) before copying it", MessageType::Warning)
            }
        }
    }

    fn initiate_delete(&mut self) {
        let Some(record) = self.selected_record().cloned() else { return };
        self.pending_delete = Some(record);
        self.mode_state.to_confirm();
    }

    fn cancel_pending(&mut self) {
        self.pending_delete = None;
        self.mode_state.to_normal();
    }

    fn handle_confirm(&mut self) {
        if let Some(record) = self.pending_delete.take() {
            self.manager.delete(&record);
            self.set_message(&format!("Deleted {}", record.app_name), MessageType::Info);
        }
        self.mode_state.to_normal();
    }

    fn start_search(&mut self) {
        self.mode_state.to_search();
        if let Some(filter) = self.filter.clone() {
            self.mode_state.set_buffer(&filter);
        }
    }

    fn apply_filter(&mut self, query: &str) -> Result<()> {
        self.filter = (!query.is_empty()).then(|| query.to_string());
        self.refresh_data()?;
        self.list_state.move_to_top();
        Ok(())
    }

    fn clear_filter(&mut self) -> Result<()> {
        if self.filter.take().is_some() {
            self.refresh_data()?;
        }
        Ok(())
    }

    fn refresh(&mut self) {
        match self.refresh_data() {
            Ok(()) => self.set_message("Reloaded", MessageType::Info),
            Err(e) => self.set_message(&format!("Reload failed: {}", e), MessageType::Error),
        }
    }
}
