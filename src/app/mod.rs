//! Application State
//!
//! Ties the record manager, the password cells, and the list view together.

mod actions;
mod input;

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::cell::PasswordCell;
use crate::clipboard::Clipboard;
use crate::db::{Record, RecordId};
use crate::input::modes::ModeState;
use crate::ui::components::{ListViewState, MessageType};
use crate::ui::renderer::{Renderer, UiState};
use crate::vault::{ChangeEvent, ChangeListener, RecordManager};

const MESSAGE_TTL: Duration = Duration::from_secs(5);

pub struct App {
    manager: Arc<RecordManager>,
    clipboard: Arc<dyn Clipboard>,
    events: Receiver<ChangeEvent>,
    /// Name shown on the right of the status line
    store_name: String,
    pub mode_state: ModeState,
    pub terminal_size: Rect,
    pub list_state: ListViewState,
    pub records: Vec<Record>,
    pub cells: Vec<PasswordCell>,
    pub filter: Option<String>,
    pub message: Option<(String, MessageType, Instant)>,
    /// Record waiting for a y/n before it is deleted
    pub pending_delete: Option<Record>,
    pub should_quit: bool,
}

impl App {
    /// Build the view over `manager` and subscribe to its changes
    pub fn new(manager: Arc<RecordManager>, clipboard: Arc<dyn Clipboard>) -> Result<Self> {
        let (tx, events) = mpsc::channel();
        manager.set_listener(Some(Arc::new(tx) as Arc<dyn ChangeListener>));

        let store_name = manager
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut app = Self {
            manager,
            clipboard,
            events,
            store_name,
            mode_state: ModeState::new(),
            terminal_size: Rect::default(),
            list_state: ListViewState::new(),
            records: Vec::new(),
            cells: Vec::new(),
            filter: None,
            message: None,
            pending_delete: None,
            should_quit: false,
        };
        app.refresh_data()?;
        Ok(app)
    }

    /// Reload rows from the store, keeping the selection on the same record
    pub fn refresh_data(&mut self) -> Result<()> {
        let records = self.manager.fetch(self.filter.as_deref())?;
        let selected_id = self.selected_record().map(|r| r.id.clone());

        self.cells = records
            .iter()
            .enumerate()
            .map(|(row, record)| PasswordCell::for_record(row, record))
            .collect();
        self.records = records;
        self.list_state.set_total(self.records.len());

        if let Some(index) = selected_id.and_then(|id| self.index_of(&id)) {
            self.list_state.select(Some(index));
        }
        Ok(())
    }

    /// Apply changes announced by the store since the last call. Returns
    /// true when the rows were reloaded.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            log::debug!("store change: {:?}", event_kind(&event));
            changed = true;
        }
        if !changed {
            return false;
        }

        if let Err(e) = self.refresh_data() {
            log::error!("Reload after change failed: {}", e);
            self.set_message(&format!("Reload failed: {}", e), MessageType::Error);
        }
        true
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.list_state.selected().and_then(|i| self.records.get(i))
    }

    fn index_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.terminal_size = frame.area();
        self.check_message_expiry();

        let message = self.message.as_ref().map(|(m, t, _)| (m.as_str(), *t));
        let search_buffer = self.mode_state.mode.is_text_input().then(|| self.mode_state.get_buffer());
        let confirm_message = self.pending_delete.as_ref().map(confirm_message);

        let mut state = UiState {
            mode: self.mode_state.mode,
            records: &self.records,
            cells: &self.cells,
            list_state: &mut self.list_state,
            search_buffer,
            filter: self.filter.as_deref(),
            message,
            confirm_message: confirm_message.as_deref(),
            store_name: Some(self.store_name.as_str()),
        };

        Renderer::render(frame, &mut state);
    }

    fn check_message_expiry(&mut self) {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, _, time)| time.elapsed() > MESSAGE_TTL);

        if expired {
            self.message = None;
        }
    }

    pub fn set_message(&mut self, msg: &str, msg_type: MessageType) {
        self.message = Some((msg.to_string(), msg_type, Instant::now()));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.manager.set_listener(None);
    }
}

fn confirm_message(record: &Record) -> String {
    format!("Delete {} ({})?", record.app_name, record.user_name)
}

fn event_kind(event: &ChangeEvent) -> &'static str {
    match event {
        ChangeEvent::Created { .. } => "created",
        ChangeEvent::Updated { .. } => "updated",
        ChangeEvent::Deleted { .. } => "deleted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::input::InputMode;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn setup() -> (App, Arc<RecordManager>, Arc<MemoryClipboard>) {
        let manager = Arc::new(RecordManager::open_in_memory().unwrap());
        manager.add("github", "alice", "hunter2").unwrap();
        manager.add("mail", "bob", "s3cret").unwrap();
        manager.add("bank", "alice", "pin1234").unwrap();

        let clipboard = Arc::new(MemoryClipboard::default());
        let app = App::new(Arc::clone(&manager), clipboard.clone()).unwrap();
        (app, manager, clipboard)
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key_event(key(c)).unwrap();
        }
    }

    #[test]
    fn test_loads_records_hidden() {
        let (app, _, _) = setup();
        assert_eq!(app.records.len(), 3);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.cells.iter().all(|c| !c.is_visible()));
    }

    #[test]
    fn test_toggle_persists_visibility() {
        let (mut app, manager, _) = setup();
        press(&mut app, "js");

        assert!(app.cells[1].is_visible());
        assert!(app.records[1].is_password_visible);
        assert!(manager.get(&app.records[1].id).unwrap().is_password_visible);

        press(&mut app, "s");
        assert!(!app.cells[1].is_visible());
        assert!(!manager.get(&app.records[1].id).unwrap().is_password_visible);
    }

    #[test]
    fn test_copy_requires_visible_password() {
        let (mut app, _, clipboard) = setup();

        press(&mut app, "yy");
        assert!(clipboard.copies.lock().unwrap().is_empty());
        assert_eq!(app.message.as_ref().map(|m| m.1), Some(MessageType::Warning));

        press(&mut app, "syy");
        assert_eq!(*clipboard.copies.lock().unwrap(), ["hunter2"]);
    }

    #[test]
    fn test_delete_asks_first() {
        let (mut app, manager, _) = setup();
        press(&mut app, "dd");
        assert_eq!(app.mode_state.mode, InputMode::Confirm);

        press(&mut app, "n");
        assert_eq!(app.mode_state.mode, InputMode::Normal);
        assert_eq!(manager.fetch(None).unwrap().len(), 3);

        press(&mut app, "ddy");
        assert_eq!(manager.fetch(None).unwrap().len(), 2);
        assert_eq!(app.records.len(), 2);
        assert_eq!(app.records[0].app_name, "mail");
    }

    #[test]
    fn test_filter_and_clear() {
        let (mut app, _, _) = setup();
        press(&mut app, "/ALICE");
        app.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap();

        assert_eq!(app.filter.as_deref(), Some("ALICE"));
        assert_eq!(app.records.len(), 2);

        app.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).unwrap();
        assert_eq!(app.filter, None);
        assert_eq!(app.records.len(), 3);
    }

    #[test]
    fn test_external_changes_reload_rows() {
        let (mut app, manager, _) = setup();
        app.list_state.select(Some(2));

        manager.add("chat", "carol", "pw").unwrap();
        assert!(app.drain_events());
        assert_eq!(app.records.len(), 4);
        assert_eq!(app.selected_record().unwrap().app_name, "bank");

        assert!(!app.drain_events());
    }

    #[test]
    fn test_drop_clears_listener() {
        let (app, manager, _) = setup();
        drop(app);
        manager.add("after", "x", "y").unwrap();
        assert_eq!(manager.fetch(None).unwrap().len(), 4);
    }

    #[test]
    fn test_quit() {
        let (mut app, _, _) = setup();
        assert!(app.handle_key_event(key('q')).unwrap());
        assert!(app.should_quit);
    }
}
