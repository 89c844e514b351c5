//! Password Cell
//!
//! Display state of one list row: the password is either masked or shown
//! in plain text. Every transition is reported with the row index so the
//! owner can persist the preference.

use zeroize::Zeroize;

use crate::clipboard::Clipboard;
use crate::db::Record;

const MASK_CHAR: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Masked password shown
    Hidden,
    /// Plaintext shown
    Visible,
}

impl Visibility {
    pub fn from_flag(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// Emitted on every visibility transition of a cell bound to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChanged {
    pub row: usize,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The cell is hidden, so no plaintext is on display
    NothingToCopy,
}

#[derive(Debug, Clone)]
pub struct PasswordCell {
    row: Option<usize>,
    masked_text: String,
    visible_text: String,
    visibility: Visibility,
}

impl PasswordCell {
    /// A hidden cell holding `masked_text`
    pub fn new(row: Option<usize>, masked_text: impl Into<String>) -> Self {
        Self {
            row,
            masked_text: masked_text.into(),
            visible_text: String::new(),
            visibility: Visibility::Hidden,
        }
    }

    /// A cell for `record`, starting in whatever state the record persisted
    pub fn for_record(row: usize, record: &Record) -> Self {
        let mut cell = Self::new(Some(row), record.password.clone());
        cell.apply(Visibility::from_flag(record.is_password_visible));
        cell
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// True while the masked element is on display
    pub fn is_masked_shown(&self) -> bool {
        !self.is_visible()
    }

    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    /// What the row shows: bullets while hidden, plaintext while visible
    pub fn display_text(&self) -> String {
        match self.visibility {
            Visibility::Hidden => MASK_CHAR.to_string().repeat(self.masked_text.chars().count()),
            Visibility::Visible => self.visible_text.clone(),
        }
    }

    /// Flip between hidden and visible
    pub fn toggle(&mut self) -> Option<VisibilityChanged> {
        let next = match self.visibility {
            Visibility::Hidden => Visibility::Visible,
            Visibility::Visible => Visibility::Hidden,
        };
        self.transition(next)
    }

    /// Follow an external toggle state; only real transitions are reported
    pub fn set_visible(&mut self, visible: bool) -> Option<VisibilityChanged> {
        let next = Visibility::from_flag(visible);
        if next == self.visibility {
            return None;
        }
        self.transition(next)
    }

    /// Rebind the cell to a new secret, keeping its visibility
    pub fn refresh(&mut self, masked_text: impl Into<String>) {
        self.masked_text.zeroize();
        self.masked_text = masked_text.into();
        self.apply(self.visibility);
    }

    /// Copy the plaintext currently on display
    pub fn copy_plaintext(&self, clipboard: &dyn Clipboard) -> CopyOutcome {
        if !self.is_visible() {
            return CopyOutcome::NothingToCopy;
        }
        clipboard.copy_text(&self.visible_text);
        CopyOutcome::Copied
    }

    fn transition(&mut self, next: Visibility) -> Option<VisibilityChanged> {
        self.apply(next);
        self.row.map(|row| VisibilityChanged {
            row,
            visible: next.is_visible(),
        })
    }

    fn apply(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        self.visible_text.zeroize();
        if visibility.is_visible() {
            self.visible_text = self.masked_text.clone();
        }
    }
}

impl Drop for PasswordCell {
    fn drop(&mut self) {
        self.masked_text.zeroize();
        self.visible_text.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    #[test]
    fn test_toggle_cycle() {
        let mut cell = PasswordCell::new(Some(3), "secret");
        assert_eq!(cell.visibility(), Visibility::Hidden);
        assert!(cell.is_masked_shown());

        let event = cell.toggle();
        assert_eq!(event, Some(VisibilityChanged { row: 3, visible: true }));
        assert_eq!(cell.visible_text(), "secret");
        assert!(!cell.is_masked_shown());

        let event = cell.toggle();
        assert_eq!(event, Some(VisibilityChanged { row: 3, visible: false }));
        assert_eq!(cell.visible_text(), "");
        assert!(cell.is_masked_shown());
    }

    #[test]
    fn test_unbound_cell_reports_nothing() {
        let mut cell = PasswordCell::new(None, "secret");

        assert_eq!(cell.toggle(), None);
        assert!(cell.is_visible());
    }

    #[test]
    fn test_initial_state_follows_record() {
        let mut record = Record::new("Mail".to_string(), "bob".to_string(), "pw1".to_string());
        assert_eq!(PasswordCell::for_record(0, &record).visibility(), Visibility::Hidden);

        record.is_password_visible = true;
        let cell = PasswordCell::for_record(1, &record);
        assert_eq!(cell.visibility(), Visibility::Visible);
        assert_eq!(cell.visible_text(), "pw1");
        assert_eq!(cell.row(), Some(1));
    }

    #[test]
    fn test_set_visible_reports_only_transitions() {
        let mut cell = PasswordCell::new(Some(0), "secret");

        assert_eq!(cell.set_visible(false), None);
        assert_eq!(cell.set_visible(true), Some(VisibilityChanged { row: 0, visible: true }));
        assert_eq!(cell.set_visible(true), None);
    }

    #[test]
    fn test_display_text_masks_per_char() {
        let mut cell = PasswordCell::new(None, "pässwörd");
        assert_eq!(cell.display_text(), "••••••••");

        cell.toggle();
        assert_eq!(cell.display_text(), "pässwörd");
    }

    #[test]
    fn test_refresh_keeps_visibility() {
        let mut cell = PasswordCell::new(Some(0), "old");
        cell.toggle();

        cell.refresh("new");

        assert!(cell.is_visible());
        assert_eq!(cell.visible_text(), "new");
    }

    #[test]
    fn test_copy_visible_plaintext() {
        let clipboard = MemoryClipboard::default();
        let mut cell = PasswordCell::new(Some(0), "secret");
        cell.toggle();

        assert_eq!(cell.copy_plaintext(&clipboard), CopyOutcome::Copied);
        assert_eq!(*clipboard.copies.lock().unwrap(), ["secret"]);
    }

    #[test]
    fn test_copy_while_hidden_writes_nothing() {
        let clipboard = MemoryClipboard::default();
        let mut cell = PasswordCell::new(Some(0), "secret");

        assert_eq!(cell.copy_plaintext(&clipboard), CopyOutcome::NothingToCopy);

        cell.toggle();
        cell.toggle();
        assert_eq!(cell.copy_plaintext(&clipboard), CopyOutcome::NothingToCopy);
        assert!(clipboard.copies.lock().unwrap().is_empty());
    }
}
