//! Renderer
//!
//! Main rendering logic for the list view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};

use super::components::{
    ConfirmDialog, EmptyState, HelpBar, ListViewState, MessageType, RecordList, StatusLine,
};
use crate::cell::PasswordCell;
use crate::db::Record;
use crate::input::InputMode;

pub struct UiState<'a> {
    pub mode: InputMode,
    pub records: &'a [Record],
    pub cells: &'a [PasswordCell],
    pub list_state: &'a mut ListViewState,
    pub search_buffer: Option<&'a str>,
    pub filter: Option<&'a str>,
    pub message: Option<(&'a str, MessageType)>,
    pub confirm_message: Option<&'a str>,
    pub store_name: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn hex_color(rgb: u32) -> Color {
        Color::Rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    pub fn render(frame: &mut Frame, state: &mut UiState) {
        let size = frame.area();
        let chunks = create_main_layout(size);

        render_list(frame, chunks[0], state);
        render_status_line(frame, chunks[1], state);
        frame.render_widget(HelpBar::for_mode(state.mode), chunks[2]);
        render_confirm_overlay(frame, size, state);
    }
}

fn create_main_layout(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size)
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &UiState) {
    let mut status = StatusLine::new(state.mode);

    if let Some(buffer) = state.search_buffer {
        status = status.search_buffer(buffer);
    } else if let Some((msg, msg_type)) = state.message {
        status = status.message(msg, msg_type);
    }
    if let Some(filter) = state.filter {
        status = status.filter(filter);
    }
    if let Some(name) = state.store_name {
        status = status.store_name(name);
    }
    if let Some(selected) = state.list_state.selected() {
        status = status.item_count(selected, state.list_state.total);
    }

    frame.render_widget(status, area);
}

fn render_list(frame: &mut Frame, area: Rect, state: &mut UiState) {
    if state.records.is_empty() {
        let empty = match state.filter {
            Some(_) => EmptyState::new("No matching records").hint("Press Esc to clear the filter"),
            None => EmptyState::new("No records").hint("Add one with `password-manager add`"),
        };
        frame.render_widget(empty, area);
        return;
    }

    let block = Block::default()
        .title(" Passwords ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta));
    let list = RecordList::new(state.records, state.cells).block(block);
    frame.render_stateful_widget(list, area, state.list_state);
}

fn render_confirm_overlay(frame: &mut Frame, area: Rect, state: &UiState) {
    if state.mode != InputMode::Confirm {
        return;
    }
    if let Some(msg) = state.confirm_message {
        frame.render_widget(ConfirmDialog::new(" Confirm ", msg), area);
    }
}
