//! List View Component
//!
//! Displays records in a scrollable list, one password cell per row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::cell::PasswordCell;
use crate::db::Record;
use crate::ui::renderer::Renderer;

const APP_WIDTH: usize = 24;
const USER_WIDTH: usize = 28;

#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    pub selected: Option<usize>,
    pub total: usize,
    list_state: ListState,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        self.list_state.select(index);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.select(compute_selection_after_total_change(self.selected, total));
    }

    pub fn move_up(&mut self) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.unwrap_or(0).saturating_sub(1);
        self.select(Some(new_index));
    }

    pub fn move_down(&mut self) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.map_or(0, |i| (i + 1).min(self.total - 1));
        self.select(Some(new_index));
    }

    pub fn move_to_top(&mut self) {
        if self.total > 0 {
            self.select(Some(0));
        }
    }

    pub fn move_to_bottom(&mut self) {
        if self.total > 0 {
            self.select(Some(self.total - 1));
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.unwrap_or(0).saturating_sub(page_size);
        self.select(Some(new_index));
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.map_or(0, |i| (i + page_size).min(self.total - 1));
        self.select(Some(new_index));
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }
}

fn compute_selection_after_total_change(selected: Option<usize>, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    match selected {
        Some(sel) if sel >= total => Some(total - 1),
        Some(sel) => Some(sel),
        None => Some(0),
    }
}

/// Records paired with their password cells, row for row
pub struct RecordList<'a> {
    records: &'a [Record],
    cells: &'a [PasswordCell],
    block: Option<Block<'a>>,
    highlight_style: Style,
}

impl<'a> RecordList<'a> {
    pub fn new(records: &'a [Record], cells: &'a [PasswordCell]) -> Self {
        Self {
            records,
            cells,
            block: None,
            highlight_style: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn build_selection_symbol(is_selected: bool) -> Span<'static> {
    if is_selected {
        Span::styled("▌ ", Style::default().fg(Color::Magenta).bg(Color::DarkGray))
    } else {
        Span::raw("  ")
    }
}

fn password_span(cell: &PasswordCell, base_style: Style) -> Span<'static> {
    if cell.is_visible() {
        Span::styled(cell.display_text(), base_style.fg(Color::Yellow))
    } else {
        Span::styled(cell.display_text(), base_style.fg(Renderer::hex_color(0x4C566A)))
    }
}

fn build_list_item<'a>(
    record: &'a Record,
    cell: &PasswordCell,
    is_selected: bool,
    highlight_style: Style,
) -> ListItem<'a> {
    let base_style = if is_selected { highlight_style } else { Style::default() };
    let spans = vec![
        build_selection_symbol(is_selected),
        Span::styled(fit(&record.app_name, APP_WIDTH), base_style.fg(Color::White)),
        Span::raw(" "),
        Span::styled(fit(&record.user_name, USER_WIDTH), base_style.fg(Color::Cyan)),
        Span::raw(" "),
        password_span(cell, base_style),
    ];

    let item = ListItem::new(Line::from(spans));
    if is_selected { item.style(highlight_style) } else { item }
}

impl<'a> StatefulWidget for RecordList<'a> {
    type State = ListViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let selected = state.selected();

        let items: Vec<ListItem> = self
            .records
            .iter()
            .zip(self.cells)
            .enumerate()
            .map(|(i, (record, cell))| {
                build_list_item(record, cell, Some(i) == selected, self.highlight_style)
            })
            .collect();

        let list = List::new(items);
        let list = match self.block {
            Some(block) => list.block(block),
            None => list,
        };

        StatefulWidget::render(list, area, buf, state.list_state_mut());
    }
}

pub struct EmptyState<'a> {
    message: &'a str,
    hint: Option<&'a str>,
}

impl<'a> EmptyState<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message, hint: None }
    }

    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }
}

fn center_x(area: &Rect, text_len: usize) -> u16 {
    area.x + (area.width.saturating_sub(text_len as u16)) / 2
}

impl<'a> Widget for EmptyState<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let center_y = area.y + area.height / 2;
        let msg_x = center_x(&area, self.message.chars().count());
        buf.set_string(msg_x, center_y, self.message, Style::default().fg(Color::DarkGray));

        if let Some(hint) = self.hint {
            let hint_x = center_x(&area, hint.chars().count());
            let style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
            buf.set_string(hint_x, center_y + 1, hint, style);
        }
    }
}
