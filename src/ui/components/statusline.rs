//! Status Line Component
//!
//! Displays mode indicator, messages, and store info.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::input::InputMode;

/// Message type for status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::White,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Status line widget
pub struct StatusLine<'a> {
    mode: InputMode,
    search_buffer: Option<&'a str>,
    filter: Option<&'a str>,
    message: Option<(&'a str, MessageType)>,
    store_name: Option<&'a str>,
    item_count: Option<(usize, usize)>,
}

impl<'a> StatusLine<'a> {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            search_buffer: None,
            filter: None,
            message: None,
            store_name: None,
            item_count: None,
        }
    }

    pub fn search_buffer(mut self, buffer: &'a str) -> Self {
        self.search_buffer = Some(buffer);
        self
    }

    pub fn filter(mut self, filter: &'a str) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn message(mut self, msg: &'a str, msg_type: MessageType) -> Self {
        self.message = Some((msg, msg_type));
        self
    }

    pub fn store_name(mut self, name: &'a str) -> Self {
        self.store_name = Some(name);
        self
    }

    pub fn item_count(mut self, selected: usize, total: usize) -> Self {
        self.item_count = Some((selected, total));
        self
    }
}

fn mode_style(mode: InputMode) -> Style {
    let bg = match mode {
        InputMode::Normal => Color::Blue,
        InputMode::Search => Color::Magenta,
        InputMode::Confirm => Color::Red,
    };
    Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
}

impl<'a> Widget for StatusLine<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Color::DarkGray));

        let mut x = area.x;

        let mode_text = format!(" {} ", self.mode.indicator());
        buf.set_string(x, area.y, &mode_text, mode_style(self.mode));
        x += mode_text.len() as u16 + 1;

        let text_style = Style::default().bg(Color::DarkGray);
        if let Some(buffer) = self.search_buffer {
            buf.set_string(x, area.y, format!("/{}", buffer), text_style.fg(Color::White));
        } else if let Some((msg, msg_type)) = self.message {
            buf.set_string(x, area.y, msg, text_style.fg(msg_type.color()));
        } else if let Some(filter) = self.filter {
            buf.set_string(x, area.y, format!("filter: {}", filter), text_style.fg(Color::Cyan));
        }

        let mut right_parts: Vec<String> = Vec::new();
        if let Some((selected, total)) = self.item_count {
            right_parts.push(format!("{}/{}", selected + 1, total));
        }
        if let Some(name) = self.store_name {
            right_parts.push(name.to_string());
        }

        let right_text = right_parts.join(" ");
        let right_x = area.x + area.width.saturating_sub(right_text.chars().count() as u16 + 1);
        buf.set_string(right_x, area.y, &right_text, text_style.fg(Color::Gray));
    }
}

/// Help bar widget
pub struct HelpBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> HelpBar<'a> {
    pub fn for_mode(mode: InputMode) -> Self {
        let hints = match mode {
            InputMode::Normal => vec![
                ("j/k", "navigate"),
                ("s", "show/hide"),
                ("yy", "copy"),
                ("dd", "delete"),
                ("/", "filter"),
                ("C-r", "refresh"),
                ("q", "quit"),
            ],
            InputMode::Search => vec![("Esc", "cancel"), ("Enter", "apply")],
            InputMode::Confirm => vec![("y", "yes"), ("n", "no")],
        };
        Self { hints }
    }
}

impl<'a> Widget for HelpBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
        }
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
