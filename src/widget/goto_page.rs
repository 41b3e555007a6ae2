use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::theme::current_theme;

use super::fixed_centered_rect;

/// Longest page number accepted
const MAX_DIGITS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoToPageAction {
    Open(u32),
    Close,
}

#[derive(Debug)]
pub struct GoToPagePopup {
    input: String,
    page_count: u32,
    error: Option<String>,
}

impl GoToPagePopup {
    pub fn new(page_count: u32) -> Self {
        Self {
            input: String::new(),
            page_count,
            error: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<GoToPageAction> {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.input.len() < MAX_DIGITS {
                    self.input.push(c);
                }
                self.error = None;
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Some(GoToPageAction::Close),
            _ => None,
        }
    }

    fn submit(&mut self) -> Option<GoToPageAction> {
        match self.input.parse::<u32>() {
            Ok(page) if (1..=self.page_count).contains(&page) => Some(GoToPageAction::Open(page)),
            _ => {
                self.error = Some(format!("Enter 1-{}", self.page_count));
                None
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let popup_area = fixed_centered_rect(30, 4, area);
        f.render_widget(Clear, popup_area);

        let prompt = Line::from(vec![
            Span::styled("Page: ", Style::default().fg(palette.base_04)),
            Span::styled(
                format!("{}_", self.input),
                Style::default()
                    .fg(palette.base_07)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" of {}", self.page_count),
                Style::default().fg(palette.base_03),
            ),
        ]);
        let status = match &self.error {
            Some(error) => Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(palette.base_08),
            )),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![prompt, status]).block(
            Block::default()
                .title(" Go to page ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_0c))
                .style(Style::default().bg(palette.base_00)),
        );
        f.render_widget(paragraph, popup_area);
    }
}
