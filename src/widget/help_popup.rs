use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::inputs::KeySeq;
use crate::theme::current_theme;

use super::fixed_centered_rect;

pub enum HelpPopupAction {
    Close,
}

pub struct HelpPopup {
    content: String,
    scroll_offset: usize,
    last_popup_area: Option<Rect>,
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpPopup {
    pub fn new() -> Self {
        HelpPopup {
            content: include_str!("../../readme.txt").to_string(),
            scroll_offset: 0,
            last_popup_area: None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let max_content_width = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(60);

        // 2 cells of margin each side plus borders
        let width = (max_content_width + 6) as u16;
        let height = area.height.saturating_mul(9) / 10;
        let popup_area = fixed_centered_rect(width, height, area);
        self.last_popup_area = Some(popup_area);

        f.render_widget(Clear, popup_area);

        let palette = current_theme();
        let lines: Vec<Line> = self
            .content
            .lines()
            .skip(self.scroll_offset)
            .map(|line| {
                Line::from(Span::styled(
                    format!("  {line}"),
                    Style::default().fg(palette.base_05),
                ))
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Help - Press ? or ESC to close ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.base_0c))
                    .style(Style::default().bg(palette.base_00)),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, popup_area);
    }

    fn max_offset(&self) -> usize {
        self.content.lines().count().saturating_sub(1)
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn half_page(&self) -> usize {
        self.last_popup_area
            .map_or(10, |area| (area.height as usize / 2).max(1))
    }

    pub fn handle_key(&mut self, key: KeyEvent, key_seq: &mut KeySeq) -> Option<HelpPopupAction> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('g') if key_seq.handle_key('g') == "gg" => {
                self.scroll_offset = 0;
                key_seq.clear();
            }
            KeyCode::Char('G') => self.scroll_offset = self.max_offset(),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_down(self.half_page());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_up(self.half_page());
            }
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                return Some(HelpPopupAction::Close);
            }
            _ => {}
        }
        None
    }
}
