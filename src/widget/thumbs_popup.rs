use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::theme::current_theme;

use super::centered_rect;

/// Cells per page tile, including the gap
const TILE_WIDTH: u16 = 7;
const TILE_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbsAction {
    Open(u32),
    Close,
}

/// Grid of page tiles; the current page is highlighted
#[derive(Debug)]
pub struct ThumbsPopup {
    page_count: u32,
    current_page: u32,
    selected: u32,
    columns: u32,
    first_row: u32,
    tiles: Vec<(u32, Rect)>,
}

impl ThumbsPopup {
    pub fn new(page_count: u32, current_page: u32) -> Self {
        let selected = current_page.clamp(1, page_count.max(1));
        Self {
            page_count,
            current_page,
            selected,
            columns: 8,
            first_row: 0,
            tiles: Vec::new(),
        }
    }

    pub fn selected(&self) -> u32 {
        self.selected
    }

    fn select(&mut self, page: i64) {
        let last = i64::from(self.page_count.max(1));
        self.selected = page.clamp(1, last) as u32;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ThumbsAction> {
        let selected = i64::from(self.selected);
        let columns = i64::from(self.columns);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.select(selected - 1),
            KeyCode::Right | KeyCode::Char('l') => self.select(selected + 1),
            KeyCode::Up | KeyCode::Char('k') => self.select(selected - columns),
            KeyCode::Down | KeyCode::Char('j') => self.select(selected + columns),
            KeyCode::Home => self.select(1),
            KeyCode::End => self.select(i64::from(self.page_count)),
            KeyCode::Enter => return Some(ThumbsAction::Open(self.selected)),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('t') => {
                return Some(ThumbsAction::Close);
            }
            _ => {}
        }
        None
    }

    /// Page tile under a click, from the last render
    pub fn page_at(&self, column: u16, row: u16) -> Option<u32> {
        let pos = Position::new(column, row);
        self.tiles
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(page, _)| *page)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let popup_area = centered_rect(80, 80, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" Pages - {}/{} ", self.selected, self.page_count))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_0c))
            .style(Style::default().bg(palette.base_00));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        self.tiles.clear();
        self.columns = u32::from((inner.width / TILE_WIDTH).max(1));
        let rows = u32::from((inner.height / TILE_HEIGHT).max(1));

        let selected_row = (self.selected - 1) / self.columns;
        if selected_row < self.first_row {
            self.first_row = selected_row;
        } else if selected_row >= self.first_row + rows {
            self.first_row = selected_row + 1 - rows;
        }

        let first_page = self.first_row * self.columns + 1;
        let last_page = (first_page + rows * self.columns - 1).min(self.page_count);
        for page in first_page..=last_page {
            let index = page - first_page;
            let x = inner.x + (index % self.columns) as u16 * TILE_WIDTH;
            let y = inner.y + (index / self.columns) as u16 * TILE_HEIGHT;
            let tile = Rect::new(x, y, TILE_WIDTH - 1, TILE_HEIGHT).intersection(inner);

            let mut style = Style::default().fg(palette.base_03);
            if page == self.current_page {
                style = style.fg(palette.base_0a).add_modifier(Modifier::BOLD);
            }
            let border_style = if page == self.selected {
                Style::default().fg(palette.base_0d)
            } else {
                Style::default().fg(palette.base_02)
            };
            let cell = Paragraph::new(Line::from(page.to_string()).centered())
                .style(style)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style),
                );
            f.render_widget(cell, tile);
            self.tiles.push((page, tile));
        }
    }
}
