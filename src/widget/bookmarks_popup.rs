use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::managers::DocumentBookmark;
use crate::theme::current_theme;

use super::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarksAction {
    Open(u32),
    /// Bookmark the current page
    Add,
    Delete(u64),
    Close,
}

pub struct BookmarksPopup {
    bookmarks: Vec<DocumentBookmark>,
    state: ListState,
    current_page: u32,
}

impl BookmarksPopup {
    pub fn new(bookmarks: Vec<DocumentBookmark>, current_page: u32) -> Self {
        let mut popup = Self {
            bookmarks: Vec::new(),
            state: ListState::default(),
            current_page,
        };
        popup.set_bookmarks(bookmarks);
        popup
    }

    /// Replace the list, keeping the selection near where it was
    pub fn set_bookmarks(&mut self, bookmarks: Vec<DocumentBookmark>) {
        self.bookmarks = bookmarks;
        let selected = match self.state.selected() {
            _ if self.bookmarks.is_empty() => None,
            Some(i) => Some(i.min(self.bookmarks.len() - 1)),
            None => self
                .bookmarks
                .iter()
                .position(|b| b.page >= self.current_page)
                .or(Some(0)),
        };
        self.state.select(selected);
    }

    pub fn bookmarks(&self) -> &[DocumentBookmark] {
        &self.bookmarks
    }

    pub fn selected(&self) -> Option<&DocumentBookmark> {
        self.state.selected().and_then(|i| self.bookmarks.get(i))
    }

    fn next(&mut self) {
        if self.bookmarks.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| (i + 1) % self.bookmarks.len());
        self.state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.bookmarks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.bookmarks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<BookmarksAction> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.previous();
                None
            }
            KeyCode::Char('a') => Some(BookmarksAction::Add),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.selected().map(|b| BookmarksAction::Delete(b.id))
            }
            KeyCode::Enter => self.selected().map(|b| BookmarksAction::Open(b.page)),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => {
                Some(BookmarksAction::Close)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let popup_area = centered_rect(50, 60, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Bookmarks - a: add  d: delete  Enter: open ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_0c))
            .style(Style::default().bg(palette.base_00));

        if self.bookmarks.is_empty() {
            let hint = Paragraph::new(Line::from(Span::styled(
                "No bookmarks yet. Press a to bookmark this page.",
                Style::default().fg(palette.base_03),
            )))
            .block(block);
            f.render_widget(hint, popup_area);
            return;
        }

        let items: Vec<ListItem> = self
            .bookmarks
            .iter()
            .map(|bookmark| {
                let page_style = if bookmark.page == self.current_page {
                    Style::default()
                        .fg(palette.base_0a)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.base_0d)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>5}  ", bookmark.page), page_style),
                    Span::styled(bookmark.name.as_str(), Style::default().fg(palette.base_06)),
                    Span::styled(
                        format!("  {}", bookmark.created_at.format("%Y-%m-%d")),
                        Style::default().fg(palette.base_03),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(palette.base_02)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("» ");
        f.render_stateful_widget(list, popup_area, &mut self.state);
    }
}
