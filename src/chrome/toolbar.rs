use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::settings::Settings;
use crate::theme::current_theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    FirstPage,
    PriorPage,
    GoToPage,
    NextPage,
    LastPage,
    ZoomOut,
    ZoomIn,
    Note,
    Bookmarks,
    Thumbs,
}

impl ToolbarAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstPage => "|<",
            Self::PriorPage => "<",
            Self::GoToPage => "#",
            Self::NextPage => ">",
            Self::LastPage => ">|",
            Self::ZoomOut => "-",
            Self::ZoomIn => "+",
            Self::Note => "Note",
            Self::Bookmarks => "Marks",
            Self::Thumbs => "Pages",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    area: Rect,
}

impl ToolbarButton {
    fn new(action: ToolbarAction) -> Self {
        Self {
            action,
            area: Rect::default(),
        }
    }

    /// Where the button was drawn last frame
    pub fn area(&self) -> Rect {
        self.area
    }
}

#[derive(Debug)]
pub struct Toolbar {
    buttons: Vec<ToolbarButton>,
    hovered: Option<ToolbarAction>,
}

impl Toolbar {
    pub fn new(settings: &Settings) -> Self {
        let mut buttons: Vec<ToolbarButton> = [
            ToolbarAction::FirstPage,
            ToolbarAction::PriorPage,
            ToolbarAction::GoToPage,
            ToolbarAction::NextPage,
            ToolbarAction::LastPage,
            ToolbarAction::ZoomOut,
            ToolbarAction::ZoomIn,
        ]
        .into_iter()
        .map(ToolbarButton::new)
        .collect();

        if settings.note_btn_visible {
            buttons.push(ToolbarButton::new(ToolbarAction::Note));
        }
        if settings.bookmarks_btn_visible {
            buttons.push(ToolbarButton::new(ToolbarAction::Bookmarks));
        }
        if settings.thumbs_btn_visible {
            buttons.push(ToolbarButton::new(ToolbarAction::Thumbs));
        }

        Self {
            buttons,
            hovered: None,
        }
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    pub fn action_at(&self, column: u16, row: u16) -> Option<ToolbarAction> {
        let pos = Position::new(column, row);
        self.buttons
            .iter()
            .find(|b| b.area.contains(pos))
            .map(|b| b.action)
    }

    pub fn set_hovered(&mut self, column: u16, row: u16) {
        self.hovered = self.action_at(column, row);
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str) {
        let palette = current_theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_03))
            .style(Style::default().bg(palette.base_01))
            .title(format!(" {title} "));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut x = inner.x + 1;
        let right = inner.x + inner.width;
        let mut spans = vec![Span::raw(" ")];
        for button in &mut self.buttons {
            let label = format!(" {} ", button.action.label());
            let width = label.width() as u16;
            if x + width > right {
                // Buttons that do not fit are not clickable this frame
                button.area = Rect::default();
                continue;
            }
            button.area = Rect::new(x, inner.y, width, inner.height.min(1));
            let (fg, bg) = palette.button_colors(self.hovered == Some(button.action));
            spans.push(Span::styled(
                label,
                Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            x += width + 1;
        }
        f.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn optional_buttons_follow_flags() {
        let settings = Settings {
            note_btn_visible: false,
            bookmarks_btn_visible: true,
            thumbs_btn_visible: false,
            ..Settings::default()
        };
        let toolbar = Toolbar::new(&settings);
        let has = |action| toolbar.buttons().iter().any(|b| b.action == action);
        assert!(!has(ToolbarAction::Note));
        assert!(has(ToolbarAction::Bookmarks));
        assert!(!has(ToolbarAction::Thumbs));
        assert_eq!(toolbar.buttons().len(), 8);
    }

    #[test]
    fn navigation_buttons_are_always_present() {
        let settings = Settings {
            note_btn_visible: false,
            bookmarks_btn_visible: false,
            thumbs_btn_visible: false,
            ..Settings::default()
        };
        let toolbar = Toolbar::new(&settings);
        let actions: Vec<_> = toolbar.buttons().iter().map(|b| b.action).collect();
        assert_eq!(
            actions,
            vec![
                ToolbarAction::FirstPage,
                ToolbarAction::PriorPage,
                ToolbarAction::GoToPage,
                ToolbarAction::NextPage,
                ToolbarAction::LastPage,
                ToolbarAction::ZoomOut,
                ToolbarAction::ZoomIn,
            ]
        );
    }

    #[test]
    fn rendered_buttons_are_clickable() {
        let mut toolbar = Toolbar::new(&Settings::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();
        terminal
            .draw(|f| toolbar.render(f, Rect::new(0, 0, 80, 3), "doc"))
            .unwrap();

        let first = toolbar.buttons()[0].area();
        assert_eq!(toolbar.action_at(first.x, first.y), Some(ToolbarAction::FirstPage));
        let zoom_in = toolbar
            .buttons()
            .iter()
            .find(|b| b.action == ToolbarAction::ZoomIn)
            .unwrap()
            .area();
        assert_eq!(
            toolbar.action_at(zoom_in.x + 1, zoom_in.y),
            Some(ToolbarAction::ZoomIn)
        );
        assert_eq!(toolbar.action_at(79, 2), None);
    }
}
