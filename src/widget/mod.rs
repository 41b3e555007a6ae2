pub mod bookmarks_popup;
pub mod goto_page;
pub mod help_popup;
pub mod hud_message;
pub mod note_popup;
pub mod thumbs_popup;

pub use bookmarks_popup::{BookmarksAction, BookmarksPopup};
pub use goto_page::{GoToPageAction, GoToPagePopup};
pub use help_popup::{HelpPopup, HelpPopupAction};
pub use hud_message::{HudMessage, HudMode};
pub use note_popup::{NoteAction, NotePopup};
pub use thumbs_popup::{ThumbsAction, ThumbsPopup};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rect of `percent_x` by `percent_y` of `r`, centered in it
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-size rect centered in `r`, shrunk to fit
pub fn fixed_centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
