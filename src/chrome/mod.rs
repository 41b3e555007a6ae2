//! Toolbar and bottom bar around the page area

mod bottom_bar;
mod toolbar;

pub use bottom_bar::{BottomBar, PageNumberLabel, PageSlider, page_label};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarButton};

use ratatui::layout::Rect;

use crate::settings::Settings;

/// Rows taken by the toolbar and by the bottom bar
pub const BAR_HEIGHT: u16 = 3;

/// The widgets around the page area. Each slot is empty when its
/// configuration flag is off.
#[derive(Debug, Default)]
pub struct ViewerChrome {
    pub toolbar: Option<Toolbar>,
    pub bottom_bar: Option<BottomBar>,
}

impl ViewerChrome {
    pub fn from_settings(settings: &Settings) -> Self {
        let toolbar = settings.toolbar_visible.then(|| Toolbar::new(settings));
        let bottom_bar = settings
            .bottombar_visible
            .then(|| BottomBar::new(settings.page_number_visible));
        Self {
            toolbar,
            bottom_bar,
        }
    }

    /// Mirror the authoritative position into the slider and label
    pub fn sync(&mut self, current: u32, page_count: u32) {
        if let Some(bar) = self.bottom_bar.as_mut() {
            bar.sync(current, page_count);
        }
    }

    pub fn set_page_count(&mut self, page_count: u32) {
        if let Some(bar) = self.bottom_bar.as_mut() {
            bar.slider.set_max(page_count);
        }
    }

    /// Split the screen into toolbar, page area and bottom bar
    pub fn layout(&self, area: Rect) -> ChromeLayout {
        let mut page_area = area;

        let toolbar = self.toolbar.as_ref().map(|_| {
            let height = BAR_HEIGHT.min(page_area.height);
            let rect = Rect::new(page_area.x, page_area.y, page_area.width, height);
            page_area.y += height;
            page_area.height -= height;
            rect
        });

        let bottom_bar = self.bottom_bar.as_ref().map(|_| {
            let height = BAR_HEIGHT.min(page_area.height);
            page_area.height -= height;
            Rect::new(
                page_area.x,
                page_area.y + page_area.height,
                page_area.width,
                height,
            )
        });

        ChromeLayout {
            toolbar,
            page_area,
            bottom_bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    pub toolbar: Option<Rect>,
    pub page_area: Rect,
    pub bottom_bar: Option<Rect>,
}
