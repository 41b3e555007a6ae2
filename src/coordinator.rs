//! Page-turn coordinator
//!
//! Decides which page comes before or after a given view and owns the one
//! place where the authoritative current page is written: `after_open_page`,
//! run when a transition completes. The slider and the page-number label are
//! only ever updated from there.

use log::{debug, warn};
use ratatui::layout::Rect;

use crate::chrome::ViewerChrome;
use crate::document::DocumentSession;
use crate::flipper::{NavigationDirection, PageTurnDelegate, SpineLocation};
use crate::page_view::PageView;

pub struct PageTurnCoordinator<D: DocumentSession> {
    document: D,
    spine: SpineLocation,
    page_frame: Rect,
    chrome: ViewerChrome,
}

impl<D: DocumentSession> PageTurnCoordinator<D> {
    pub fn new(document: D, spine: SpineLocation, chrome: ViewerChrome) -> Self {
        Self {
            document,
            spine,
            page_frame: Rect::default(),
            chrome,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn chrome(&self) -> &ViewerChrome {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut ViewerChrome {
        &mut self.chrome
    }

    pub fn spine(&self) -> SpineLocation {
        self.spine
    }

    pub fn page_frame(&self) -> Rect {
        self.page_frame
    }

    pub fn set_page_frame(&mut self, frame: Rect) {
        self.page_frame = frame;
    }

    /// Frame for one page: the whole page area, or half of it in a spread
    pub fn view_frame(&self) -> Rect {
        match self.spine {
            SpineLocation::Min => self.page_frame,
            SpineLocation::Mid => Rect {
                width: self.page_frame.width / 2,
                ..self.page_frame
            },
        }
    }

    fn build_view(&self, page: u32) -> PageView {
        let content = self.document.page_text(page).unwrap_or_else(|e| {
            warn!("Failed to load page {page}: {e}");
            String::new()
        });
        PageView::new(page, self.view_frame(), content)
    }

    /// A fresh view for `page`, or `None` when the document is not loaded,
    /// the page is out of range, or it is already the current page.
    pub fn get_page_widget(&self, page: u32) -> Option<PageView> {
        if !self.document.is_loaded()
            || page < 1
            || page > self.document.page_count()
            || page == self.document.current_page()
        {
            return None;
        }
        Some(self.build_view(page))
    }

    pub fn empty_page_widget(&self) -> PageView {
        PageView::empty(self.view_frame())
    }

    /// The right-hand page of a spread whose left page is `left`
    pub fn companion_of(&self, left: &PageView) -> PageView {
        match left.page_number() {
            Some(page) if page < self.document.page_count() => self.build_view(page + 1),
            _ => self.empty_page_widget(),
        }
    }

    /// A view for any page in range, ignoring the current-page rule.
    /// `None` builds the empty sentinel.
    pub fn rebuild_view(&self, page: Option<u32>) -> PageView {
        match page {
            Some(p) if self.document.is_loaded() && self.in_range(p) => self.build_view(p),
            _ => self.empty_page_widget(),
        }
    }

    /// 2 in spine mode so prior/next move by whole spreads
    pub fn page_increment(&self) -> u32 {
        match self.spine {
            SpineLocation::Mid => 2,
            SpineLocation::Min => 1,
        }
    }

    /// Forward unless the target lies before the current page
    pub fn direction_to(&self, target: u32) -> NavigationDirection {
        if target < self.document.current_page() {
            NavigationDirection::Reverse
        } else {
            NavigationDirection::Forward
        }
    }

    pub fn in_range(&self, page: u32) -> bool {
        page >= 1 && page <= self.document.page_count()
    }

    /// Make the first real visible page current and mirror it into the
    /// label and slider.
    pub fn after_open_page(&mut self, visible: &[PageView]) {
        let Some(page) = visible.iter().find_map(PageView::page_number) else {
            debug!("No page bound in the visible set, position unchanged");
            return;
        };
        self.document.set_current_page(page);
        self.sync_mirrors();
    }

    /// Copy the authoritative position into the label and slider
    pub fn sync_mirrors(&mut self) {
        let current = self.document.current_page();
        let page_count = self.document.page_count();
        self.chrome.sync(current, page_count);
    }
}

impl<D: DocumentSession> PageTurnDelegate for PageTurnCoordinator<D> {
    fn previous_of(&self, reference: &PageView) -> Option<PageView> {
        let page = reference.page_number()?;
        self.get_page_widget(page.saturating_sub(1))
    }

    fn next_of(&self, reference: &PageView) -> Option<PageView> {
        let page = reference.page_number()?;
        if page == self.document.page_count() {
            return match self.spine {
                SpineLocation::Mid => Some(self.empty_page_widget()),
                SpineLocation::Min => None,
            };
        }
        self.get_page_widget(page + 1)
    }

    fn restore_view(&self, page: Option<u32>) -> PageView {
        self.rebuild_view(page)
    }

    fn on_transition_complete(&mut self, completed: bool, visible: &[PageView]) {
        if completed {
            self.after_open_page(visible);
        } else {
            debug!("Page turn abandoned");
        }
    }
}
