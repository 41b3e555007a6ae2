//! Document viewer
//!
//! Owns the page-turn coordinator and the paging widget side by side, so the
//! coordinator can be lent to the flipper as its delegate. All navigation
//! entry points (toolbar, keys, slider, popups) end up in `open_page`.

use std::path::Path;

use log::{debug, info};
use ratatui::{Frame, layout::Rect};

use crate::chrome::{ChromeLayout, ToolbarAction, ViewerChrome};
use crate::coordinator::PageTurnCoordinator;
use crate::document::{DocumentError, DocumentSession};
use crate::flipper::{NavigationDirection, PageFlipper, PageTurnDelegate, SpineLocation};
use crate::page_view::PageView;
use crate::settings::Settings;
use crate::zoom::ScrollDirection;

pub struct DocumentViewer<D: DocumentSession> {
    coordinator: PageTurnCoordinator<D>,
    flipper: PageFlipper,
    area: Rect,
}

impl<D: DocumentSession> DocumentViewer<D> {
    pub fn new(document: D, settings: &Settings) -> Self {
        let spine = settings.spine_location();
        let chrome = ViewerChrome::from_settings(settings);
        Self {
            coordinator: PageTurnCoordinator::new(document, spine, chrome),
            flipper: PageFlipper::new(
                settings.page_transition_style,
                settings.page_navigation_orientation,
                spine,
            ),
            area: Rect::default(),
        }
    }

    /// Open the document file behind this viewer
    pub fn load(&mut self, path: &Path) -> Result<(), DocumentError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.coordinator.document_mut().open(&name, path)?;
        if self.coordinator.document().page_count() == 0 {
            self.coordinator.document_mut().close();
            return Err(DocumentError::Empty);
        }
        info!(
            "Loaded {name}: {} pages",
            self.coordinator.document().page_count()
        );
        Ok(())
    }

    /// Put the first spread on screen without animation.
    ///
    /// `resume` is a remembered page; out-of-range values fall back to 1.
    pub fn show_initial_page(&mut self, resume: Option<u32>) -> Result<(), DocumentError> {
        if !self.coordinator.document().is_loaded() {
            return Err(DocumentError::NotLoaded);
        }
        let page_count = self.coordinator.document().page_count();
        self.coordinator.chrome_mut().set_page_count(page_count);

        let target = resume
            .filter(|page| self.coordinator.in_range(*page))
            .unwrap_or(1);
        let first = self.coordinator.rebuild_view(Some(target));
        let views = self.spread_from(first);
        self.flipper.set_views(
            views,
            NavigationDirection::Forward,
            false,
            &mut self.coordinator,
        );
        Ok(())
    }

    /// Left page plus its companion in a spread, the page alone otherwise
    fn spread_from(&self, first: PageView) -> Vec<PageView> {
        match self.coordinator.spine() {
            SpineLocation::Min => vec![first],
            SpineLocation::Mid => {
                let second = self.coordinator.companion_of(&first);
                vec![first, second]
            }
        }
    }

    /// Start an animated transition to `target`.
    ///
    /// Returns false without touching anything when the page is out of range
    /// or already current. The position changes once the transition
    /// completes.
    pub fn open_page(&mut self, target: u32) -> bool {
        // Resolve against the position the user last asked for
        self.flipper.finish(&mut self.coordinator);

        let Some(first) = self.coordinator.get_page_widget(target) else {
            debug!(
                "open_page({target}) ignored, current {} of {}",
                self.current_page(),
                self.page_count()
            );
            return false;
        };
        let direction = self.coordinator.direction_to(target);
        let views = self.spread_from(first);
        self.flipper
            .set_views(views, direction, true, &mut self.coordinator);
        true
    }

    pub fn open_first_page(&mut self) -> bool {
        self.open_page(1)
    }

    pub fn open_prior_page(&mut self) -> bool {
        self.flipper.finish(&mut self.coordinator);
        let target = self
            .current_page()
            .saturating_sub(self.coordinator.page_increment());
        self.open_page(target)
    }

    pub fn open_next_page(&mut self) -> bool {
        self.flipper.finish(&mut self.coordinator);
        let target = self
            .current_page()
            .saturating_add(self.coordinator.page_increment());
        self.open_page(target)
    }

    pub fn open_last_page(&mut self) -> bool {
        let last = self.page_count();
        self.open_page(last)
    }

    /// Gesture turn through the delegate, e.g. from the mouse wheel
    pub fn turn(&mut self, direction: NavigationDirection) -> bool {
        self.flipper.turn(direction, &mut self.coordinator)
    }

    /// One animation frame; true while something moved
    pub fn tick(&mut self) -> bool {
        self.flipper.advance(&mut self.coordinator)
    }

    pub fn finish_transition(&mut self) {
        self.flipper.finish(&mut self.coordinator);
    }

    /// Cancel the running turn and put the previous pages back
    pub fn abandon_transition(&mut self) -> bool {
        self.flipper.abandon(&mut self.coordinator)
    }

    pub fn is_animating(&self) -> bool {
        self.flipper.is_animating()
    }

    /// The page zoom requests go to, if zooming is possible at all
    fn zoom_target(&mut self) -> Option<&mut PageView> {
        if !self.coordinator.document().is_loaded() {
            return None;
        }
        self.flipper
            .visible_mut()
            .first_mut()
            .filter(|view| !view.is_empty_page())
    }

    pub fn zoom_in(&mut self) -> bool {
        match self.zoom_target() {
            Some(view) => {
                view.zoom_increment();
                true
            }
            None => false,
        }
    }

    pub fn zoom_out(&mut self) -> bool {
        match self.zoom_target() {
            Some(view) => {
                view.zoom_decrement();
                true
            }
            None => false,
        }
    }

    pub fn pan(&mut self, direction: ScrollDirection) {
        if let Some(view) = self.zoom_target() {
            view.pan(direction);
        }
    }

    /// Zoom factor of the current page, if it is a real page
    pub fn zoom_factor(&self) -> Option<f32> {
        self.flipper
            .current()
            .filter(|view| !view.is_empty_page())
            .map(|view| view.zoom().factor())
    }

    /// Lay the viewer out in `area`. A running turn is finished first, then
    /// visible pages get the new frame, new zoom bounds and their zoom reset.
    pub fn resize(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        self.finish_transition();
        self.area = area;
        let layout = self.coordinator.chrome().layout(area);
        self.coordinator.set_page_frame(layout.page_area);

        let frame = self.coordinator.view_frame();
        for view in self.flipper.visible_mut() {
            view.set_frame(frame);
            if !view.is_empty_page() {
                view.update_minimum_maximum_zoom();
                view.zoom_reset();
            }
        }
    }

    pub fn layout(&self) -> ChromeLayout {
        self.coordinator.chrome().layout(self.area)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.resize(area);
        let layout = self.layout();
        let title = self.coordinator.document().name().to_string();
        let chrome = self.coordinator.chrome_mut();

        if let (Some(toolbar), Some(rect)) = (chrome.toolbar.as_mut(), layout.toolbar) {
            toolbar.render(f, rect, &title);
        }
        if let (Some(bar), Some(rect)) = (chrome.bottom_bar.as_mut(), layout.bottom_bar) {
            bar.render(f, rect);
        }
        self.flipper.render(f, layout.page_area);
    }

    pub fn toolbar_action_at(&self, column: u16, row: u16) -> Option<ToolbarAction> {
        self.coordinator
            .chrome()
            .toolbar
            .as_ref()
            .and_then(|t| t.action_at(column, row))
    }

    pub fn hover(&mut self, column: u16, row: u16) {
        if let Some(toolbar) = self.coordinator.chrome_mut().toolbar.as_mut() {
            toolbar.set_hovered(column, row);
        }
    }

    pub fn slider_contains(&self, column: u16, row: u16) -> bool {
        self.coordinator
            .chrome()
            .bottom_bar
            .as_ref()
            .is_some_and(|bar| bar.slider.contains(column, row))
    }

    pub fn is_slider_dragging(&self) -> bool {
        self.coordinator
            .chrome()
            .bottom_bar
            .as_ref()
            .is_some_and(|bar| bar.slider.is_dragging())
    }

    /// Drag the slider to the value under `column`; the label previews it
    pub fn slider_drag_to_column(&mut self, column: u16) {
        if let Some(bar) = self.coordinator.chrome_mut().bottom_bar.as_mut() {
            let value = bar.slider.value_at(column);
            bar.slider.drag_to(value);
            bar.preview_changed();
        }
    }

    pub fn slider_nudge(&mut self, delta: i64) {
        if let Some(bar) = self.coordinator.chrome_mut().bottom_bar.as_mut() {
            bar.slider.nudge(delta);
            bar.preview_changed();
        }
    }

    /// End a slider drag and open the chosen page. When nothing opens the
    /// mirrors go back to the authoritative position.
    pub fn slider_release(&mut self) -> bool {
        let released = self
            .coordinator
            .chrome_mut()
            .bottom_bar
            .as_mut()
            .and_then(|bar| bar.slider.release());
        let Some(target) = released else {
            return false;
        };
        if self.open_page(target) {
            return true;
        }
        self.coordinator.sync_mirrors();
        false
    }

    pub fn slider_cancel(&mut self) {
        if let Some(bar) = self.coordinator.chrome_mut().bottom_bar.as_mut() {
            bar.slider.cancel_drag();
        }
        self.coordinator.sync_mirrors();
    }

    pub fn document(&self) -> &D {
        self.coordinator.document()
    }

    pub fn current_page(&self) -> u32 {
        self.coordinator.document().current_page()
    }

    pub fn page_count(&self) -> u32 {
        self.coordinator.document().page_count()
    }

    pub fn spine(&self) -> SpineLocation {
        self.coordinator.spine()
    }

    pub fn chrome(&self) -> &ViewerChrome {
        self.coordinator.chrome()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.chrome()
            .bottom_bar
            .as_ref()
            .and_then(|bar| bar.label.as_ref())
            .map(|label| label.text())
    }

    pub fn slider_value(&self) -> Option<u32> {
        self.chrome().bottom_bar.as_ref().map(|bar| bar.slider.value())
    }

    /// Pages on screen, `None` for the empty sentinel
    pub fn displayed_pages(&self) -> Vec<Option<u32>> {
        self.flipper
            .visible()
            .iter()
            .map(PageView::page_number)
            .collect()
    }

    pub fn live_view_count(&self) -> usize {
        self.flipper.live_view_count()
    }

    /// Neighbor lookups, for callers that only want to know whether a turn
    /// is possible
    pub fn can_turn(&self, direction: NavigationDirection) -> bool {
        let reference = match direction {
            NavigationDirection::Forward => self.flipper.visible().last(),
            NavigationDirection::Reverse => self.flipper.visible().first(),
        };
        let Some(reference) = reference else {
            return false;
        };
        match direction {
            NavigationDirection::Forward => self
                .coordinator
                .next_of(reference)
                .is_some_and(|v| !v.is_empty_page()),
            NavigationDirection::Reverse => {
                let previous = self.coordinator.previous_of(reference);
                match self.flipper.spine() {
                    SpineLocation::Min => previous.is_some(),
                    SpineLocation::Mid => previous
                        .and_then(|right| self.coordinator.previous_of(&right))
                        .is_some(),
                }
            }
        }
    }
}

impl<D: DocumentSession> Drop for DocumentViewer<D> {
    fn drop(&mut self) {
        self.coordinator.document_mut().close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocument;
    use crate::flipper::TURN_FRAMES;

    fn viewer(page_count: u32, settings: &Settings) -> DocumentViewer<InMemoryDocument> {
        let mut viewer = DocumentViewer::new(InMemoryDocument::numbered(page_count), settings);
        viewer.resize(Rect::new(0, 0, 100, 30));
        viewer.show_initial_page(None).unwrap();
        viewer
    }

    fn spread_settings() -> Settings {
        Settings {
            dual_page: true,
            ..Settings::default()
        }
    }

    fn settle(viewer: &mut DocumentViewer<InMemoryDocument>) {
        for _ in 0..TURN_FRAMES {
            viewer.tick();
        }
    }

    #[test]
    fn initial_page_is_synced() {
        let v = viewer(10, &Settings::default());
        assert_eq!(v.current_page(), 1);
        assert_eq!(v.label_text(), Some("1/10"));
        assert_eq!(v.slider_value(), Some(1));
    }

    #[test]
    fn resume_page_out_of_range_falls_back_to_first() {
        let mut v = DocumentViewer::new(InMemoryDocument::numbered(10), &Settings::default());
        v.show_initial_page(Some(42)).unwrap();
        assert_eq!(v.current_page(), 1);

        let mut v = DocumentViewer::new(InMemoryDocument::numbered(10), &Settings::default());
        v.show_initial_page(Some(7)).unwrap();
        assert_eq!(v.current_page(), 7);
    }

    #[test]
    fn open_forward_syncs_after_completion() {
        let mut v = viewer(10, &Settings::default());
        assert!(v.open_page(5));

        // Not yet: the position follows the completed transition
        assert_eq!(v.current_page(), 1);
        assert_eq!(v.label_text(), Some("1/10"));
        assert_eq!(v.displayed_pages(), vec![Some(5)]);

        settle(&mut v);
        assert_eq!(v.current_page(), 5);
        assert_eq!(v.label_text(), Some("5/10"));
        assert_eq!(v.slider_value(), Some(5));
    }

    #[test]
    fn open_backward() {
        let mut v = viewer(10, &Settings::default());
        v.open_page(5);
        settle(&mut v);
        assert!(v.open_page(3));
        settle(&mut v);
        assert_eq!(v.current_page(), 3);
        assert_eq!(v.label_text(), Some("3/10"));
    }

    #[test]
    fn out_of_range_and_current_are_ignored() {
        let mut v = viewer(10, &Settings::default());
        for page in [0, 11, 1] {
            assert!(!v.open_page(page), "page {page}");
            assert!(!v.is_animating());
        }
        assert_eq!(v.current_page(), 1);
    }

    #[test]
    fn open_page_finishes_a_running_turn_first() {
        let mut v = viewer(10, &Settings::default());
        v.open_page(4);
        v.open_page(6);
        assert_eq!(v.current_page(), 4);
        settle(&mut v);
        assert_eq!(v.current_page(), 6);
    }

    #[test]
    fn prior_and_next_step_by_one_page() {
        let mut v = viewer(10, &Settings::default());
        assert!(!v.open_prior_page());
        v.open_next_page();
        v.open_next_page();
        settle(&mut v);
        assert_eq!(v.current_page(), 3);
        v.open_last_page();
        settle(&mut v);
        assert_eq!(v.current_page(), 10);
        assert!(!v.open_next_page());
        v.open_first_page();
        settle(&mut v);
        assert_eq!(v.current_page(), 1);
    }

    #[test]
    fn spread_steps_by_two_and_shows_pairs() {
        let mut v = viewer(10, &spread_settings());
        assert_eq!(v.displayed_pages(), vec![Some(1), Some(2)]);
        v.open_next_page();
        settle(&mut v);
        assert_eq!(v.current_page(), 3);
        assert_eq!(v.displayed_pages(), vec![Some(3), Some(4)]);
        assert!(v.live_view_count() <= crate::flipper::MAX_PAGE_VIEWS);
    }

    #[test]
    fn spread_last_page_pairs_with_sentinel() {
        let mut v = viewer(10, &spread_settings());
        v.open_last_page();
        settle(&mut v);
        assert_eq!(v.displayed_pages(), vec![Some(10), None]);
        assert_eq!(v.label_text(), Some("10/10"));
        assert!(!v.can_turn(NavigationDirection::Forward));
    }

    #[test]
    fn gesture_turn_syncs_like_buttons() {
        let mut v = viewer(10, &Settings::default());
        assert!(v.turn(NavigationDirection::Forward));
        assert_eq!(v.current_page(), 1);
        settle(&mut v);
        assert_eq!(v.current_page(), 2);
        assert_eq!(v.label_text(), Some("2/10"));
    }

    #[test]
    fn abandoned_turn_keeps_position() {
        let mut v = viewer(10, &Settings::default());
        v.turn(NavigationDirection::Forward);
        assert!(v.abandon_transition());
        assert_eq!(v.displayed_pages(), vec![Some(1)]);
        assert_eq!(v.current_page(), 1);
        assert_eq!(v.label_text(), Some("1/10"));
    }

    #[test]
    fn zoom_is_per_page_and_reset_on_resize() {
        let mut v = viewer(10, &Settings::default());
        assert!(v.zoom_in());
        assert!(v.zoom_factor().unwrap() > 1.0);
        v.resize(Rect::new(0, 0, 60, 20));
        assert_eq!(v.zoom_factor(), Some(1.0));
    }

    #[test]
    fn zoom_goes_to_left_page_of_spread() {
        let mut v = viewer(10, &spread_settings());
        v.open_last_page();
        settle(&mut v);
        assert_eq!(v.displayed_pages(), vec![Some(10), None]);
        assert!(v.zoom_in());
        assert!(v.zoom_factor().unwrap() > 1.0);

        let mut v = viewer(10, &Settings::default());
        v.coordinator.document_mut().close();
        assert!(!v.zoom_out());
    }

    #[test]
    fn reverse_gesture_without_left_page_is_refused() {
        let mut v = viewer(10, &spread_settings());
        v.open_page(2);
        settle(&mut v);
        assert_eq!(v.displayed_pages(), vec![Some(2), Some(3)]);

        assert!(!v.can_turn(NavigationDirection::Reverse));
        assert!(!v.turn(NavigationDirection::Reverse));
        assert!(!v.is_animating());
        assert_eq!(v.displayed_pages(), vec![Some(2), Some(3)]);
        assert_eq!(v.current_page(), 2);
        assert!(v.zoom_in());
    }

    #[test]
    fn reverse_gesture_in_spread_keeps_left_page_current() {
        let mut v = viewer(10, &spread_settings());
        v.open_page(5);
        settle(&mut v);

        assert!(v.can_turn(NavigationDirection::Reverse));
        assert!(v.turn(NavigationDirection::Reverse));
        settle(&mut v);
        assert_eq!(v.displayed_pages(), vec![Some(3), Some(4)]);
        assert_eq!(v.current_page(), 3);
        assert_eq!(v.label_text(), Some("3/10"));
    }

    #[test]
    fn resize_finishes_running_turn() {
        let mut v = viewer(10, &Settings::default());
        assert!(v.turn(NavigationDirection::Forward));
        assert!(v.is_animating());

        v.resize(Rect::new(0, 0, 60, 20));
        assert!(!v.is_animating());
        assert_eq!(v.current_page(), 2);
        assert_eq!(v.live_view_count(), 1);
        let frame = v.coordinator.view_frame();
        assert!(v.flipper.visible().iter().all(|view| view.frame() == frame));
    }

    #[test]
    fn slider_release_opens_page() {
        let mut v = viewer(10, &Settings::default());
        v.slider_nudge(3);
        assert_eq!(v.label_text(), Some("4/10"));
        assert_eq!(v.slider_value(), Some(1));
        assert!(v.slider_release());
        settle(&mut v);
        assert_eq!(v.current_page(), 4);
        assert_eq!(v.slider_value(), Some(4));
    }

    #[test]
    fn slider_release_on_current_page_resyncs_label() {
        let mut v = viewer(10, &Settings::default());
        v.slider_nudge(2);
        v.slider_nudge(-2);
        assert!(!v.slider_release());
        assert_eq!(v.label_text(), Some("1/10"));
    }

    #[test]
    fn slider_cancel_restores_label() {
        let mut v = viewer(10, &Settings::default());
        v.slider_nudge(5);
        v.slider_cancel();
        assert!(!v.is_slider_dragging());
        assert_eq!(v.label_text(), Some("1/10"));
    }

    #[test]
    fn hidden_bottom_bar_still_tracks_position() {
        let settings = Settings {
            bottombar_visible: false,
            ..Settings::default()
        };
        let mut v = viewer(10, &settings);
        v.open_page(6);
        settle(&mut v);
        assert_eq!(v.current_page(), 6);
        assert_eq!(v.label_text(), None);
        assert_eq!(v.slider_value(), None);
    }

    #[test]
    fn show_initial_page_requires_loaded_document() {
        let mut v = DocumentViewer::new(InMemoryDocument::default(), &Settings::default());
        assert!(matches!(
            v.show_initial_page(None),
            Err(DocumentError::NotLoaded)
        ));
    }

    #[test]
    fn load_reads_text_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\x0ctwo\x0cthree").unwrap();

        let mut v = DocumentViewer::new(InMemoryDocument::default(), &Settings::default());
        v.load(file.path()).unwrap();
        v.show_initial_page(None).unwrap();
        assert_eq!(v.page_count(), 3);
        assert_eq!(v.label_text(), Some("1/3"));
    }
}
