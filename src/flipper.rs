//! Paging widget
//!
//! `PageFlipper` holds the page views that are on screen and animates the
//! transition between two sets of views. It knows nothing about documents:
//! neighbors are requested from a `PageTurnDelegate`, and the delegate is
//! told when a transition has finished.

use log::debug;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear},
};
use serde::{Deserialize, Serialize};

use crate::page_view::PageView;
use crate::theme::current_theme;

/// Upper bound on page views alive at once: two visible pages of a spread
/// plus the page being turned away.
pub const MAX_PAGE_VIEWS: usize = 3;

/// Animation frames per page turn
pub const TURN_FRAMES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Reverse,
}

/// Where the spine sits: `Min` shows one page, `Mid` a two-page spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineLocation {
    #[default]
    Min,
    Mid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    #[default]
    PageCurl,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Supplies neighbor pages to the flipper and learns about finished turns.
pub trait PageTurnDelegate {
    fn previous_of(&self, reference: &PageView) -> Option<PageView>;

    fn next_of(&self, reference: &PageView) -> Option<PageView>;

    /// Recreate a view that was turned away; `None` is the empty sentinel
    fn restore_view(&self, page: Option<u32>) -> PageView;

    /// `completed` is false when the transition was abandoned and the
    /// previous views are back on screen.
    fn on_transition_complete(&mut self, completed: bool, visible: &[PageView]);
}

#[derive(Debug)]
struct Transition {
    outgoing: Option<PageView>,
    restore: Vec<Option<u32>>,
    direction: NavigationDirection,
    frame: u8,
}

#[derive(Debug)]
pub struct PageFlipper {
    style: TransitionStyle,
    orientation: NavigationOrientation,
    spine: SpineLocation,
    visible: Vec<PageView>,
    transition: Option<Transition>,
}

impl PageFlipper {
    pub fn new(
        style: TransitionStyle,
        orientation: NavigationOrientation,
        spine: SpineLocation,
    ) -> Self {
        Self {
            style,
            orientation,
            spine,
            visible: Vec::new(),
            transition: None,
        }
    }

    pub fn spine(&self) -> SpineLocation {
        self.spine
    }

    pub fn visible(&self) -> &[PageView] {
        &self.visible
    }

    pub fn visible_mut(&mut self) -> &mut [PageView] {
        &mut self.visible
    }

    /// First visible view: the only page, or the left page of a spread
    pub fn current(&self) -> Option<&PageView> {
        self.visible.first()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Page views currently alive, including the one being turned away
    pub fn live_view_count(&self) -> usize {
        self.visible.len()
            + self
                .transition
                .as_ref()
                .map_or(0, |t| usize::from(t.outgoing.is_some()))
    }

    /// Replace the visible views.
    ///
    /// Unanimated requests complete immediately. Animated requests put the
    /// new views on screen at once and complete when `advance` finishes the
    /// animation. A transition still in flight is finished first.
    pub fn set_views<D: PageTurnDelegate + ?Sized>(
        &mut self,
        views: Vec<PageView>,
        direction: NavigationDirection,
        animated: bool,
        delegate: &mut D,
    ) {
        if views.is_empty() {
            debug!("Ignoring transition to an empty view set");
            return;
        }
        if self.transition.is_some() {
            self.finish(delegate);
        }

        let previous = std::mem::replace(&mut self.visible, views);
        if animated && !previous.is_empty() {
            let restore = previous.iter().map(PageView::page_number).collect();
            let outgoing = match direction {
                NavigationDirection::Forward => previous.into_iter().last(),
                NavigationDirection::Reverse => previous.into_iter().next(),
            };
            self.transition = Some(Transition {
                outgoing,
                restore,
                direction,
                frame: 0,
            });
        } else {
            delegate.on_transition_complete(true, &self.visible);
        }
        debug_assert!(self.live_view_count() <= MAX_PAGE_VIEWS);
    }

    /// Gesture turn towards `direction`; false when there is nothing to
    /// turn to or a transition is already running.
    pub fn turn<D: PageTurnDelegate + ?Sized>(
        &mut self,
        direction: NavigationDirection,
        delegate: &mut D,
    ) -> bool {
        if self.transition.is_some() {
            return false;
        }

        let views = match direction {
            NavigationDirection::Forward => {
                let Some(reference) = self.visible.last() else {
                    return false;
                };
                let Some(first) = delegate.next_of(reference) else {
                    return false;
                };
                if first.is_empty_page() {
                    return false;
                }
                match self.spine {
                    SpineLocation::Min => vec![first],
                    SpineLocation::Mid => {
                        let second = delegate
                            .next_of(&first)
                            .unwrap_or_else(|| PageView::empty(first.frame()));
                        vec![first, second]
                    }
                }
            }
            NavigationDirection::Reverse => {
                let Some(reference) = self.visible.first() else {
                    return false;
                };
                let Some(right) = delegate.previous_of(reference) else {
                    return false;
                };
                match self.spine {
                    SpineLocation::Min => vec![right],
                    SpineLocation::Mid => {
                        // The sentinel only ever sits on the right
                        let Some(left) = delegate.previous_of(&right) else {
                            return false;
                        };
                        vec![left, right]
                    }
                }
            }
        };

        self.set_views(views, direction, true, delegate);
        true
    }

    /// Advance the running animation by one frame. Returns true while
    /// something changed on screen.
    pub fn advance<D: PageTurnDelegate + ?Sized>(&mut self, delegate: &mut D) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.frame = transition.frame.saturating_add(1);
        if transition.frame >= TURN_FRAMES {
            self.finish(delegate);
        }
        true
    }

    /// Run the current animation to its end
    pub fn finish<D: PageTurnDelegate + ?Sized>(&mut self, delegate: &mut D) {
        if self.transition.take().is_some() {
            delegate.on_transition_complete(true, &self.visible);
        }
    }

    /// Cancel the running animation and put the outgoing views back
    pub fn abandon<D: PageTurnDelegate + ?Sized>(&mut self, delegate: &mut D) -> bool {
        let Some(transition) = self.transition.take() else {
            return false;
        };
        let outgoing_page = transition.outgoing.as_ref().map(PageView::page_number);
        let mut outgoing = transition.outgoing;
        self.visible = transition
            .restore
            .into_iter()
            .map(|page| match (outgoing.take(), outgoing_page) {
                (Some(view), Some(p)) if p == page => view,
                (view, _) => {
                    outgoing = view;
                    delegate.restore_view(page)
                }
            })
            .collect();
        delegate.on_transition_complete(false, &self.visible);
        true
    }

    /// Fraction of the running animation that has played
    pub fn progress(&self) -> Option<f32> {
        self.transition
            .as_ref()
            .map(|t| f32::from(t.frame) / f32::from(TURN_FRAMES))
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        match &self.transition {
            None => self.render_spread(f, area, &self.visible),
            Some(transition) => self.render_transition(f, area, transition),
        }
    }

    fn render_spread(&self, f: &mut Frame, area: Rect, views: &[PageView]) {
        match views {
            [] => {}
            [single] => single.render(f, area),
            [left, right, ..] => {
                let [left_area, right_area] =
                    Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                        .areas(area);
                left.render(f, left_area);
                right.render(f, right_area);
            }
        }
    }

    /// The incoming spread wipes over the outgoing page along the
    /// navigation axis.
    fn render_transition(&self, f: &mut Frame, area: Rect, transition: &Transition) {
        let progress = self.progress().unwrap_or(1.0);
        let (extent, along_x) = match self.orientation {
            NavigationOrientation::Horizontal => (area.width, true),
            NavigationOrientation::Vertical => (area.height, false),
        };
        let revealed = ((f32::from(extent) * progress).round() as u16).min(extent);
        let hidden = extent - revealed;

        if let Some(outgoing) = &transition.outgoing {
            outgoing.render(f, area);
        }
        if revealed == 0 {
            return;
        }

        let forward = transition.direction == NavigationDirection::Forward;
        let incoming_area = match (along_x, forward) {
            (true, true) => Rect::new(area.x + hidden, area.y, revealed, area.height),
            (true, false) => Rect::new(area.x, area.y, revealed, area.height),
            (false, true) => Rect::new(area.x, area.y + hidden, area.width, revealed),
            (false, false) => Rect::new(area.x, area.y, area.width, revealed),
        };
        f.render_widget(Clear, incoming_area);
        self.render_spread(f, incoming_area, &self.visible);

        if self.style == TransitionStyle::PageCurl && hidden > 0 {
            let borders = match (along_x, forward) {
                (true, true) => Borders::LEFT,
                (true, false) => Borders::RIGHT,
                (false, true) => Borders::TOP,
                (false, false) => Borders::BOTTOM,
            };
            let fold = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(current_theme().base_07));
            f.render_widget(fold, incoming_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pages, tracks completions
    #[derive(Default)]
    struct Recorder {
        page_count: u32,
        spine: SpineLocation,
        completions: Vec<(bool, Vec<Option<u32>>)>,
    }

    impl Recorder {
        fn new(page_count: u32, spine: SpineLocation) -> Self {
            Self {
                page_count,
                spine,
                completions: Vec::new(),
            }
        }

        fn view(&self, page: u32) -> Option<PageView> {
            (1..=self.page_count)
                .contains(&page)
                .then(|| PageView::new(page, Rect::new(0, 0, 20, 10), String::new()))
        }
    }

    impl PageTurnDelegate for Recorder {
        fn previous_of(&self, reference: &PageView) -> Option<PageView> {
            self.view(reference.page_number()?.checked_sub(1)?)
        }

        fn next_of(&self, reference: &PageView) -> Option<PageView> {
            let page = reference.page_number()?;
            if page == self.page_count {
                return (self.spine == SpineLocation::Mid)
                    .then(|| PageView::empty(reference.frame()));
            }
            self.view(page + 1)
        }

        fn restore_view(&self, page: Option<u32>) -> PageView {
            match page {
                Some(p) => PageView::new(p, Rect::default(), String::new()),
                None => PageView::empty(Rect::default()),
            }
        }

        fn on_transition_complete(&mut self, completed: bool, visible: &[PageView]) {
            self.completions
                .push((completed, visible.iter().map(PageView::page_number).collect()));
        }
    }

    fn flipper(spine: SpineLocation) -> PageFlipper {
        PageFlipper::new(
            TransitionStyle::PageCurl,
            NavigationOrientation::Horizontal,
            spine,
        )
    }

    fn pages(flipper: &PageFlipper) -> Vec<Option<u32>> {
        flipper.visible().iter().map(PageView::page_number).collect()
    }

    #[test]
    fn unanimated_set_completes_immediately() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let view = delegate.view(1).unwrap();

        flipper.set_views(vec![view], NavigationDirection::Forward, false, &mut delegate);

        assert!(!flipper.is_animating());
        assert_eq!(delegate.completions, vec![(true, vec![Some(1)])]);
    }

    #[test]
    fn animated_set_completes_after_frames() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let first = delegate.view(1).unwrap();
        flipper.set_views(vec![first], NavigationDirection::Forward, false, &mut delegate);
        delegate.completions.clear();

        let target = delegate.view(5).unwrap();
        flipper.set_views(vec![target], NavigationDirection::Forward, true, &mut delegate);

        // Target is on screen before completion
        assert_eq!(pages(&flipper), vec![Some(5)]);
        assert!(flipper.is_animating());
        assert!(delegate.completions.is_empty());

        for _ in 0..TURN_FRAMES {
            flipper.advance(&mut delegate);
        }
        assert!(!flipper.is_animating());
        assert_eq!(delegate.completions, vec![(true, vec![Some(5)])]);
    }

    #[test]
    fn new_request_finishes_the_running_one() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let first = delegate.view(1).unwrap();
        flipper.set_views(vec![first], NavigationDirection::Forward, false, &mut delegate);
        delegate.completions.clear();

        let two = delegate.view(2).unwrap();
        let three = delegate.view(3).unwrap();
        flipper.set_views(vec![two], NavigationDirection::Forward, true, &mut delegate);
        flipper.set_views(vec![three], NavigationDirection::Forward, true, &mut delegate);

        assert_eq!(delegate.completions, vec![(true, vec![Some(2)])]);
        assert_eq!(pages(&flipper), vec![Some(3)]);
    }

    #[test]
    fn turn_stops_at_document_end() {
        let mut delegate = Recorder::new(3, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let last = delegate.view(3).unwrap();
        flipper.set_views(vec![last], NavigationDirection::Forward, false, &mut delegate);

        assert!(!flipper.turn(NavigationDirection::Forward, &mut delegate));
        assert!(flipper.turn(NavigationDirection::Reverse, &mut delegate));
        assert_eq!(pages(&flipper), vec![Some(2)]);
    }

    #[test]
    fn turn_is_ignored_while_animating() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let first = delegate.view(1).unwrap();
        flipper.set_views(vec![first], NavigationDirection::Forward, false, &mut delegate);

        assert!(flipper.turn(NavigationDirection::Forward, &mut delegate));
        assert!(!flipper.turn(NavigationDirection::Forward, &mut delegate));
        assert_eq!(pages(&flipper), vec![Some(2)]);
    }

    #[test]
    fn spread_turn_past_the_end_pads_with_sentinel() {
        let mut delegate = Recorder::new(10, SpineLocation::Mid);
        let mut flipper = flipper(SpineLocation::Mid);
        let views = vec![delegate.view(8).unwrap(), delegate.view(9).unwrap()];
        flipper.set_views(views, NavigationDirection::Forward, false, &mut delegate);

        assert!(flipper.turn(NavigationDirection::Forward, &mut delegate));
        assert_eq!(pages(&flipper), vec![Some(10), None]);
        assert!(flipper.live_view_count() <= MAX_PAGE_VIEWS);

        flipper.finish(&mut delegate);
        // Nothing but the sentinel follows
        assert!(!flipper.turn(NavigationDirection::Forward, &mut delegate));
    }

    #[test]
    fn spread_turn_back_needs_a_full_spread() {
        let mut delegate = Recorder::new(10, SpineLocation::Mid);
        let mut flipper = flipper(SpineLocation::Mid);
        let views = vec![delegate.view(2).unwrap(), delegate.view(3).unwrap()];
        flipper.set_views(views, NavigationDirection::Forward, false, &mut delegate);
        delegate.completions.clear();

        // Only page 1 lies behind, so there is no left page to turn to
        assert!(!flipper.turn(NavigationDirection::Reverse, &mut delegate));
        assert!(!flipper.is_animating());
        assert_eq!(pages(&flipper), vec![Some(2), Some(3)]);
        assert!(delegate.completions.is_empty());
    }

    #[test]
    fn spread_turn_back_shows_previous_pair() {
        let mut delegate = Recorder::new(10, SpineLocation::Mid);
        let mut flipper = flipper(SpineLocation::Mid);
        let views = vec![delegate.view(5).unwrap(), delegate.view(6).unwrap()];
        flipper.set_views(views, NavigationDirection::Forward, false, &mut delegate);

        assert!(flipper.turn(NavigationDirection::Reverse, &mut delegate));
        assert_eq!(pages(&flipper), vec![Some(3), Some(4)]);
    }

    #[test]
    fn abandon_restores_previous_views() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        let first = delegate.view(4).unwrap();
        flipper.set_views(vec![first], NavigationDirection::Forward, false, &mut delegate);
        delegate.completions.clear();

        flipper.turn(NavigationDirection::Forward, &mut delegate);
        let abandoned = flipper.abandon(&mut delegate);

        assert!(abandoned);
        assert_eq!(pages(&flipper), vec![Some(4)]);
        assert_eq!(delegate.completions, vec![(false, vec![Some(4)])]);
    }

    #[test]
    fn progress_tracks_frames() {
        let mut delegate = Recorder::new(10, SpineLocation::Min);
        let mut flipper = flipper(SpineLocation::Min);
        assert_eq!(flipper.progress(), None);
        let first = delegate.view(1).unwrap();
        flipper.set_views(vec![first], NavigationDirection::Forward, false, &mut delegate);
        flipper.turn(NavigationDirection::Forward, &mut delegate);
        flipper.advance(&mut delegate);
        let progress = flipper.progress().unwrap();
        assert!((progress - 1.0 / f32::from(TURN_FRAMES)).abs() < 1e-6);
    }
}
