//! Zoom and pan state for a page view
//!
//! Each page view owns one `Zoom`. The viewer never stores zoom itself, it
//! only forwards zoom requests to the page that is currently on screen.

use ratatui::layout::Rect;

/// Pan direction for a zoomed page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    /// Returns true if the direction is vertical (Up or Down)
    pub fn vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Zoom and pan state for one page
#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    /// Current zoom factor (1.0 = page fits the frame width)
    pub factor: f32,

    /// Smallest factor allowed for the current frame
    pub min_factor: f32,

    /// Largest factor allowed for the current frame
    pub max_factor: f32,

    /// Horizontal pan offset in terminal cells from left edge
    pub cell_pan_from_left: u16,

    /// Vertical pan offset in text rows from the top of the page
    pub row_pan_from_top: u16,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: 1.0,
            min_factor: Self::MIN_SCALE,
            max_factor: Self::MAX_SCALE,
            cell_pan_from_left: 0,
            row_pan_from_top: 0,
        }
    }
}

impl Zoom {
    /// Zoom in rate multiplier per step - 10%
    pub const ZOOM_IN_RATE: f32 = 1.1;
    /// Zoom out rate divisor per step - 5%
    pub const ZOOM_OUT_RATE: f32 = 1.05;
    /// Absolute floor for the zoom factor
    pub const MIN_SCALE: f32 = 0.1;
    /// Absolute ceiling for the zoom factor
    pub const MAX_SCALE: f32 = 4.0;
    /// Narrowest text column a zoomed-out page may shrink to
    pub const MIN_COLUMNS: f32 = 16.0;

    /// Base pan step in cells for horizontal movement
    pub const BASE_PAN_STEP_X: f32 = 4.0;
    /// Base pan step in rows for vertical movement
    pub const BASE_PAN_STEP_Y: f32 = 2.0;

    /// Returns the current zoom factor
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Zoom in by one step
    pub fn step_in(&mut self) {
        self.factor = self.clamp_factor(self.factor * Self::ZOOM_IN_RATE);
    }

    /// Zoom out by one step
    pub fn step_out(&mut self) {
        self.factor = self.clamp_factor(self.factor / Self::ZOOM_OUT_RATE);
        if self.factor <= 1.0 {
            self.cell_pan_from_left = 0;
        }
    }

    /// Back to fit-width with no panning
    pub fn reset(&mut self) {
        self.factor = self.clamp_factor(1.0);
        self.cell_pan_from_left = 0;
        self.row_pan_from_top = 0;
    }

    /// Recompute the allowed zoom range for a page frame
    pub fn update_bounds(&mut self, frame: Rect) {
        let width = f32::from(frame.width.max(1));
        self.min_factor = (Self::MIN_COLUMNS / width).clamp(Self::MIN_SCALE, 1.0);
        self.max_factor = Self::MAX_SCALE;
        self.factor = self.clamp_factor(self.factor);
    }

    /// Pan in the given direction, adjusting step size by zoom factor
    pub fn pan(&mut self, direction: ScrollDirection) {
        let base_step = if direction.vertical() {
            Self::BASE_PAN_STEP_Y
        } else {
            Self::BASE_PAN_STEP_X
        };
        let step = (base_step * self.factor()).max(1.0) as u16;

        match direction {
            ScrollDirection::Up => {
                self.row_pan_from_top = self.row_pan_from_top.saturating_sub(step);
            }
            ScrollDirection::Down => {
                self.row_pan_from_top = self.row_pan_from_top.saturating_add(step);
            }
            ScrollDirection::Left => {
                self.cell_pan_from_left = self.cell_pan_from_left.saturating_sub(step);
            }
            ScrollDirection::Right => {
                self.cell_pan_from_left = self.cell_pan_from_left.saturating_add(step);
            }
        }
    }

    /// Width of the laid-out text for a frame of `frame_width` cells
    pub fn layout_width(&self, frame_width: u16) -> usize {
        ((f32::from(frame_width) * self.factor).round() as usize).max(1)
    }

    /// Clamp factor to the allowed range, handling NaN/Inf
    fn clamp_factor(&self, factor: f32) -> f32 {
        if !factor.is_finite() {
            1.0_f32.clamp(self.min_factor, self.max_factor)
        } else {
            factor.clamp(self.min_factor, self.max_factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_in_and_out_change_factor() {
        let mut zoom = Zoom::default();
        zoom.step_in();
        assert!((zoom.factor() - 1.1).abs() < 1e-6);
        zoom.step_out();
        assert!(zoom.factor() < 1.1);
    }

    #[test]
    fn factor_never_exceeds_bounds() {
        let mut zoom = Zoom::default();
        zoom.update_bounds(Rect::new(0, 0, 80, 20));
        for _ in 0..100 {
            zoom.step_in();
        }
        assert_eq!(zoom.factor(), Zoom::MAX_SCALE);
        for _ in 0..500 {
            zoom.step_out();
        }
        assert!((zoom.factor() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_pan() {
        let mut zoom = Zoom::default();
        zoom.step_in();
        zoom.pan(ScrollDirection::Right);
        zoom.pan(ScrollDirection::Down);
        zoom.reset();
        assert_eq!(zoom, Zoom::default());
    }

    #[test]
    fn pan_saturates_at_origin() {
        let mut zoom = Zoom::default();
        zoom.pan(ScrollDirection::Up);
        zoom.pan(ScrollDirection::Left);
        assert_eq!(zoom.row_pan_from_top, 0);
        assert_eq!(zoom.cell_pan_from_left, 0);
    }

    #[test]
    fn layout_width_follows_factor() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.layout_width(40), 40);
        zoom.factor = 2.0;
        assert_eq!(zoom.layout_width(40), 80);
    }
}
