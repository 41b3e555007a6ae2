use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::current_theme;

/// Columns reserved for the page-number label
const LABEL_WIDTH: u16 = 11;

/// Label text for a position, e.g. "5/10"
pub fn page_label(page: u32, page_count: u32) -> String {
    format!("{page}/{page_count}")
}

/// Slider over [1, page_count].
///
/// While dragging, `preview` holds the value under the pointer; `value`
/// only changes through `set_value` when the position is synced.
#[derive(Debug, Clone)]
pub struct PageSlider {
    min: u32,
    max: u32,
    value: u32,
    preview: Option<u32>,
    area: Rect,
}

impl Default for PageSlider {
    fn default() -> Self {
        Self {
            min: 1,
            max: 1,
            value: 1,
            preview: None,
            area: Rect::default(),
        }
    }
}

impl PageSlider {
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn set_max(&mut self, max: u32) {
        self.max = max.max(self.min);
        self.value = self.value.clamp(self.min, self.max);
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn is_dragging(&self) -> bool {
        self.preview.is_some()
    }

    /// Value shown by the thumb: the drag preview if any
    pub fn displayed_value(&self) -> u32 {
        self.preview.unwrap_or(self.value)
    }

    /// Move the drag preview to `value`
    pub fn drag_to(&mut self, value: u32) {
        self.preview = Some(value.clamp(self.min, self.max));
    }

    /// Move the drag preview by `delta` steps
    pub fn nudge(&mut self, delta: i64) {
        let from = i64::from(self.displayed_value());
        let to = (from + delta).clamp(i64::from(self.min), i64::from(self.max));
        self.preview = Some(to as u32);
    }

    /// End the drag and return the chosen value
    pub fn release(&mut self) -> Option<u32> {
        self.preview.take()
    }

    pub fn cancel_drag(&mut self) {
        self.preview = None;
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }

    /// Slider value under a terminal column
    pub fn value_at(&self, column: u16) -> u32 {
        let span = self.max - self.min;
        if span == 0 || self.area.width <= 1 {
            return self.min;
        }
        let offset = column.saturating_sub(self.area.x).min(self.area.width - 1);
        let ratio = f64::from(offset) / f64::from(self.area.width - 1);
        self.min + (ratio * f64::from(span)).round() as u32
    }

    fn thumb_offset(&self, width: u16) -> u16 {
        let span = self.max - self.min;
        if span == 0 || width <= 1 {
            return 0;
        }
        let ratio = f64::from(self.displayed_value() - self.min) / f64::from(span);
        (ratio * f64::from(width - 1)).round() as u16
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.area = area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (track, thumb) = current_theme().slider_colors(self.is_dragging());
        let thumb_at = self.thumb_offset(area.width) as usize;
        let width = area.width as usize;

        let line = Line::from(vec![
            Span::styled("━".repeat(thumb_at), Style::default().fg(thumb)),
            Span::styled(
                "●",
                Style::default().fg(thumb).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "─".repeat(width.saturating_sub(thumb_at + 1)),
                Style::default().fg(track),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageNumberLabel {
    text: String,
}

impl PageNumberLabel {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let paragraph = Paragraph::new(Line::from(self.text.as_str()).centered()).style(
            Style::default()
                .fg(palette.base_07)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(paragraph, area);
    }
}

#[derive(Debug, Default)]
pub struct BottomBar {
    pub slider: PageSlider,
    pub label: Option<PageNumberLabel>,
}

impl BottomBar {
    pub fn new(with_label: bool) -> Self {
        Self {
            slider: PageSlider::default(),
            label: with_label.then(PageNumberLabel::default),
        }
    }

    /// Set slider and label from the authoritative position
    pub fn sync(&mut self, current: u32, page_count: u32) {
        self.slider.set_max(page_count);
        self.slider.cancel_drag();
        self.slider.set_value(current);
        if let Some(label) = self.label.as_mut() {
            label.set_text(page_label(current, page_count));
        }
    }

    /// While dragging, the label previews the slider value
    pub fn preview_changed(&mut self) {
        let page_count = self.slider.max();
        let preview = self.slider.displayed_value();
        if let Some(label) = self.label.as_mut() {
            label.set_text(page_label(preview, page_count));
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_03))
            .style(Style::default().bg(palette.base_01));
        let inner = block.inner(area);
        f.render_widget(block, area);

        match self.label.as_ref() {
            Some(label) if inner.width > LABEL_WIDTH + 4 => {
                let [slider_area, _, label_area] = Layout::horizontal([
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(LABEL_WIDTH),
                ])
                .areas(inner);
                label.render(f, label_area);
                self.slider.render(f, slider_area);
            }
            _ => self.slider.render(f, inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(max: u32, area: Rect) -> PageSlider {
        let mut slider = PageSlider::default();
        slider.set_max(max);
        slider.area = area;
        slider
    }

    #[test]
    fn sync_moves_slider_and_label_together() {
        let mut bar = BottomBar::new(true);
        bar.sync(5, 10);
        assert_eq!(bar.slider.value(), 5);
        assert_eq!(bar.slider.max(), 10);
        assert_eq!(bar.label.unwrap().text(), "5/10");
    }

    #[test]
    fn sync_drops_a_pending_drag() {
        let mut bar = BottomBar::new(true);
        bar.sync(1, 10);
        bar.slider.drag_to(8);
        bar.sync(3, 10);
        assert!(!bar.slider.is_dragging());
        assert_eq!(bar.slider.displayed_value(), 3);
    }

    #[test]
    fn drag_previews_label_but_not_value() {
        let mut bar = BottomBar::new(true);
        bar.sync(2, 10);
        bar.slider.drag_to(7);
        bar.preview_changed();
        assert_eq!(bar.slider.value(), 2);
        assert_eq!(bar.label.as_ref().unwrap().text(), "7/10");
        assert_eq!(bar.slider.release(), Some(7));
        assert!(!bar.slider.is_dragging());
    }

    #[test]
    fn nudge_clamps_to_range() {
        let mut s = slider(10, Rect::default());
        s.set_value(9);
        s.nudge(5);
        assert_eq!(s.displayed_value(), 10);
        s.nudge(-50);
        assert_eq!(s.displayed_value(), 1);
    }

    #[test]
    fn value_at_maps_columns_to_pages() {
        let s = slider(10, Rect::new(5, 0, 19, 1));
        assert_eq!(s.value_at(5), 1);
        assert_eq!(s.value_at(23), 10);
        assert_eq!(s.value_at(14), 6);
        assert_eq!(s.value_at(0), 1);
        assert_eq!(s.value_at(200), 10);
    }

    #[test]
    fn single_page_slider_is_fixed() {
        let s = slider(1, Rect::new(0, 0, 20, 1));
        assert_eq!(s.value_at(15), 1);
        assert_eq!(s.thumb_offset(20), 0);
    }
}
