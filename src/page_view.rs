//! Page view widget
//!
//! A page view is bound to exactly one page, or to the empty sentinel that
//! fills the second half of a spread past the end of the document. Views
//! are created on demand by the coordinator and dropped as soon as they
//! leave the visible set.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::current_theme;
use crate::zoom::{ScrollDirection, Zoom};

/// What a page view shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageBinding {
    Page(u32),
    Empty,
}

#[derive(Debug, Clone)]
pub struct PageView {
    binding: PageBinding,
    frame: Rect,
    content: String,
    zoom: Zoom,
}

impl PageView {
    pub fn new(page: u32, frame: Rect, content: String) -> Self {
        let mut view = Self {
            binding: PageBinding::Page(page),
            frame,
            content,
            zoom: Zoom::default(),
        };
        view.update_minimum_maximum_zoom();
        view
    }

    /// The sentinel page shown opposite the last page of a spread
    pub fn empty(frame: Rect) -> Self {
        Self {
            binding: PageBinding::Empty,
            frame,
            content: String::new(),
            zoom: Zoom::default(),
        }
    }

    pub fn binding(&self) -> PageBinding {
        self.binding
    }

    /// Bound page number, `None` for the empty sentinel
    pub fn page_number(&self) -> Option<u32> {
        match self.binding {
            PageBinding::Page(n) => Some(n),
            PageBinding::Empty => None,
        }
    }

    pub fn is_empty_page(&self) -> bool {
        self.binding == PageBinding::Empty
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_increment(&mut self) {
        self.zoom.step_in();
    }

    pub fn zoom_decrement(&mut self) {
        self.zoom.step_out();
    }

    pub fn zoom_reset(&mut self) {
        self.zoom.reset();
    }

    pub fn update_minimum_maximum_zoom(&mut self) {
        self.zoom.update_bounds(self.frame);
    }

    pub fn pan(&mut self, direction: ScrollDirection) {
        self.zoom.pan(direction);
    }

    /// Page text wrapped to the zoomed layout width
    pub fn layout_lines(&self, inner_width: u16) -> Vec<String> {
        let width = self.zoom.layout_width(inner_width);
        self.content
            .lines()
            .flat_map(|line| {
                if line.trim().is_empty() {
                    vec![String::new()]
                } else {
                    textwrap::wrap(line, width)
                        .into_iter()
                        .map(|l| l.into_owned())
                        .collect()
                }
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let palette = current_theme();

        let title = match self.binding {
            PageBinding::Page(n) if (self.zoom.factor() - 1.0).abs() > f32::EPSILON => {
                format!(" {n} · {:.0}% ", self.zoom.factor() * 100.0)
            }
            PageBinding::Page(n) => format!(" {n} "),
            PageBinding::Empty => String::new(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_03))
            .style(Style::default().bg(palette.base_00))
            .title(Line::from(title).centered());
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.is_empty_page() || inner.width == 0 || inner.height == 0 {
            return;
        }

        // Zoomed out pages are narrower than the frame and centered in it.
        let layout_width = self.zoom.layout_width(inner.width);
        let text_area = if (layout_width as u16) < inner.width {
            let pad = (inner.width - layout_width as u16) / 2;
            Rect::new(inner.x + pad, inner.y, layout_width as u16, inner.height)
        } else {
            inner
        };

        let lines: Vec<Line> = self
            .layout_lines(inner.width)
            .into_iter()
            .map(Line::from)
            .collect();
        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(palette.base_05))
            .scroll((self.zoom.row_pan_from_top, self.zoom.cell_pan_from_left));
        f.render_widget(paragraph, text_area);
    }
}
