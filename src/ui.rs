//! UiFrame: a thin wrapper around `ratatui::Frame` that clips drawing to the
//! visible area.
//!
//! Desktop boxes live in signed layout coordinates and windows may hang off
//! any edge of the terminal. Every draw call goes through [`UiFrame`], which
//! converts layout boxes to cells and drops whatever falls outside the
//! buffer, so widgets never write out of bounds.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::geometry::Rect;

pub struct UiFrame<'a> {
    area: CellRect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    pub(crate) fn from_parts(area: CellRect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> CellRect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    /// Visible part of a layout box, in cells.
    pub fn clip(&self, rect: Rect) -> Option<CellRect> {
        let left = rect.x.max(self.area.x as i32);
        let top = rect.y.max(self.area.y as i32);
        let right = rect.right().min(self.area.right() as i32);
        let bottom = rect.bottom().min(self.area.bottom() as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(CellRect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }

    pub fn render_widget<W>(&mut self, widget: W, rect: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip(rect) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Write a single line starting at a layout point, truncated to the
    /// visible area and to `max_width` cells.
    pub fn set_line(&mut self, x: i32, y: i32, text: &str, max_width: i32, style: Style) {
        if max_width <= 0 {
            return;
        }
        let skip = (self.area.x as i32 - x).max(0);
        let Some(cells) = self.clip(Rect::new(x + skip, y, max_width - skip, 1)) else {
            return;
        };
        let visible: String = text
            .chars()
            .skip(skip as usize)
            .take(cells.width as usize)
            .collect();
        self.buffer
            .set_stringn(cells.x, cells.y, visible, cells.width as usize, style);
    }

    pub fn set_style(&mut self, rect: Rect, style: Style) {
        if let Some(clipped) = self.clip(rect) {
            self.buffer.set_style(clipped, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Clear;

    #[test]
    fn clip_drops_offscreen_boxes() {
        let area = CellRect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        let frame = UiFrame::from_parts(area, &mut buffer);
        assert_eq!(frame.clip(Rect::new(-20, 0, 5, 5)), None);
        assert_eq!(
            frame.clip(Rect::new(-2, -1, 5, 3)),
            Some(CellRect::new(0, 0, 3, 2))
        );
        assert_eq!(
            frame.clip(Rect::new(8, 4, 10, 10)),
            Some(CellRect::new(8, 4, 2, 1))
        );
    }

    #[test]
    fn set_line_skips_hidden_prefix() {
        let area = CellRect::new(0, 0, 6, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        frame.set_line(-2, 0, "abcdefghij", 10, Style::default());
        assert_eq!(buffer[(0, 0)].symbol(), "c");
        assert_eq!(buffer[(5, 0)].symbol(), "h");
    }

    #[test]
    fn render_widget_outside_area_is_ignored() {
        let area = CellRect::new(0, 0, 4, 4);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        frame.set_line(0, 0, "xx", 2, Style::default());
        frame.render_widget(Clear, Rect::new(10, 10, 3, 3));
        frame.render_widget(Clear, Rect::new(-1, -1, 2, 2));
        assert_eq!(buffer[(0, 0)].symbol(), " ");
        assert_eq!(buffer[(1, 0)].symbol(), "x");
    }
}
