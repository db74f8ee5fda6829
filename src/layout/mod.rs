//! Page geometry: placement rectangles for cards, charts and text bands.
//!
//! Everything here is pure. The assembler asks for slots, the renderers draw
//! into them; nothing in this module touches a surface.

pub mod text;
mod types;

pub use types::{Point, Rect};

use crate::config::LayoutConfig;

/// Splits `area` into `columns` equal-width slots separated by `gap`.
///
/// Slots run left to right and share the area's height. The last slot is
/// clamped so its right edge never passes `area.right()`.
pub fn grid_slots(area: Rect, columns: usize, gap: f32) -> Vec<Rect> {
    if columns == 0 {
        return Vec::new();
    }
    let gap = gap.max(0.0);
    let total_gap = gap * (columns - 1) as f32;
    let col_width = ((area.width - total_gap) / columns as f32).max(0.0);
    let mut slots = Vec::with_capacity(columns);
    for idx in 0..columns {
        let x = area.x + idx as f32 * (col_width + gap);
        let width = col_width.min((area.right() - x).max(0.0));
        slots.push(Rect::new(x, area.y, width, area.height));
    }
    slots
}

/// Row-major grid of equally sized cells inside one page band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayoutGrid {
    pub columns: usize,
    pub rows: usize,
    pub margin: f32,
    pub gap: f32,
}

impl PageLayoutGrid {
    pub fn new(columns: usize, rows: usize, gap: f32) -> Self {
        Self {
            columns,
            rows,
            margin: 0.0,
            gap,
        }
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Cells for `area`, top row first, each row left to right.
    pub fn cells(&self, area: Rect) -> Vec<Rect> {
        if self.rows == 0 || self.columns == 0 {
            return Vec::new();
        }
        let inner = area.inset_uniform(self.margin.max(0.0));
        let total_gap = self.gap * (self.rows - 1) as f32;
        let row_height = ((inner.height - total_gap) / self.rows as f32).max(0.0);
        let mut cells = Vec::with_capacity(self.rows * self.columns);
        for row in 0..self.rows {
            let y = inner.y + row as f32 * (row_height + self.gap);
            let band = Rect::new(inner.x, y, inner.width, row_height);
            cells.extend(grid_slots(band, self.columns, self.gap));
        }
        cells
    }
}

/// Content area of a page: the page rect minus the configured margins.
pub fn content_area(config: &LayoutConfig) -> Rect {
    Rect::new(0.0, 0.0, config.page_width, config.page_height).inset_uniform(config.margin)
}

/// Stacks full-width bands down a content area.
///
/// Requests that would run past the bottom margin are clamped to what is
/// left, so every band stays inside the page.
#[derive(Debug, Clone)]
pub struct LayoutFlow {
    area: Rect,
    cursor_y: f32,
    gap: f32,
}

impl LayoutFlow {
    pub fn new(area: Rect, gap: f32) -> Self {
        Self {
            area,
            cursor_y: area.y,
            gap,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn remaining(&self) -> f32 {
        (self.area.bottom() - self.cursor_y).max(0.0)
    }

    /// Takes the next band of `height`, followed by the flow gap.
    pub fn next(&mut self, height: f32) -> Rect {
        let available = self.remaining();
        let granted = if height > available {
            tracing::warn!(
                requested = height,
                available,
                "layout band clamped to the page margin"
            );
            available
        } else {
            height.max(0.0)
        };
        let band = Rect::new(self.area.x, self.cursor_y, self.area.width, granted);
        self.cursor_y = (self.cursor_y + granted + self.gap).min(self.area.bottom());
        band
    }

    /// Whatever is left of the area, consuming it.
    pub fn rest(&mut self) -> Rect {
        let height = self.remaining();
        self.next(height)
    }

    pub fn skip(&mut self, amount: f32) {
        self.cursor_y = (self.cursor_y + amount.max(0.0)).min(self.area.bottom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Rect {
        Rect::new(0.0, 0.0, 210.0, 297.0)
    }

    #[test]
    fn grid_slots_cover_width_for_one_to_six_columns() {
        let area = page().inset_uniform(14.0);
        for n in 1..=6 {
            let gap = 5.0;
            let slots = grid_slots(area, n, gap);
            assert_eq!(slots.len(), n);
            let widths: f32 = slots.iter().map(|s| s.width).sum();
            let combined = widths + gap * (n - 1) as f32;
            assert!((combined - area.width).abs() <= 1.0, "n={n}: {combined}");
            let last = slots.last().unwrap();
            assert!(last.right() <= area.right() + 1e-3);
            for pair in slots.windows(2) {
                assert!(!pair[0].overlaps(&pair[1]), "n={n}: slots overlap");
                assert!(pair[1].x > pair[0].x);
            }
        }
    }

    #[test]
    fn grid_slots_zero_columns_is_empty() {
        assert!(grid_slots(page(), 0, 4.0).is_empty());
    }

    #[test]
    fn grid_cells_are_row_major() {
        let grid = PageLayoutGrid::new(3, 2, 4.0);
        let cells = grid.cells(Rect::new(10.0, 10.0, 100.0, 50.0));
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0].y, cells[2].y);
        assert!(cells[3].y > cells[0].y);
        assert!(cells[1].x > cells[0].x);
        assert!((cells[5].bottom() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn grid_margin_insets_every_cell() {
        let area = Rect::new(10.0, 10.0, 100.0, 50.0);
        let cells = PageLayoutGrid::new(2, 2, 4.0).with_margin(5.0).cells(area);
        assert_eq!(cells[0].origin(), Point::new(15.0, 15.0));
        assert!((cells[3].right() - 105.0).abs() < 1e-3);
        assert!((cells[3].bottom() - 55.0).abs() < 1e-3);
    }

    #[test]
    fn flow_clamps_to_bottom_margin() {
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut flow = LayoutFlow::new(area, 5.0);
        let first = flow.next(30.0);
        assert_eq!(first.height, 30.0);
        let second = flow.next(30.0);
        assert_eq!(second.y, 35.0);
        assert_eq!(second.height, 15.0);
        assert!(area.contains_rect(&second, 1e-3));
        assert_eq!(flow.remaining(), 0.0);
    }
}
