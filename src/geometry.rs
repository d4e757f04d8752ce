//! Percent coordinate space of the field.
//!
//! Every position the snapping core stores is a percentage of the field
//! (`0.0..=100.0` on each axis). Pointer input arrives in device pixels
//! (terminal cells for the console host) and is converted through the live
//! field size on every step, so a terminal resize mid-gesture is respected
//! without invalidating anything.

use ratatui::layout::Rect;

/// Upper bound of the percent space on both axes.
pub const FIELD_EXTENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Lines of constant x (left/right/vertical-mid edges).
    Vertical,
    /// Lines of constant y (top/bottom/horizontal-mid edges).
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Total lexicographic order on `(x, y)`.
    pub fn lex_cmp(&self, other: &Point) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Box of a view area in percent units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AreaRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AreaRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Resolve to terminal cells inside `field`.
    ///
    /// Both corners are rounded independently so neighbouring areas that
    /// share an edge in percent space also share it on screen.
    pub fn to_cells(&self, field: Rect) -> Rect {
        let fw = field.width as f64;
        let fh = field.height as f64;
        let to_col = |pct: f64| ((pct.clamp(0.0, FIELD_EXTENT) / FIELD_EXTENT) * fw).round() as u16;
        let to_row = |pct: f64| ((pct.clamp(0.0, FIELD_EXTENT) / FIELD_EXTENT) * fh).round() as u16;
        let left = to_col(self.x);
        let right = to_col(self.right()).max(left);
        let top = to_row(self.y);
        let bottom = to_row(self.bottom()).max(top);
        Rect {
            x: field.x.saturating_add(left),
            y: field.y.saturating_add(top),
            width: right - left,
            height: bottom - top,
        }
    }
}

/// Pixel size of the field at the moment of asking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSize {
    pub width: f64,
    pub height: f64,
}

impl FieldSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.width,
            Axis::Horizontal => self.height,
        }
    }

    /// Convert a pixel distance along `axis` into percent units.
    ///
    /// A collapsed field (zero pixels) yields `0.0` rather than infinity so
    /// callers keep clamping instead of propagating NaN.
    pub fn px_to_percent(&self, axis: Axis, px: f64) -> f64 {
        let size = self.along(axis);
        if size <= 0.0 {
            return 0.0;
        }
        px / (size / FIELD_EXTENT)
    }
}

/// Source of the field's current pixel bounds.
///
/// Implementations are queried on every conversion; nothing is cached.
pub trait FieldBounds {
    fn field_size(&self) -> FieldSize;
}

impl FieldBounds for FieldSize {
    fn field_size(&self) -> FieldSize {
        *self
    }
}

impl FieldBounds for Rect {
    fn field_size(&self) -> FieldSize {
        FieldSize::new(self.width as f64, self.height as f64)
    }
}

impl<T: FieldBounds + ?Sized> FieldBounds for &T {
    fn field_size(&self) -> FieldSize {
        (**self).field_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_to_percent_scales_with_field() {
        let small = FieldSize::new(700.0, 350.0);
        let large = FieldSize::new(1400.0, 700.0);
        assert_eq!(small.px_to_percent(Axis::Vertical, 7.0), 1.0);
        assert_eq!(large.px_to_percent(Axis::Vertical, 7.0), 0.5);
        assert_eq!(large.px_to_percent(Axis::Horizontal, 7.0), 1.0);
    }

    #[test]
    fn collapsed_field_converts_to_zero() {
        let field = FieldSize::new(0.0, 10.0);
        assert_eq!(field.px_to_percent(Axis::Vertical, 12.0), 0.0);
    }

    #[test]
    fn lex_cmp_orders_x_then_y() {
        use std::cmp::Ordering;
        let a = Point::new(1.0, 5.0);
        let b = Point::new(1.0, 7.0);
        let c = Point::new(0.5, 9.0);
        assert_eq!(a.lex_cmp(&b), Ordering::Less);
        assert_eq!(c.lex_cmp(&a), Ordering::Less);
        assert_eq!(a.lex_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn to_cells_shares_edges_between_neighbours() {
        let field = Rect {
            x: 0,
            y: 1,
            width: 80,
            height: 24,
        };
        let left = AreaRect::new(10.0, 10.0, 23.3, 20.0).to_cells(field);
        let right = AreaRect::new(33.3, 10.0, 20.0, 20.0).to_cells(field);
        assert_eq!(left.x + left.width, right.x);
        assert_eq!(left.y, field.y + 2);
    }

    #[test]
    fn to_cells_clamps_outside_values() {
        let field = Rect {
            x: 0,
            y: 0,
            width: 50,
            height: 10,
        };
        let cells = AreaRect::new(-5.0, 90.0, 200.0, 50.0).to_cells(field);
        assert_eq!(cells.x, 0);
        assert_eq!(cells.width, 50);
        assert_eq!(cells.y + cells.height, 10);
    }
}
