use std::cmp::Ordering;

use super::Side;
use super::edges::Edge;
use crate::geometry::{AreaRect, Axis, FIELD_EXTENT, Point};

/// Guide segment shown while a side is snapped, in percent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rail {
    pub start: Point,
    pub end: Point,
}

impl Rail {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }
}

/// The two mutually farthest points of `points`, ordered lexicographically.
///
/// Among equally distant pairs the lexicographically smallest one wins, which
/// makes the answer independent of input order. A single point pairs with
/// itself.
pub fn farthest_pair(points: &[Point]) -> Option<(Point, Point)> {
    match points {
        [] => return None,
        [only] => return Some((*only, *only)),
        _ => {}
    }
    let mut best: Option<(Point, Point, f64)> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let (first, second) = order_points(*a, *b);
            let dist = first.distance_sq(second);
            let better = match best {
                None => true,
                Some((bf, bs, bd)) => match dist.total_cmp(&bd) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => {
                        first
                            .lex_cmp(&bf)
                            .then_with(|| second.lex_cmp(&bs))
                            == Ordering::Less
                    }
                },
            };
            if better {
                best = Some((first, second, dist));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

fn order_points(a: Point, b: Point) -> (Point, Point) {
    if b.lex_cmp(&a) == Ordering::Less {
        (b, a)
    } else {
        (a, b)
    }
}

/// Rail to draw when `side` of `rect` is snapped onto `edge`.
///
/// Field edges produce a rail across the whole field. Other edges produce the
/// segment spanning both the edge's own points and the snapped side, so the
/// guide covers everything aligned on that line.
pub fn rail_for_snap(edge: &Edge, side: Side, rect: &AreaRect) -> Rail {
    if edge.overall {
        return match side.axis() {
            Axis::Vertical => Rail::from_coords(edge.position, 0.0, edge.position, FIELD_EXTENT),
            Axis::Horizontal => Rail::from_coords(0.0, edge.position, FIELD_EXTENT, edge.position),
        };
    }
    let (c1, c2) = side.corners(rect);
    let mut candidates: Vec<Point> = edge.points.iter().collect();
    candidates.push(c1);
    candidates.push(c2);
    match farthest_pair(&candidates) {
        Some((start, end)) => Rail::new(start, end),
        None => Rail::new(c1, c2),
    }
}

/// The process-wide pair of rails, at most one per axis.
///
/// Callers bracket every gesture step with [`RailSet::begin_step`] and
/// [`RailSet::finish_step`]; an axis not shown in between is hidden by
/// `finish_step`, so a rail never outlives its match by a step.
#[derive(Debug, Clone, Default)]
pub struct RailSet {
    vertical: Option<Rail>,
    horizontal: Option<Rail>,
    vertical_set: bool,
    horizontal_set: bool,
}

impl RailSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertical(&self) -> Option<Rail> {
        self.vertical
    }

    pub fn horizontal(&self) -> Option<Rail> {
        self.horizontal
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    pub fn show_vertical(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.show(Axis::Vertical, Rail::from_coords(x1, y1, x2, y2));
    }

    pub fn show_horizontal(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.show(Axis::Horizontal, Rail::from_coords(x1, y1, x2, y2));
    }

    /// Create the axis' rail or move the existing one.
    pub fn show(&mut self, axis: Axis, rail: Rail) {
        let (slot, fresh) = match axis {
            Axis::Vertical => (&mut self.vertical, &mut self.vertical_set),
            Axis::Horizontal => (&mut self.horizontal, &mut self.horizontal_set),
        };
        if slot.is_none() {
            tracing::trace!(?axis, ?rail, "rail shown");
        }
        *slot = Some(rail);
        *fresh = true;
    }

    /// Returns whether a rail was actually removed.
    pub fn hide_vertical(&mut self) -> bool {
        self.vertical.take().is_some()
    }

    pub fn hide_horizontal(&mut self) -> bool {
        self.horizontal.take().is_some()
    }

    pub fn hide_all(&mut self) {
        self.hide_vertical();
        self.hide_horizontal();
    }

    pub fn begin_step(&mut self) {
        self.vertical_set = false;
        self.horizontal_set = false;
    }

    pub fn finish_step(&mut self) {
        if !self.vertical_set {
            self.hide_vertical();
        }
        if !self.horizontal_set {
            self.hide_horizontal();
        }
    }

    pub fn show_for_snap(&mut self, edge: &Edge, side: Side, rect: &AreaRect) {
        self.show(side.axis(), rail_for_snap(edge, side, rect));
    }
}
