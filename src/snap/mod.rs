//! Magnetic alignment: the edge registry and the rails drawn for snaps.

pub mod edges;
pub mod rails;

pub use edges::{Edge, EdgeHandle, EdgePoints, EdgeRegistry};
pub use rails::{Rail, RailSet, farthest_pair, rail_for_snap};

use crate::constants::FIELD_EDGE_POSITIONS;
use crate::geometry::{AreaRect, Axis, FIELD_EXTENT, Point};

/// One side of an area box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Axis of the edges this side can snap onto.
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Vertical,
            Side::Top | Side::Bottom => Axis::Horizontal,
        }
    }

    /// The two corners lying on this side.
    pub fn corners(self, rect: &AreaRect) -> (Point, Point) {
        match self {
            Side::Left => (rect.top_left(), rect.bottom_left()),
            Side::Right => (rect.top_right(), rect.bottom_right()),
            Side::Top => (rect.top_left(), rect.top_right()),
            Side::Bottom => (rect.bottom_left(), rect.bottom_right()),
        }
    }
}

/// Register the field's own start/centre/end edges on both axes.
///
/// These are never deleted.
pub fn register_field_edges(registry: &mut EdgeRegistry) -> Vec<EdgeHandle> {
    let mut handles = Vec::with_capacity(FIELD_EDGE_POSITIONS.len() * 2);
    for pos in FIELD_EDGE_POSITIONS {
        handles.push(registry.add_edge(
            Axis::Vertical,
            pos,
            EdgePoints::Segment(Point::new(pos, 0.0), Point::new(pos, FIELD_EXTENT)),
            true,
        ));
    }
    for pos in FIELD_EDGE_POSITIONS {
        handles.push(registry.add_edge(
            Axis::Horizontal,
            pos,
            EdgePoints::Segment(Point::new(0.0, pos), Point::new(FIELD_EXTENT, pos)),
            true,
        ));
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_edges_cover_both_axes() {
        let mut reg = EdgeRegistry::default();
        let handles = register_field_edges(&mut reg);
        assert_eq!(handles.len(), 6);
        assert_eq!(reg.len(Axis::Vertical), 3);
        assert_eq!(reg.len(Axis::Horizontal), 3);
        assert!(reg.iter(Axis::Vertical).all(|e| e.overall));
        let positions: Vec<f64> = reg.iter(Axis::Horizontal).map(|e| e.position).collect();
        assert_eq!(positions, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn side_geometry() {
        let rect = AreaRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            Side::Right.corners(&rect),
            (Point::new(40.0, 20.0), Point::new(40.0, 60.0))
        );
        assert_eq!(
            Side::Top.corners(&rect),
            (Point::new(10.0, 20.0), Point::new(40.0, 20.0))
        );
        assert_eq!(Side::Left.axis(), Axis::Vertical);
    }
}
