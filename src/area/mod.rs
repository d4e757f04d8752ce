//! View areas: their six registered edges, resize handles, and the gesture
//! controller that keeps both in sync while the user drags or resizes.

pub mod controller;
pub mod handles;

pub use controller::{AreaController, AreaLimits, GestureKind, SnapContext, StepOutcome};
pub use handles::{Hit, ResizeEdge, ResizeHandle, hit_test, resize_handles_for_region};

use crate::error::EdgeError;
use crate::geometry::{AreaRect, Axis, Point};
use crate::snap::{EdgeHandle, EdgePoints, EdgeRegistry};

pub type AreaId = usize;

/// Handles of the six alignment lines every area contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaEdges {
    pub left: EdgeHandle,
    pub right: EdgeHandle,
    pub vertical_mid: EdgeHandle,
    pub top: EdgeHandle,
    pub bottom: EdgeHandle,
    pub horizontal_mid: EdgeHandle,
}

struct EdgeLayout {
    axis: Axis,
    position: f64,
    points: EdgePoints,
}

fn edge_layout(rect: &AreaRect) -> [EdgeLayout; 6] {
    let center = rect.center();
    [
        EdgeLayout {
            axis: Axis::Vertical,
            position: rect.x,
            points: EdgePoints::Segment(rect.top_left(), rect.bottom_left()),
        },
        EdgeLayout {
            axis: Axis::Vertical,
            position: rect.right(),
            points: EdgePoints::Segment(rect.top_right(), rect.bottom_right()),
        },
        EdgeLayout {
            axis: Axis::Vertical,
            position: center.x,
            points: EdgePoints::Single(center),
        },
        EdgeLayout {
            axis: Axis::Horizontal,
            position: rect.y,
            points: EdgePoints::Segment(rect.top_left(), rect.top_right()),
        },
        EdgeLayout {
            axis: Axis::Horizontal,
            position: rect.bottom(),
            points: EdgePoints::Segment(rect.bottom_left(), rect.bottom_right()),
        },
        EdgeLayout {
            axis: Axis::Horizontal,
            position: center.y,
            points: EdgePoints::Single(Point::new(center.x, center.y)),
        },
    ]
}

impl AreaEdges {
    pub fn register(registry: &mut EdgeRegistry, rect: &AreaRect) -> Self {
        let [left, right, vertical_mid, top, bottom, horizontal_mid] =
            edge_layout(rect).map(|e| registry.add_edge(e.axis, e.position, e.points, false));
        Self {
            left,
            right,
            vertical_mid,
            top,
            bottom,
            horizontal_mid,
        }
    }

    pub fn all(&self) -> [EdgeHandle; 6] {
        [
            self.left,
            self.right,
            self.vertical_mid,
            self.top,
            self.bottom,
            self.horizontal_mid,
        ]
    }

    /// Overwrite all six edges with the geometry of `rect`.
    pub fn sync(&self, registry: &mut EdgeRegistry, rect: &AreaRect) -> Result<(), EdgeError> {
        for (handle, layout) in self.all().into_iter().zip(edge_layout(rect)) {
            registry.update_edge(handle, layout.position, layout.points)?;
        }
        Ok(())
    }

    pub fn delete(&self, registry: &mut EdgeRegistry) -> Result<(), EdgeError> {
        let mut first_err = None;
        for handle in self.all() {
            if let Err(err) = registry.delete_edge(handle) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Registry misuse is a programming error: loud in debug builds, logged and
/// skipped in release builds.
pub(crate) fn report_contract_violation(err: EdgeError) {
    tracing::warn!(%err, "edge registry contract violation");
    debug_assert!(false, "edge registry contract violation: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_places_all_six_edges() {
        let mut reg = EdgeRegistry::default();
        let rect = AreaRect::new(10.0, 20.0, 30.0, 40.0);
        let edges = AreaEdges::register(&mut reg, &rect);
        let pos = |h| reg.get(h).map(|e| e.position);
        assert_eq!(pos(edges.left), Some(10.0));
        assert_eq!(pos(edges.right), Some(40.0));
        assert_eq!(pos(edges.vertical_mid), Some(25.0));
        assert_eq!(pos(edges.top), Some(20.0));
        assert_eq!(pos(edges.bottom), Some(60.0));
        assert_eq!(pos(edges.horizontal_mid), Some(40.0));
        assert_eq!(
            reg.get(edges.vertical_mid).map(|e| e.points),
            Some(EdgePoints::Single(Point::new(25.0, 40.0)))
        );
        assert_eq!(
            reg.get(edges.top).map(|e| e.points),
            Some(EdgePoints::Segment(
                Point::new(10.0, 20.0),
                Point::new(40.0, 20.0)
            ))
        );
    }

    #[test]
    fn sync_tracks_current_geometry() {
        let mut reg = EdgeRegistry::default();
        let edges = AreaEdges::register(&mut reg, &AreaRect::new(0.0, 0.0, 10.0, 10.0));
        let moved = AreaRect::new(50.0, 60.0, 10.0, 20.0);
        edges.sync(&mut reg, &moved).unwrap();
        assert_eq!(reg.get(edges.right).unwrap().position, 60.0);
        assert_eq!(
            reg.get(edges.bottom).unwrap().points,
            EdgePoints::Segment(Point::new(50.0, 80.0), Point::new(60.0, 80.0))
        );
    }

    #[test]
    fn delete_removes_every_edge_and_reports_second_delete() {
        let mut reg = EdgeRegistry::default();
        let edges = AreaEdges::register(&mut reg, &AreaRect::new(0.0, 0.0, 10.0, 10.0));
        edges.delete(&mut reg).unwrap();
        assert!(reg.is_empty());
        assert_eq!(edges.delete(&mut reg), Err(EdgeError::Stale(edges.left)));
    }
}
