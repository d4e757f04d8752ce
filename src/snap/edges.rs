use crate::constants::DEFAULT_MAGNET_PX;
use crate::error::EdgeError;
use crate::geometry::{Axis, FieldBounds, Point};

/// Opaque identity of a registered edge.
///
/// Handles carry their axis so an update can never land on the wrong
/// collection, and their slot index is never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    axis: Axis,
    index: usize,
}

impl EdgeHandle {
    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Points lying on an edge, used as rail endpoint candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePoints {
    /// A lone point, e.g. the centre of an area for its mid edges.
    Single(Point),
    /// Both ends of a finite segment.
    Segment(Point, Point),
}

impl EdgePoints {
    pub fn iter(&self) -> impl Iterator<Item = Point> {
        let (a, b) = match *self {
            EdgePoints::Single(p) => (p, None),
            EdgePoints::Segment(p, q) => (p, Some(q)),
        };
        std::iter::once(a).chain(b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub position: f64,
    pub points: EdgePoints,
    /// Field-level edge: rails for it span the whole field.
    pub overall: bool,
    handle: EdgeHandle,
}

impl Edge {
    pub fn handle(&self) -> EdgeHandle {
        self.handle
    }

    pub fn axis(&self) -> Axis {
        self.handle.axis
    }
}

/// All alignment lines of one scene, split by axis.
///
/// Deleted slots stay in place as `None` so every handle issued earlier keeps
/// pointing at its own slot.
#[derive(Debug, Clone)]
pub struct EdgeRegistry {
    vertical: Vec<Option<Edge>>,
    horizontal: Vec<Option<Edge>>,
    magnet_px: f64,
}

impl Default for EdgeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAGNET_PX)
    }
}

impl EdgeRegistry {
    pub fn new(magnet_px: f64) -> Self {
        Self {
            vertical: Vec::new(),
            horizontal: Vec::new(),
            magnet_px: magnet_px.max(0.0),
        }
    }

    pub fn magnet_px(&self) -> f64 {
        self.magnet_px
    }

    pub fn set_magnet_px(&mut self, magnet_px: f64) {
        self.magnet_px = magnet_px.max(0.0);
    }

    fn slots(&self, axis: Axis) -> &Vec<Option<Edge>> {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    fn slots_mut(&mut self, axis: Axis) -> &mut Vec<Option<Edge>> {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }

    fn slot_mut(&mut self, handle: EdgeHandle) -> Result<&mut Option<Edge>, EdgeError> {
        self.slots_mut(handle.axis)
            .get_mut(handle.index)
            .ok_or(EdgeError::OutOfRange(handle))
    }

    pub fn add_edge(
        &mut self,
        axis: Axis,
        position: f64,
        points: EdgePoints,
        overall: bool,
    ) -> EdgeHandle {
        let slots = self.slots_mut(axis);
        let handle = EdgeHandle {
            axis,
            index: slots.len(),
        };
        slots.push(Some(Edge {
            position,
            points,
            overall,
            handle,
        }));
        handle
    }

    pub fn update_edge(
        &mut self,
        handle: EdgeHandle,
        position: f64,
        points: EdgePoints,
    ) -> Result<(), EdgeError> {
        let edge = self
            .slot_mut(handle)?
            .as_mut()
            .ok_or(EdgeError::Stale(handle))?;
        edge.position = position;
        edge.points = points;
        Ok(())
    }

    pub fn delete_edge(&mut self, handle: EdgeHandle) -> Result<Edge, EdgeError> {
        self.slot_mut(handle)?
            .take()
            .ok_or(EdgeError::Stale(handle))
    }

    pub fn get(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.slots(handle.axis)
            .get(handle.index)
            .and_then(Option::as_ref)
    }

    /// Live edges on `axis` in registration order.
    pub fn iter(&self, axis: Axis) -> impl Iterator<Item = &Edge> {
        self.slots(axis).iter().flatten()
    }

    pub fn len(&self, axis: Axis) -> usize {
        self.iter(axis).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len(Axis::Vertical) == 0 && self.len(Axis::Horizontal) == 0
    }

    /// Magnetic threshold on `axis`, in percent of the field's current size.
    pub fn magnetic_distance<F: FieldBounds + ?Sized>(&self, axis: Axis, field: &F) -> f64 {
        field.field_size().px_to_percent(axis, self.magnet_px)
    }

    /// Closest live edge within the magnetic threshold of `candidate`.
    ///
    /// Edges listed in `exclude` are skipped. On equal distance the edge
    /// registered first wins.
    pub fn match_nearest<F: FieldBounds + ?Sized>(
        &self,
        axis: Axis,
        exclude: &[EdgeHandle],
        candidate: f64,
        field: &F,
    ) -> Option<&Edge> {
        let threshold = self.magnetic_distance(axis, field);
        let mut best: Option<(&Edge, f64)> = None;
        for edge in self.iter(axis) {
            if exclude.contains(&edge.handle) {
                continue;
            }
            let diff = (edge.position - candidate).abs();
            if diff > threshold {
                continue;
            }
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((edge, diff));
            }
        }
        if let Some((edge, diff)) = best {
            tracing::trace!(?axis, candidate, position = edge.position, diff, "edge matched");
        }
        best.map(|(edge, _)| edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldSize;

    fn vertical_segment(x: f64) -> EdgePoints {
        EdgePoints::Segment(Point::new(x, 0.0), Point::new(x, 100.0))
    }

    #[test]
    fn handles_are_sequential_per_axis() {
        let mut reg = EdgeRegistry::default();
        let a = reg.add_edge(Axis::Vertical, 0.0, vertical_segment(0.0), true);
        let b = reg.add_edge(Axis::Vertical, 50.0, vertical_segment(50.0), true);
        let c = reg.add_edge(
            Axis::Horizontal,
            0.0,
            EdgePoints::Single(Point::new(0.0, 0.0)),
            false,
        );
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(c.index(), 0);
        assert_eq!(c.axis(), Axis::Horizontal);
    }

    #[test]
    fn update_overwrites_in_place() {
        let mut reg = EdgeRegistry::default();
        let h = reg.add_edge(Axis::Vertical, 10.0, vertical_segment(10.0), false);
        reg.update_edge(h, 12.0, vertical_segment(12.0)).unwrap();
        let edge = reg.get(h).unwrap();
        assert_eq!(edge.position, 12.0);
        assert_eq!(edge.points, vertical_segment(12.0));
        assert_eq!(edge.handle(), h);
        assert_eq!(reg.len(Axis::Vertical), 1);
    }

    #[test]
    fn stale_and_unknown_handles_are_reported() {
        let mut reg = EdgeRegistry::default();
        let h = reg.add_edge(Axis::Vertical, 10.0, vertical_segment(10.0), false);
        reg.delete_edge(h).unwrap();
        assert_eq!(
            reg.update_edge(h, 1.0, vertical_segment(1.0)),
            Err(EdgeError::Stale(h))
        );
        assert_eq!(reg.delete_edge(h), Err(EdgeError::Stale(h)));

        let mut other = EdgeRegistry::default();
        let foreign = other.add_edge(Axis::Horizontal, 5.0, vertical_segment(5.0), false);
        let _ = other.add_edge(Axis::Horizontal, 6.0, vertical_segment(6.0), false);
        let second = other.add_edge(Axis::Horizontal, 7.0, vertical_segment(7.0), false);
        assert!(reg.get(foreign).is_none());
        assert_eq!(reg.delete_edge(second), Err(EdgeError::OutOfRange(second)));
    }

    #[test]
    fn deleted_slots_are_not_reused() {
        let mut reg = EdgeRegistry::default();
        let a = reg.add_edge(Axis::Vertical, 10.0, vertical_segment(10.0), false);
        reg.delete_edge(a).unwrap();
        let b = reg.add_edge(Axis::Vertical, 10.0, vertical_segment(10.0), false);
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
    }

    #[test]
    fn threshold_scales_inversely_with_field_size() {
        let reg = EdgeRegistry::new(7.0);
        let narrow = FieldSize::new(700.0, 700.0);
        let wide = FieldSize::new(1400.0, 700.0);
        assert_eq!(reg.magnetic_distance(Axis::Vertical, &narrow), 1.0);
        assert_eq!(reg.magnetic_distance(Axis::Vertical, &wide), 0.5);

        let mut reg = reg;
        reg.add_edge(Axis::Vertical, 40.0, vertical_segment(40.0), false);
        assert!(reg.match_nearest(Axis::Vertical, &[], 40.8, &narrow).is_some());
        assert!(reg.match_nearest(Axis::Vertical, &[], 40.8, &wide).is_none());
    }

    #[test]
    fn picks_the_closest_of_two_nearby_edges() {
        let mut reg = EdgeRegistry::new(7.0);
        let field = FieldSize::new(1400.0, 800.0);
        reg.add_edge(Axis::Vertical, 40.3, vertical_segment(40.3), false);
        let target = reg.add_edge(Axis::Vertical, 40.0, vertical_segment(40.0), false);
        let edge = reg.match_nearest(Axis::Vertical, &[], 40.1, &field).unwrap();
        assert_eq!(edge.handle(), target);
        assert_eq!(edge.position, 40.0);
    }

    #[test]
    fn ties_go_to_the_first_registered_edge() {
        let mut reg = EdgeRegistry::new(7.0);
        let field = FieldSize::new(100.0, 100.0);
        let first = reg.add_edge(Axis::Horizontal, 20.0, vertical_segment(20.0), false);
        reg.add_edge(Axis::Horizontal, 24.0, vertical_segment(24.0), false);
        let edge = reg.match_nearest(Axis::Horizontal, &[], 22.0, &field).unwrap();
        assert_eq!(edge.handle(), first);
    }

    #[test]
    fn excluded_handle_is_never_returned() {
        let mut reg = EdgeRegistry::new(7.0);
        let field = FieldSize::new(100.0, 100.0);
        let own = reg.add_edge(Axis::Vertical, 30.0, vertical_segment(30.0), false);
        let other = reg.add_edge(Axis::Vertical, 33.0, vertical_segment(33.0), false);
        let edge = reg.match_nearest(Axis::Vertical, &[own], 30.0, &field).unwrap();
        assert_eq!(edge.handle(), other);
        assert!(reg.match_nearest(Axis::Vertical, &[own, other], 30.0, &field).is_none());
    }

    #[test]
    fn deleted_edges_never_match() {
        let mut reg = EdgeRegistry::new(7.0);
        let field = FieldSize::new(100.0, 100.0);
        let gone = reg.add_edge(Axis::Vertical, 50.0, vertical_segment(50.0), false);
        reg.delete_edge(gone).unwrap();
        assert!(reg.match_nearest(Axis::Vertical, &[], 50.0, &field).is_none());
        assert!(reg.match_nearest(Axis::Vertical, &[gone], 50.0, &field).is_none());
    }

    #[test]
    fn axes_are_independent() {
        let mut reg = EdgeRegistry::new(7.0);
        let field = FieldSize::new(100.0, 100.0);
        reg.add_edge(Axis::Horizontal, 50.0, vertical_segment(50.0), false);
        assert!(reg.match_nearest(Axis::Vertical, &[], 50.0, &field).is_none());
        assert!(reg.match_nearest(Axis::Horizontal, &[], 50.0, &field).is_some());
    }
}
