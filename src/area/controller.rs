//! Per-area gesture state machine: `Idle -> Active -> Idle`.
//!
//! A gesture captures the pointer position and the box at its start. Every
//! step recomputes the candidate box from the start state and the total
//! pointer delta (never from the previous step), clamps it into the field,
//! snaps the moving sides onto nearby edges, refreshes the rails and finally
//! writes the corrected box back into the edge registry.

use super::{AreaEdges, AreaId, ResizeEdge, report_contract_violation};
use crate::constants::{DEFAULT_MIN_AREA_HEIGHT, DEFAULT_MIN_AREA_WIDTH};
use crate::geometry::{AreaRect, Axis, FIELD_EXTENT, FieldBounds, Point};
use crate::persist::AreaStore;
use crate::snap::{Edge, EdgeHandle, EdgeRegistry, RailSet, Side};

/// Shared scene services a gesture step reads and writes.
pub struct SnapContext<'a> {
    pub registry: &'a mut EdgeRegistry,
    pub rails: &'a mut RailSet,
    pub field: &'a dyn FieldBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLimits {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for AreaLimits {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_AREA_WIDTH,
            min_height: DEFAULT_MIN_AREA_HEIGHT,
        }
    }
}

impl AreaLimits {
    fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.min_width,
            Axis::Horizontal => self.min_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeEdge),
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    kind: GestureKind,
    start_pointer: Point,
    start_rect: AreaRect,
}

/// Result of one executed gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub rect: AreaRect,
    /// Side snapped onto a vertical edge this step.
    pub vertical: Option<Side>,
    /// Side snapped onto a horizontal edge this step.
    pub horizontal: Option<Side>,
}

struct Snap {
    side: Side,
    edge: Edge,
}

#[derive(Debug)]
pub struct AreaController {
    id: AreaId,
    rect: AreaRect,
    edges: AreaEdges,
    limits: AreaLimits,
    gesture: Option<Gesture>,
}

impl AreaController {
    /// Place a new area and register its six edges.
    pub fn mount(
        id: AreaId,
        rect: AreaRect,
        limits: AreaLimits,
        registry: &mut EdgeRegistry,
    ) -> Self {
        let edges = AreaEdges::register(registry, &rect);
        Self {
            id,
            rect,
            edges,
            limits,
            gesture: None,
        }
    }

    /// Remove the area's edges from the registry.
    pub fn unmount(self, registry: &mut EdgeRegistry) {
        if let Err(err) = self.edges.delete(registry) {
            report_contract_violation(err);
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn rect(&self) -> AreaRect {
        self.rect
    }

    pub fn edges(&self) -> &AreaEdges {
        &self.edges
    }

    pub fn limits(&self) -> AreaLimits {
        self.limits
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture_kind(&self) -> Option<GestureKind> {
        self.gesture.map(|g| g.kind)
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.begin(GestureKind::Drag, pointer);
    }

    pub fn begin_resize(&mut self, edge: ResizeEdge, pointer: Point) {
        self.begin(GestureKind::Resize(edge), pointer);
    }

    fn begin(&mut self, kind: GestureKind, pointer: Point) {
        tracing::debug!(area = self.id, ?kind, rect = ?self.rect, "gesture started");
        self.gesture = Some(Gesture {
            kind,
            start_pointer: pointer,
            start_rect: self.rect,
        });
    }

    /// Run one step for the pointer now at `pointer` (device pixels).
    ///
    /// Returns `None` when no gesture is active.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        ctx: &mut SnapContext<'_>,
    ) -> Option<StepOutcome> {
        let gesture = self.gesture?;
        let field = ctx.field.field_size();
        let dx = field.px_to_percent(Axis::Vertical, pointer.x - gesture.start_pointer.x);
        let dy = field.px_to_percent(Axis::Horizontal, pointer.y - gesture.start_pointer.y);

        let own = self.edges.all();
        let (rect, snaps) = match gesture.kind {
            GestureKind::Drag => self.drag_step(&gesture.start_rect, dx, dy, &own, ctx),
            GestureKind::Resize(edge) => {
                self.resize_step(&gesture.start_rect, edge, dx, dy, &own, ctx)
            }
        };

        ctx.rails.begin_step();
        let mut outcome = StepOutcome {
            rect,
            vertical: None,
            horizontal: None,
        };
        for snap in snaps.into_iter().flatten() {
            ctx.rails.show_for_snap(&snap.edge, snap.side, &rect);
            match snap.side.axis() {
                Axis::Vertical => outcome.vertical = Some(snap.side),
                Axis::Horizontal => outcome.horizontal = Some(snap.side),
            }
        }
        ctx.rails.finish_step();

        self.rect = rect;
        if let Err(err) = self.edges.sync(ctx.registry, &rect) {
            report_contract_violation(err);
        }
        tracing::trace!(area = self.id, ?outcome, "gesture step");
        Some(outcome)
    }

    /// Finish the active gesture.
    ///
    /// Rails are always cleared. When the box changed it is handed to `store`
    /// and returned.
    pub fn end_gesture(
        &mut self,
        rails: &mut RailSet,
        store: &mut dyn AreaStore,
    ) -> Option<AreaRect> {
        let gesture = self.gesture.take()?;
        rails.hide_all();
        if self.rect == gesture.start_rect {
            tracing::debug!(area = self.id, "gesture ended without change");
            return None;
        }
        tracing::debug!(area = self.id, rect = ?self.rect, "gesture ended");
        store.save(self.id, self.rect);
        Some(self.rect)
    }

    fn drag_step(
        &self,
        start: &AreaRect,
        dx: f64,
        dy: f64,
        own: &[EdgeHandle],
        ctx: &SnapContext<'_>,
    ) -> (AreaRect, [Option<Snap>; 2]) {
        let mut x = clamp_origin(start.x + dx, start.width);
        let mut y = clamp_origin(start.y + dy, start.height);
        let v = pick_drag_snap(Axis::Vertical, x, start.width, own, ctx);
        if let Some((pos, _)) = &v {
            x = *pos;
        }
        let h = pick_drag_snap(Axis::Horizontal, y, start.height, own, ctx);
        if let Some((pos, _)) = &h {
            y = *pos;
        }
        let rect = AreaRect::new(x, y, start.width, start.height);
        (rect, [v.map(|(_, s)| s), h.map(|(_, s)| s)])
    }

    fn resize_step(
        &self,
        start: &AreaRect,
        edge: ResizeEdge,
        dx: f64,
        dy: f64,
        own: &[EdgeHandle],
        ctx: &SnapContext<'_>,
    ) -> (AreaRect, [Option<Snap>; 2]) {
        let (x, width, v) = match edge.horizontal_side() {
            Some(side) => self.resize_axis(side, start.x, start.width, dx, own, ctx),
            None => (start.x, start.width, None),
        };
        let (y, height, h) = match edge.vertical_side() {
            Some(side) => self.resize_axis(side, start.y, start.height, dy, own, ctx),
            None => (start.y, start.height, None),
        };
        (AreaRect::new(x, y, width, height), [v, h])
    }

    /// Move one side of the box along its axis and snap it.
    ///
    /// Returns the new origin and extent on that axis. The opposite side
    /// stays where it was at gesture start.
    fn resize_axis(
        &self,
        side: Side,
        start_pos: f64,
        start_extent: f64,
        delta: f64,
        own: &[EdgeHandle],
        ctx: &SnapContext<'_>,
    ) -> (f64, f64, Option<Snap>) {
        let axis = side.axis();
        let min = self.limits.along(axis);
        match side {
            Side::Left | Side::Top => {
                let far = start_pos + start_extent;
                // Pinned at the field start the box spans up to the fixed side.
                let pos = (start_pos + delta).clamp(0.0, (far - min).max(0.0));
                let extent = far - pos;
                let snap = ctx
                    .registry
                    .match_nearest(axis, own, pos, ctx.field)
                    .filter(|e| e.position >= 0.0 && far - e.position > min)
                    .cloned();
                match snap {
                    Some(edge) => (
                        edge.position,
                        far - edge.position,
                        Some(Snap { side, edge }),
                    ),
                    None => (pos, extent, None),
                }
            }
            Side::Right | Side::Bottom => {
                let extent =
                    (start_extent + delta).clamp(min, (FIELD_EXTENT - start_pos).max(min));
                let snap = ctx
                    .registry
                    .match_nearest(axis, own, start_pos + extent, ctx.field)
                    .filter(|e| e.position <= FIELD_EXTENT && e.position - start_pos > min)
                    .cloned();
                match snap {
                    Some(edge) => (
                        start_pos,
                        edge.position - start_pos,
                        Some(Snap { side, edge }),
                    ),
                    None => (start_pos, extent, None),
                }
            }
        }
    }
}

fn clamp_origin(pos: f64, extent: f64) -> f64 {
    pos.clamp(0.0, (FIELD_EXTENT - extent).max(0.0))
}

/// Snap for a box moving as a whole along `axis`.
///
/// Both the low and the high side are matched; when both find an edge only
/// the closer one is applied. Returns the corrected origin.
fn pick_drag_snap(
    axis: Axis,
    origin: f64,
    extent: f64,
    own: &[EdgeHandle],
    ctx: &SnapContext<'_>,
) -> Option<(f64, Snap)> {
    let (low_side, high_side) = match axis {
        Axis::Vertical => (Side::Left, Side::Right),
        Axis::Horizontal => (Side::Top, Side::Bottom),
    };
    let high = origin + extent;
    let low_match = ctx.registry.match_nearest(axis, own, origin, ctx.field);
    let high_match = ctx.registry.match_nearest(axis, own, high, ctx.field);
    let use_low = match (low_match, high_match) {
        (Some(lo), Some(hi)) => (lo.position - origin).abs() < (hi.position - high).abs(),
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => return None,
    };
    let (side, edge, corrected) = if use_low {
        let edge = low_match?;
        (low_side, edge, edge.position)
    } else {
        let edge = high_match?;
        (high_side, edge, edge.position - extent)
    };
    // A snap that would push the box out of the field is ignored.
    if corrected < 0.0 || corrected + extent > FIELD_EXTENT {
        return None;
    }
    tracing::trace!(?side, position = edge.position, "drag snapped");
    Some((
        corrected,
        Snap {
            side,
            edge: edge.clone(),
        },
    ))
}
