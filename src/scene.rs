//! The field and everything placed on it.
//!
//! A [`Scene`] owns the edge registry, the rail pair, the field's own edges and
//! every mounted area. It translates terminal pointer events (cell columns and
//! rows) into gesture steps for the one area being dragged or resized, rate
//! limited through a [`Throttle`].

use std::time::{Duration, Instant};

use rand::Rng;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::area::{
    AreaController, AreaId, AreaLimits, GestureKind, Hit, SnapContext, StepOutcome, hit_test,
};
use crate::constants::{
    AREA_HEIGHT_SPREAD, AREA_WIDTH_RANGE, DEFAULT_MAGNET_PX, DEFAULT_THROTTLE_MS, MAX_AREAS,
};
use crate::geometry::{AreaRect, FIELD_EXTENT, Point};
use crate::palette::Palette;
use crate::persist::{AreaStore, NoopStore};
use crate::snap::{EdgeHandle, EdgeRegistry, RailSet, register_field_edges};
use crate::throttle::Throttle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub magnet_px: f64,
    pub limits: AreaLimits,
    pub throttle: Duration,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            magnet_px: DEFAULT_MAGNET_PX,
            limits: AreaLimits::default(),
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
        }
    }
}

#[derive(Debug)]
pub struct SceneArea {
    pub controller: AreaController,
    pub color: Color,
}

impl SceneArea {
    pub fn id(&self) -> AreaId {
        self.controller.id()
    }

    pub fn rect(&self) -> AreaRect {
        self.controller.rect()
    }
}

pub struct Scene {
    registry: EdgeRegistry,
    rails: RailSet,
    field_edges: Vec<EdgeHandle>,
    areas: Vec<SceneArea>,
    next_id: AreaId,
    active: Option<AreaId>,
    last_step: Option<StepOutcome>,
    throttle: Throttle<(u16, u16)>,
    field: Rect,
    limits: AreaLimits,
    store: Box<dyn AreaStore>,
}

impl Scene {
    pub fn new(field: Rect, options: SceneOptions) -> Self {
        let mut registry = EdgeRegistry::new(options.magnet_px);
        let field_edges = register_field_edges(&mut registry);
        Self {
            registry,
            rails: RailSet::new(),
            field_edges,
            areas: Vec::new(),
            next_id: 0,
            active: None,
            last_step: None,
            throttle: Throttle::new(options.throttle),
            field,
            limits: options.limits,
            store: Box::new(NoopStore),
        }
    }

    pub fn with_store(mut self, store: Box<dyn AreaStore>) -> Self {
        self.store = store;
        self
    }

    pub fn registry(&self) -> &EdgeRegistry {
        &self.registry
    }

    pub fn rails(&self) -> &RailSet {
        &self.rails
    }

    pub fn field_edges(&self) -> &[EdgeHandle] {
        &self.field_edges
    }

    pub fn field(&self) -> Rect {
        self.field
    }

    /// Track a new terminal size. Percent geometry is unchanged; only the
    /// pixel conversion and the magnetic threshold follow the new size.
    pub fn set_field(&mut self, field: Rect) {
        if self.field != field {
            tracing::debug!(?field, "field resized");
            self.field = field;
        }
    }

    /// Areas in creation order, which is also paint order.
    pub fn areas(&self) -> &[SceneArea] {
        &self.areas
    }

    pub fn area(&self, id: AreaId) -> Option<&SceneArea> {
        self.areas.iter().find(|a| a.id() == id)
    }

    pub fn active(&self) -> Option<AreaId> {
        self.active
    }

    pub fn active_gesture(&self) -> Option<(AreaId, GestureKind)> {
        let id = self.active?;
        let kind = self.area(id)?.controller.gesture_kind()?;
        Some((id, kind))
    }

    pub fn last_step(&self) -> Option<StepOutcome> {
        self.last_step
    }

    pub fn add_area(&mut self, rect: AreaRect, color: Color) -> AreaId {
        let id = self.next_id;
        self.next_id += 1;
        let controller = AreaController::mount(id, rect, self.limits, &mut self.registry);
        self.areas.push(SceneArea { controller, color });
        id
    }

    /// Unmount an area and delete its edges.
    pub fn remove_area(&mut self, id: AreaId) -> bool {
        if self.active == Some(id) {
            self.finish_gesture(false);
        }
        let Some(index) = self.areas.iter().position(|a| a.id() == id) else {
            return false;
        };
        let area = self.areas.remove(index);
        area.controller.unmount(&mut self.registry);
        tracing::debug!(area = id, "area removed");
        true
    }

    pub fn clear(&mut self) {
        if self.active.is_some() {
            self.finish_gesture(false);
        }
        for area in self.areas.drain(..) {
            area.controller.unmount(&mut self.registry);
        }
    }

    /// Replace every area with `count` random ones.
    pub fn populate<R: Rng + ?Sized>(&mut self, count: usize, palette: Palette, rng: &mut R) {
        self.clear();
        let count = count.min(MAX_AREAS);
        for _ in 0..count {
            let rect = random_area_rect(rng);
            let color = palette.light_color(rng);
            self.add_area(rect, color);
        }
        tracing::info!(count, %palette, "scene populated");
    }

    fn pointer_point(&self, column: u16, row: u16) -> Point {
        Point::new(
            f64::from(column) - f64::from(self.field.x),
            f64::from(row) - f64::from(self.field.y),
        )
    }

    /// Start a drag or resize on the top-most area under the pointer.
    pub fn pointer_down(&mut self, column: u16, row: u16) -> Option<AreaId> {
        if self.active.is_some() {
            self.finish_gesture(true);
        }
        let field = self.field;
        let (index, hit) = self
            .areas
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, area)| {
                hit_test(area.rect().to_cells(field), column, row).map(|hit| (i, hit))
            })?;
        let pointer = self.pointer_point(column, row);
        let area = &mut self.areas[index];
        match hit {
            Hit::Drag => area.controller.begin_drag(pointer),
            Hit::Resize(edge) => area.controller.begin_resize(edge, pointer),
        }
        self.active = Some(area.id());
        self.active
    }

    /// Offer a pointer move to the active gesture.
    pub fn pointer_drag(&mut self, column: u16, row: u16, now: Instant) -> Option<StepOutcome> {
        self.active?;
        let (column, row) = self.throttle.call(now, (column, row))?;
        self.step(column, row)
    }

    /// Replay a move parked by the rate limiter once its cooldown is over.
    pub fn tick(&mut self, now: Instant) -> Option<StepOutcome> {
        self.active?;
        let (column, row) = self.throttle.poll(now)?;
        self.step(column, row)
    }

    /// Apply any parked move and commit the gesture.
    pub fn pointer_up(&mut self) -> Option<AreaRect> {
        self.finish_gesture(true)
    }

    /// End the gesture without applying a parked move, e.g. on focus loss.
    pub fn abort_gesture(&mut self) -> Option<AreaRect> {
        self.finish_gesture(false)
    }

    fn step(&mut self, column: u16, row: u16) -> Option<StepOutcome> {
        let id = self.active?;
        let pointer = self.pointer_point(column, row);
        let area = self.areas.iter_mut().find(|a| a.controller.id() == id)?;
        let mut ctx = SnapContext {
            registry: &mut self.registry,
            rails: &mut self.rails,
            field: &self.field,
        };
        let outcome = area.controller.pointer_move(pointer, &mut ctx);
        if outcome.is_some() {
            self.last_step = outcome;
        }
        outcome
    }

    fn finish_gesture(&mut self, apply_pending: bool) -> Option<AreaRect> {
        let pending = self.throttle.flush();
        if apply_pending && let Some((column, row)) = pending {
            self.step(column, row);
        }
        let id = self.active.take()?;
        self.last_step = None;
        let area = self.areas.iter_mut().find(|a| a.controller.id() == id)?;
        area.controller
            .end_gesture(&mut self.rails, self.store.as_mut())
    }
}

fn random_area_rect<R: Rng + ?Sized>(rng: &mut R) -> AreaRect {
    let (min_w, max_w) = AREA_WIDTH_RANGE;
    let width = rng.random_range(min_w..=max_w);
    let height = rng.random_range(
        width * (1.0 - AREA_HEIGHT_SPREAD)..=width * (1.0 + AREA_HEIGHT_SPREAD),
    );
    let x = rng.random_range(0.0..=FIELD_EXTENT - width);
    let y = rng.random_range(0.0..=FIELD_EXTENT - height);
    AreaRect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;
    use crate::persist::MemoryStore;
    use crate::snap::Rail;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FIELD: Rect = Rect {
        x: 0,
        y: 1,
        width: 100,
        height: 100,
    };

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl AreaStore for SharedStore {
        fn save(&mut self, id: AreaId, rect: AreaRect) {
            self.0.borrow_mut().save(id, rect);
        }
    }

    fn scene_with_store() -> (Scene, SharedStore) {
        let store = SharedStore::default();
        let scene = Scene::new(FIELD, SceneOptions::default()).with_store(Box::new(store.clone()));
        (scene, store)
    }

    #[test]
    fn new_scene_registers_field_edges() {
        let scene = Scene::new(FIELD, SceneOptions::default());
        assert_eq!(scene.field_edges().len(), 6);
        assert_eq!(scene.registry().len(Axis::Vertical), 3);
        assert!(scene.areas().is_empty());
    }

    #[test]
    fn populate_places_areas_inside_the_field() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        let mut rng = StdRng::seed_from_u64(42);
        scene.populate(30, Palette::Blue, &mut rng);
        assert_eq!(scene.areas().len(), 30);
        assert_eq!(scene.registry().len(Axis::Vertical), 3 + 30 * 3);
        for area in scene.areas() {
            let r = area.rect();
            assert!((20.0..=25.0).contains(&r.width));
            assert!(r.height >= r.width * 0.8 - 1e-9 && r.height <= r.width * 1.2 + 1e-9);
            assert!(r.x >= 0.0 && r.right() <= 100.0 + 1e-9);
            assert!(r.y >= 0.0 && r.bottom() <= 100.0 + 1e-9);
        }
        scene.populate(2, Palette::Random, &mut rng);
        assert_eq!(scene.areas().len(), 2);
        assert_eq!(scene.registry().len(Axis::Horizontal), 3 + 2 * 3);
    }

    #[test]
    fn drag_snaps_and_commits_on_release() {
        let (mut scene, store) = scene_with_store();
        // Columns 10..=29, rows 21..=40 on a field starting at row 1.
        let id = scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        let t0 = Instant::now();
        assert_eq!(scene.pointer_down(15, 30), Some(id));
        assert!(matches!(
            scene.active_gesture(),
            Some((_, GestureKind::Drag))
        ));
        // Left side to 4%, within the 7% threshold of the field edge.
        let out = scene.pointer_drag(9, 30, t0).unwrap();
        assert_eq!(out.rect.x, 0.0);
        assert_eq!(
            scene.rails().vertical(),
            Some(Rail::from_coords(0.0, 0.0, 0.0, 100.0))
        );
        let saved = scene.pointer_up();
        assert_eq!(saved.map(|r| r.x), Some(0.0));
        assert!(scene.rails().is_empty());
        assert!(scene.active().is_none());
        assert_eq!(store.0.borrow().last().map(|(i, r)| (*i, r.x)), Some((id, 0.0)));
    }

    #[test]
    fn throttled_moves_are_replayed_on_tick_and_release() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(20.0, 30.0, 10.0, 10.0), Color::Gray);
        let t0 = Instant::now();
        scene.pointer_down(25, 35);
        assert_eq!(scene.pointer_drag(26, 35, t0).map(|o| o.rect.x), Some(21.0));
        assert!(scene.pointer_drag(27, 35, t0 + Duration::from_millis(2)).is_none());
        assert!(scene.tick(t0 + Duration::from_millis(5)).is_none());
        let replayed = scene.tick(t0 + Duration::from_millis(10)).unwrap();
        assert_eq!(replayed.rect.x, 22.0);

        assert!(scene.pointer_drag(28, 35, t0 + Duration::from_millis(12)).is_none());
        let saved = scene.pointer_up().unwrap();
        assert_eq!(saved.x, 23.0);
    }

    #[test]
    fn next_press_moves_without_waiting_on_the_old_cooldown() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(20.0, 30.0, 10.0, 10.0), Color::Gray);
        let t0 = Instant::now();
        scene.pointer_down(25, 35);
        scene.pointer_drag(26, 35, t0);
        assert!(scene.pointer_drag(27, 35, t0 + Duration::from_millis(2)).is_none());
        assert_eq!(scene.pointer_up().map(|r| r.x), Some(22.0));

        // Still inside the first gesture's cooldown window.
        scene.pointer_down(27, 35);
        let out = scene.pointer_drag(28, 35, t0 + Duration::from_millis(3));
        assert_eq!(out.map(|o| o.rect.x), Some(23.0));
    }

    #[test]
    fn abort_drops_the_parked_move() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(20.0, 30.0, 10.0, 10.0), Color::Gray);
        let t0 = Instant::now();
        scene.pointer_down(25, 35);
        scene.pointer_drag(26, 35, t0);
        scene.pointer_drag(27, 35, t0 + Duration::from_millis(1));
        let saved = scene.abort_gesture().unwrap();
        assert_eq!(saved.x, 21.0);
        assert!(scene.tick(t0 + Duration::from_millis(20)).is_none());
    }

    #[test]
    fn top_most_area_wins_the_hit_test() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(10.0, 10.0, 30.0, 30.0), Color::Gray);
        let top = scene.add_area(AreaRect::new(20.0, 20.0, 30.0, 30.0), Color::Gray);
        assert_eq!(scene.pointer_down(30, 25), Some(top));
    }

    #[test]
    fn border_press_starts_a_resize() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        // Right border column is 29.
        scene.pointer_down(29, 30);
        assert!(matches!(
            scene.active_gesture(),
            Some((_, GestureKind::Resize(crate::area::ResizeEdge::Right)))
        ));
    }

    #[test]
    fn press_outside_every_area_does_nothing() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        assert_eq!(scene.pointer_down(90, 90), None);
        assert!(scene.pointer_drag(91, 90, Instant::now()).is_none());
        assert!(scene.pointer_up().is_none());
    }

    #[test]
    fn removing_an_area_deletes_its_edges() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        let a = scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        let b = scene.add_area(AreaRect::new(50.0, 20.0, 20.0, 20.0), Color::Gray);
        assert_eq!(scene.registry().len(Axis::Vertical), 9);
        assert!(scene.remove_area(a));
        assert!(!scene.remove_area(a));
        assert_eq!(scene.registry().len(Axis::Vertical), 6);
        assert!(scene.area(b).is_some());
    }

    #[test]
    fn removing_the_active_area_ends_its_gesture() {
        let mut scene = Scene::new(FIELD, SceneOptions::default());
        let a = scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        scene.pointer_down(15, 30);
        scene.pointer_drag(9, 30, Instant::now());
        assert!(!scene.rails().is_empty());
        scene.remove_area(a);
        assert!(scene.active().is_none());
        assert!(scene.rails().is_empty());
    }

    #[test]
    fn second_press_ends_a_stale_gesture() {
        let (mut scene, store) = scene_with_store();
        scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        scene.pointer_down(15, 30);
        scene.pointer_drag(20, 30, Instant::now());
        scene.pointer_down(90, 90);
        assert!(scene.active().is_none());
        assert_eq!(store.0.borrow().saved.len(), 1);
    }
}
