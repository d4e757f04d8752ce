use crate::area::AreaId;
use crate::geometry::AreaRect;

/// Receives an area's geometry when a gesture commits a change.
pub trait AreaStore {
    fn save(&mut self, id: AreaId, rect: AreaRect);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

impl AreaStore for NoopStore {
    fn save(&mut self, _id: AreaId, _rect: AreaRect) {}
}

/// Reports committed geometry through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStore;

impl AreaStore for TracingStore {
    fn save(&mut self, id: AreaId, rect: AreaRect) {
        tracing::info!(
            area = id,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "area geometry saved"
        );
    }
}

/// Keeps every save in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub saved: Vec<(AreaId, AreaRect)>,
}

impl MemoryStore {
    pub fn last(&self) -> Option<&(AreaId, AreaRect)> {
        self.saved.last()
    }
}

impl AreaStore for MemoryStore {
    fn save(&mut self, id: AreaId, rect: AreaRect) {
        self.saved.push((id, rect));
    }
}
