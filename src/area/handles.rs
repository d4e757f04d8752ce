use ratatui::prelude::Rect;

use crate::snap::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    /// The moving side on the x axis, if any.
    pub fn horizontal_side(self) -> Option<Side> {
        match self {
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft => Some(Side::Left),
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight => {
                Some(Side::Right)
            }
            ResizeEdge::Top | ResizeEdge::Bottom => None,
        }
    }

    /// The moving side on the y axis, if any.
    pub fn vertical_side(self) -> Option<Side> {
        match self {
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight => Some(Side::Top),
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight => {
                Some(Side::Bottom)
            }
            ResizeEdge::Left | ResizeEdge::Right => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub rect: Rect,
    pub edge: ResizeEdge,
}

/// What a pointer press on an area starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Drag,
    Resize(ResizeEdge),
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Grab zones on the border cells of an on-screen area.
///
/// Corners come first so they win over the straight edges they touch. Areas
/// too thin to have an interior only get corners.
pub fn resize_handles_for_region(rect: Rect) -> Vec<ResizeHandle> {
    let mut handles = Vec::new();
    if rect.width == 0 || rect.height == 0 {
        return handles;
    }
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    let cell = |x, y| Rect {
        x,
        y,
        width: 1,
        height: 1,
    };
    handles.push(ResizeHandle {
        rect: cell(rect.x, rect.y),
        edge: ResizeEdge::TopLeft,
    });
    handles.push(ResizeHandle {
        rect: cell(right, rect.y),
        edge: ResizeEdge::TopRight,
    });
    handles.push(ResizeHandle {
        rect: cell(rect.x, bottom),
        edge: ResizeEdge::BottomLeft,
    });
    handles.push(ResizeHandle {
        rect: cell(right, bottom),
        edge: ResizeEdge::BottomRight,
    });
    if rect.width > 2 {
        handles.push(ResizeHandle {
            rect: Rect {
                x: rect.x.saturating_add(1),
                y: rect.y,
                width: rect.width.saturating_sub(2),
                height: 1,
            },
            edge: ResizeEdge::Top,
        });
        handles.push(ResizeHandle {
            rect: Rect {
                x: rect.x.saturating_add(1),
                y: bottom,
                width: rect.width.saturating_sub(2),
                height: 1,
            },
            edge: ResizeEdge::Bottom,
        });
    }
    if rect.height > 2 {
        handles.push(ResizeHandle {
            rect: Rect {
                x: rect.x,
                y: rect.y.saturating_add(1),
                width: 1,
                height: rect.height.saturating_sub(2),
            },
            edge: ResizeEdge::Left,
        });
        handles.push(ResizeHandle {
            rect: Rect {
                x: right,
                y: rect.y.saturating_add(1),
                width: 1,
                height: rect.height.saturating_sub(2),
            },
            edge: ResizeEdge::Right,
        });
    }
    handles
}

/// Classify a press at `(column, row)` against an area drawn at `rect`.
pub fn hit_test(rect: Rect, column: u16, row: u16) -> Option<Hit> {
    if !rect_contains(rect, column, row) {
        return None;
    }
    // Areas of 2x2 cells or less are all border; let them be dragged.
    if rect.width <= 2 && rect.height <= 2 {
        return Some(Hit::Drag);
    }
    let hit = resize_handles_for_region(rect)
        .into_iter()
        .find(|handle| rect_contains(handle.rect, column, row))
        .map_or(Hit::Drag, |handle| Hit::Resize(handle.edge));
    Some(hit)
}
